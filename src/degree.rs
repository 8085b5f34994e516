//! Node degree type and the Fibonacci degree bound.
//!
//! # Why u8?
//!
//! The degree of a node is its number of children. In a Fibonacci heap a node
//! of degree `k` roots a subtree of at least `F(k+2) >= φ^k` nodes, where `F`
//! is the Fibonacci sequence and `φ` the golden ratio. Even a heap filling a
//! 64-bit address space keeps every degree below 93, so `u8` is plenty and
//! keeps the node small.
//!
//! # Consolidation table
//!
//! [`max_degree`] computes the exact bound for a given element count using
//! integer Fibonacci numbers (no floating point). Consolidation sizes its
//! degree table with [`table_size`], which is never larger than the classic
//! `⌈log_φ(n)⌉ + 1`.

/// Number of children of a node.
pub type Degree = u8;

/// Largest degree any node can reach in a Fibonacci heap holding `n` elements.
///
/// This is the largest `k` with `F(k+2) <= n`.
///
/// ```rust
/// use fib_heap::degree::max_degree;
///
/// assert_eq!(max_degree(0), 0);
/// assert_eq!(max_degree(1), 0);
/// assert_eq!(max_degree(2), 1);
/// assert_eq!(max_degree(3), 2);
/// assert_eq!(max_degree(5), 3);
/// ```
pub fn max_degree(n: usize) -> usize {
    // (F(k+2), F(k+3)) starting at k = 0
    let (mut current, mut next) = (1usize, 2usize);
    let mut k = 0;
    while next <= n {
        k += 1;
        match current.checked_add(next) {
            Some(sum) => {
                current = next;
                next = sum;
            }
            None => break,
        }
    }
    k
}

/// Slots needed by a degree-indexed table for a heap of `n` elements.
#[inline]
pub fn table_size(n: usize) -> usize {
    max_degree(n) + 1
}
