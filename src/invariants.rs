//! Full-structure invariant checking for [`FibonacciHeap`]
//!
//! [`FibonacciHeap::validate`] walks the whole forest (iteratively, so deep
//! trees are fine) and reports the first broken invariant. Tests call it after
//! every operation; with the `validate-ops` feature the heap calls it itself.

use crate::arena::NodeRef;
use crate::degree;
use crate::fibonacci::FibonacciHeap;
use rustc_hash::FxHashSet;
use thiserror::Error;

/// A structural invariant that does not hold
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("heap has {len} elements but no minimum")]
    MissingMin { len: usize },
    #[error("heap is empty but still has a minimum")]
    StaleMin,
    #[error("minimum reference does not resolve to a live node")]
    DanglingMin,
    #[error("minimum is not a root")]
    MinNotRoot,
    #[error("a root has a smaller priority than the minimum")]
    MinNotMinimal,
    #[error("sibling links are not symmetric")]
    BrokenRing,
    #[error("a link does not resolve to a live node")]
    DanglingLink,
    #[error("a node is reachable twice")]
    NodeRevisited,
    #[error("a root has a parent")]
    RootWithParent,
    #[error("a root is marked")]
    MarkedRoot,
    #[error("a child does not point back to its parent")]
    WrongParent,
    #[error("degree {recorded} does not match {actual} children")]
    DegreeMismatch { recorded: usize, actual: usize },
    #[error("degree {degree} exceeds the bound {bound} for {len} elements")]
    DegreeTooLarge { degree: usize, bound: usize, len: usize },
    #[error("a child has a smaller priority than its parent")]
    HeapOrder,
    #[error("{reachable} nodes reachable but heap holds {len}")]
    SizeMismatch { reachable: usize, len: usize },
}

impl<T, P: Ord> FibonacciHeap<T, P> {
    /// Checks every structural invariant of the heap
    ///
    /// - the root list and every child list are symmetric circular rings
    /// - roots have no parent and are never marked
    /// - every child points back at its parent, and the parent's degree equals
    ///   the size of its child ring
    /// - no degree exceeds the Fibonacci bound for the current size
    /// - min-heap order holds along every edge
    /// - the minimum is a root holding the smallest priority
    /// - exactly `len()` nodes are reachable, each exactly once
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let len = self.len();
        let Some(min) = self.min else {
            return if len == 0 {
                Ok(())
            } else {
                Err(InvariantViolation::MissingMin { len })
            };
        };
        if len == 0 {
            return Err(InvariantViolation::StaleMin);
        }
        let min_node = self
            .nodes
            .get(min)
            .ok_or(InvariantViolation::DanglingMin)?;
        if min_node.parent.is_some() {
            return Err(InvariantViolation::MinNotRoot);
        }

        let bound = degree::max_degree(len);
        let mut seen: FxHashSet<NodeRef> = FxHashSet::default();
        // (first member of a ring, parent of that ring)
        let mut pending: Vec<(NodeRef, Option<NodeRef>)> = vec![(min, None)];

        while let Some((start, parent)) = pending.pop() {
            let mut count = 0usize;
            let mut current = start;
            loop {
                let node = self
                    .nodes
                    .get(current)
                    .ok_or(InvariantViolation::DanglingLink)?;
                if !seen.insert(current) {
                    return Err(InvariantViolation::NodeRevisited);
                }
                if seen.len() > len {
                    return Err(InvariantViolation::SizeMismatch {
                        reachable: seen.len(),
                        len,
                    });
                }
                let right = self
                    .nodes
                    .get(node.right)
                    .ok_or(InvariantViolation::DanglingLink)?;
                if right.left != current {
                    return Err(InvariantViolation::BrokenRing);
                }

                match parent {
                    None => {
                        if node.parent.is_some() {
                            return Err(InvariantViolation::RootWithParent);
                        }
                        if node.marked {
                            return Err(InvariantViolation::MarkedRoot);
                        }
                        if node.priority < min_node.priority {
                            return Err(InvariantViolation::MinNotMinimal);
                        }
                    }
                    Some(p) => {
                        if node.parent != Some(p) {
                            return Err(InvariantViolation::WrongParent);
                        }
                        if node.priority < self.nodes[p].priority {
                            return Err(InvariantViolation::HeapOrder);
                        }
                    }
                }

                if node.degree as usize > bound {
                    return Err(InvariantViolation::DegreeTooLarge {
                        degree: node.degree as usize,
                        bound,
                        len,
                    });
                }
                match node.child {
                    Some(child) => pending.push((child, Some(current))),
                    None if node.degree != 0 => {
                        return Err(InvariantViolation::DegreeMismatch {
                            recorded: node.degree as usize,
                            actual: 0,
                        })
                    }
                    None => {}
                }

                count += 1;
                current = node.right;
                if current == start {
                    break;
                }
            }

            if let Some(p) = parent {
                let recorded = self.nodes[p].degree as usize;
                if recorded != count {
                    return Err(InvariantViolation::DegreeMismatch {
                        recorded,
                        actual: count,
                    });
                }
            }
        }

        if seen.len() != len {
            return Err(InvariantViolation::SizeMismatch {
                reachable: seen.len(),
                len,
            });
        }
        Ok(())
    }
}
