//! Property-based tests using proptest
//!
//! These tests generate random sequences of operations and check the heap
//! against a naive model after every step.

use fib_heap::{FibonacciHandle, FibonacciHeap, HeapError};
use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone)]
enum Op {
    Insert(i32),
    Pop,
    /// (index into live handles, amount to decrease by; 0 means "not a decrease")
    DecreaseKey(usize, i32),
    Delete(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (-100i32..100).prop_map(Op::Insert),
        2 => Just(Op::Pop),
        3 => (0usize..64, 0i32..50).prop_map(|(i, d)| Op::DecreaseKey(i, d)),
        1 => (0usize..64).prop_map(Op::Delete),
    ]
}

fn check_against_model(ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut heap = FibonacciHeap::new();
    let mut live: Vec<FibonacciHandle> = Vec::new();
    let mut priorities: HashMap<FibonacciHandle, i32> = HashMap::new();

    for op in ops {
        match op {
            Op::Insert(p) => {
                let h = heap.insert(p, p);
                live.push(h);
                priorities.insert(h, p);
            }
            Op::Pop => {
                let expected = priorities.values().min().copied();
                match heap.min_handle() {
                    Some(h) => {
                        let (p, _) = heap.extract_min().unwrap();
                        prop_assert_eq!(Some(p), expected);
                        priorities.remove(&h);
                        live.retain(|x| *x != h);
                        prop_assert!(!heap.contains(&h));
                    }
                    None => {
                        prop_assert!(expected.is_none());
                        prop_assert_eq!(heap.extract_min(), None);
                    }
                }
            }
            Op::DecreaseKey(i, by) if !live.is_empty() => {
                let h = live[i % live.len()];
                let old = priorities[&h];
                let len_before = heap.len();
                let min_before = heap.peek().map(|(p, _)| *p);
                let result = heap.decrease_key(&h, old - by);
                if by == 0 {
                    prop_assert_eq!(result, Err(HeapError::PriorityNotDecreased));
                    prop_assert_eq!(heap.len(), len_before);
                    prop_assert_eq!(heap.peek().map(|(p, _)| *p), min_before);
                    prop_assert_eq!(heap.get(&h).map(|(p, _)| *p), Some(old));
                } else {
                    prop_assert_eq!(result, Ok(()));
                    priorities.insert(h, old - by);
                }
            }
            Op::Delete(i) if !live.is_empty() => {
                let h = live.remove(i % live.len());
                let p = priorities.remove(&h).unwrap();
                let len_before = heap.len();
                prop_assert_eq!(heap.delete(&h).map(|(p, _)| p), Ok(p));
                prop_assert_eq!(heap.len(), len_before - 1);
                prop_assert_eq!(heap.delete(&h), Err(HeapError::InvalidHandle));
            }
            Op::DecreaseKey(..) | Op::Delete(_) => {}
        }

        prop_assert_eq!(heap.len(), priorities.len());
        prop_assert_eq!(heap.is_empty(), priorities.is_empty());
        prop_assert_eq!(
            heap.peek().map(|(p, _)| *p),
            priorities.values().min().copied()
        );
        if let Err(violation) = heap.validate() {
            return Err(TestCaseError::fail(violation.to_string()));
        }
    }

    Ok(())
}

proptest! {
    #[test]
    fn test_operations_match_model(ops in prop::collection::vec(op_strategy(), 0..200)) {
        check_against_model(ops)?;
    }

    #[test]
    fn test_pop_order_is_sorted(values in prop::collection::vec(-1000i32..1000, 0..200)) {
        let heap: FibonacciHeap<i32, i32> = values.iter().map(|&v| (v, v)).collect();
        let popped: Vec<i32> = heap.into_sorted_vec().into_iter().map(|(p, _)| p).collect();
        let mut expected = values.clone();
        expected.sort_unstable();
        prop_assert_eq!(popped, expected);
    }

    #[test]
    fn test_distinct_payloads_come_back_once(n in 0usize..300) {
        let mut heap = FibonacciHeap::new();
        // Distinct priorities in scrambled order
        for i in 0..n {
            let p = (i * 7919) % 1009 + 1009 * (i / 1009);
            heap.insert(p, i);
        }
        let mut seen = vec![false; n];
        while let Some((_, i)) = heap.extract_min() {
            prop_assert!(!seen[i]);
            seen[i] = true;
        }
        prop_assert!(seen.into_iter().all(|s| s));
    }

    #[test]
    fn test_merge_sizes_and_min(
        left in prop::collection::vec(-100i32..100, 0..50),
        right in prop::collection::vec(-100i32..100, 0..50),
        pops in 0usize..5,
    ) {
        let mut a: FibonacciHeap<i32, i32> = left.iter().map(|&v| (v, v)).collect();
        let mut b: FibonacciHeap<i32, i32> = right.iter().map(|&v| (v, v)).collect();
        // Give both sides some tree structure before merging
        for _ in 0..pops {
            a.extract_min();
            b.extract_min();
        }
        let (len_a, len_b) = (a.len(), b.len());
        let expected_min = [a.peek().map(|(p, _)| *p), b.peek().map(|(p, _)| *p)]
            .into_iter()
            .flatten()
            .min();
        let b_handles = b.roots();

        a.merge(b);
        prop_assert_eq!(a.len(), len_a + len_b);
        prop_assert_eq!(a.peek().map(|(p, _)| *p), expected_min);
        for h in &b_handles {
            prop_assert!(a.contains(h));
        }
        if let Err(violation) = a.validate() {
            return Err(TestCaseError::fail(violation.to_string()));
        }
    }
}
