//! Shared checks for integration tests

#![allow(dead_code)]
use lla::{Lla, LlaConfig};

/// Reference structure: N=16, C=8, 0.5 → 0.75
pub fn demo_lla() -> Lla {
    Lla::new(LlaConfig::demo()).expect("demo configuration is valid")
}

/// Insert every value, panicking on the first failure
pub fn insert_all(lla: &mut Lla, values: &[i64]) {
    for &x in values {
        lla.insert(x)
            .unwrap_or_else(|err| panic!("insert {} failed: {}", x, err));
    }
}

/// Occupied values left to right
pub fn occupied(lla: &Lla) -> Vec<i64> {
    lla.slots().iter().filter_map(|slot| *slot).collect()
}

/// Occupied slots never decrease left to right
pub fn assert_sorted(lla: &Lla) {
    let values = occupied(lla);
    for pair in values.windows(2) {
        assert!(pair[0] <= pair[1], "out of order: {:?} in {:?}", pair, values);
    }
}

/// Every node that took an insertion stays under its ceiling
pub fn assert_within_ceilings(lla: &Lla) {
    for view in lla.nodes() {
        assert!(
            view.within_ceiling(),
            "node [{}, {}] at depth {} has tau {} > tau_k {}",
            view.window_start,
            view.window_end,
            view.depth,
            view.tau,
            view.tau_k
        );
    }
}
