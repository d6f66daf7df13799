//! Property tests over arbitrary insertion sequences

use lla::*;
use proptest::prelude::*;
mod test_helpers;
use test_helpers::*;

proptest! {
    #[test]
    fn sorted_and_complete_after_every_insert(
        values in proptest::collection::vec(-1_000i64..1_000, 0..96),
    ) {
        let mut lla = demo_lla();
        let mut inserted = Vec::new();

        for x in values {
            match lla.insert(x) {
                Ok(()) => inserted.push(x),
                Err(LlaError::CapacityExceeded { .. }) => {
                    prop_assert_eq!(inserted.len(), lla.config().headroom());
                    break;
                }
                Err(err) => return Err(TestCaseError::fail(format!("unexpected error: {err}"))),
            }

            let stored = occupied(&lla);
            prop_assert!(stored.windows(2).all(|pair| pair[0] <= pair[1]), "unsorted: {:?}", stored);
            prop_assert_eq!(stored.len(), inserted.len());
        }

        let mut expected = inserted.clone();
        expected.sort_unstable();
        prop_assert_eq!(occupied(&lla), expected);
        prop_assert_eq!(lla.len(), inserted.len());
    }

    #[test]
    fn ceilings_hold_for_every_node(
        n_log in 2u32..7,
        c in 1usize..4,
        values in proptest::collection::vec(any::<i64>(), 0..200),
    ) {
        let n = 1usize << n_log;
        let mut lla = Lla::with_params(n, c, 0.4, 0.8).expect("valid configuration");

        for x in values {
            if lla.insert(x).is_err() {
                break;
            }
            for view in lla.nodes() {
                prop_assert!(view.within_ceiling(), "{:?}", view);
            }
        }
        prop_assert!(lla.values().collect::<Vec<_>>().windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn redistribution_is_sorted_merge(
        window_len in 1usize..40,
        occupants in proptest::collection::vec(-50i64..50, 0..40),
        x in -50i64..50,
        offset in 0usize..8,
    ) {
        let mut sorted: Vec<i64> = occupants.into_iter().take(window_len - 1).collect();
        sorted.sort_unstable();

        // Lay the occupants out with their gaps at the front
        let capacity = offset + window_len + 3;
        let mut array = SlotArray::new(capacity).unwrap();
        for value in &sorted {
            slots::insert_and_spread(&mut array, offset, offset + window_len - 1, *value).unwrap();
        }
        let outside: Vec<Slot> = array.as_slice()[..offset]
            .iter()
            .chain(&array.as_slice()[offset + window_len..])
            .copied()
            .collect();

        let count = slots::insert_and_spread(&mut array, offset, offset + window_len - 1, x).unwrap();

        let mut expected = sorted.clone();
        expected.push(x);
        expected.sort_unstable();
        prop_assert_eq!(count, expected.len());
        prop_assert_eq!(
            array.occupants(offset..=offset + window_len - 1).collect::<Vec<_>>(),
            expected
        );
        prop_assert_eq!(array.occupied(offset..=offset + window_len - 1), sorted.len() + 1);

        let after: Vec<Slot> = array.as_slice()[..offset]
            .iter()
            .chain(&array.as_slice()[offset + window_len..])
            .copied()
            .collect();
        prop_assert_eq!(after, outside);
    }
}
