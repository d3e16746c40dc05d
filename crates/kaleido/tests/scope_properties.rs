//! Property tests for scopes over arbitrary paths and states.

use kaleido::prelude::*;
use proptest::prelude::*;

fn arb_key() -> impl Strategy<Value = Key> {
    prop_oneof![
        "[a-c]".prop_map(Key::Field),
        (0usize..3).prop_map(Key::Index),
    ]
}

fn arb_path() -> impl Strategy<Value = Path> {
    prop::collection::vec(arb_key(), 1..4).prop_map(Path::from)
}

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-100i64..100).prop_map(Value::Int),
        "[a-z]{0,4}".prop_map(Value::String),
    ]
}

fn arb_state() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..3).prop_map(Value::from),
            prop::collection::btree_map("[a-c]", inner, 0..3)
                .prop_map(|m| Value::Map(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn get_after_set_round_trips(state in arb_state(), path in arb_path(), slice in arb_leaf()) {
        let store = Store::with_state(state, StoreConfig::default());
        let scope = store.scope(path);
        scope.set(slice.clone());
        prop_assert_eq!(scope.get(), Some(slice));
    }

    #[test]
    fn every_cell_matches_state_after_writes(
        state in arb_state(),
        watched in prop::collection::vec(arb_path(), 1..5),
        writes in prop::collection::vec((arb_path(), arb_leaf()), 1..6),
    ) {
        let store = Store::with_state(state, StoreConfig::default());
        let scopes: Vec<Scope> = watched.into_iter().map(|p| store.scope(p)).collect();
        for (path, slice) in writes {
            store.scope(path).set(slice);
            for scope in &scopes {
                prop_assert_eq!(scope.stream().get(), scope.get());
            }
        }
        store.undo(1).unwrap();
        for scope in &scopes {
            prop_assert_eq!(scope.stream().get(), scope.get());
        }
    }

    #[test]
    fn history_grows_by_one_per_write(writes in prop::collection::vec((arb_path(), arb_leaf()), 0..8)) {
        let store = Store::new();
        let n = writes.len();
        for (path, slice) in writes {
            store.scope(path).set(slice);
        }
        prop_assert_eq!(store.history().len(), n + 1);
        prop_assert_eq!(store.history().last(), Some(store.state()));
    }
}
