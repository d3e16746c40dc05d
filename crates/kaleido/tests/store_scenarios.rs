//! End-to-end behavior of stores, scopes, history and undo.

use std::cell::RefCell;
use std::rc::Rc;

use kaleido::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn v(json: serde_json::Value) -> Value {
    Value::from(json)
}

fn recorder(scope: &Scope) -> (Rc<RefCell<Vec<Option<Value>>>>, Subscription) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&seen);
    let sub = scope.subscribe(move |slice| s.borrow_mut().push(slice.cloned()));
    (seen, sub)
}

#[test]
fn undo_scenario() {
    let store = Store::new();
    assert_eq!(store.state(), v(json!({})));

    store.scope(path!["a"]).set(1);
    assert_eq!(store.state(), v(json!({"a": 1})));
    assert_eq!(store.history().to_vec(), vec![v(json!({})), v(json!({"a": 1}))]);

    store.scope(path!["a"]).set(2);
    assert_eq!(store.state(), v(json!({"a": 2})));
    assert_eq!(store.history().len(), 3);

    store.undo(1).unwrap();
    assert_eq!(store.state(), v(json!({"a": 1})));
    assert_eq!(
        store.history().to_vec(),
        vec![
            v(json!({})),
            v(json!({"a": 1})),
            v(json!({"a": 2})),
            v(json!({"a": 1})),
        ]
    );
}

#[test]
fn initial_value_wiring() {
    let store = Store::new();
    let early = store.scope(path!["b"]);
    let (seen, _sub) = recorder(&early);

    let b = store.scope_with(path!["b"], 5);
    assert_eq!(store.state(), v(json!({"b": 5})));
    assert_eq!(b.stream().get(), Some(Value::Int(5)));
    assert_eq!(*seen.borrow(), vec![Some(Value::Int(5))]);
    assert_eq!(store.history().len(), 2);
}

#[test]
fn do_transform_notifies_once() {
    let store = Store::new();
    let c = store.scope_with(path!["c"], 1);
    let (seen, _sub) = recorder(&c);

    c.update(|x| Value::from(x.and_then(Value::as_i64).unwrap_or(0) + 1));
    assert_eq!(c.get(), Some(Value::Int(2)));
    assert_eq!(*seen.borrow(), vec![Some(Value::Int(2))]);
}

#[test]
fn notification_fidelity() {
    let store = Store::new();
    let first = store.scope(path!["first"]);
    let second = store.scope(path!["second"]);
    let (seen, _sub) = recorder(&first);

    first.set("v");
    second.set("w");
    second.update(|_| Value::Null);
    assert_eq!(*seen.borrow(), vec![Some(Value::from("v"))]);
}

#[test]
fn registry_sharing() {
    let store = Store::new();
    let a = store.scope(path!["k", 0]);
    let b = store.scope(Path::from(vec![Key::from("k"), Key::Index(0)]));
    let (seen, _sub) = recorder(&a);

    b.set(true);
    assert!(a.stream().ptr_eq(&b.stream()));
    assert_eq!(*seen.borrow(), vec![Some(Value::Bool(true))]);
}

#[test]
fn history_monotonicity() {
    let store = Store::new();
    let initial = store.history().len();
    let x = store.scope(path!["x"]);
    let y = store.scope(path!["y", "z"]);

    x.set(1);
    y.set(2);
    x.update(|_| Value::from("three"));
    store.undo(2).unwrap();
    y.update(|_| Value::list());

    assert_eq!(store.history().len(), initial + 5);
    assert_eq!(store.history().last(), Some(store.state()));
}

#[test]
fn structural_sharing_across_writes() {
    let store = Store::with_state(
        v(json!({"left": {"items": [1, 2, 3]}, "right": {"n": 0}})),
        StoreConfig::default(),
    );
    let left_before = store.scope(path!["left"]).get().unwrap();

    store.scope(path!["right", "n"]).set(1);
    let left_after = store.scope(path!["left"]).get().unwrap();

    assert!(left_before.ptr_eq(&left_after));
    let history = store.history().to_vec();
    let left_in = |state: &Value| state.as_map().unwrap().get("left").unwrap().clone();
    assert!(left_in(&history[0]).ptr_eq(&left_in(&history[1])));
}

#[test]
fn undo_restores_nested_scopes() {
    let store = Store::new();
    let profile = store.scope(path!["user", "profile"]);
    let name = profile.child("name");
    let (seen, _sub) = recorder(&name);

    name.set("ada");
    profile.set(v(json!({"name": "grace", "lang": "cobol"})));
    store.undo(1).unwrap();

    assert_eq!(name.get(), Some(Value::from("ada")));
    assert_eq!(
        *seen.borrow(),
        vec![
            Some(Value::from("ada")),
            Some(Value::from("grace")),
            Some(Value::from("ada")),
        ]
    );
}

#[test]
fn repeated_live_undo_oscillates() {
    let store = Store::new();
    let a = store.scope(path!["a"]);
    a.set(1);
    a.set(2);
    a.set(3);

    let mut seen = Vec::new();
    for _ in 0..4 {
        store.undo(1).unwrap();
        seen.push(a.get().and_then(|v| v.as_i64()));
    }
    assert_eq!(seen, vec![Some(2), Some(3), Some(2), Some(3)]);
}

#[test]
fn anchored_undo_reaches_initial_state() {
    let store = Store::with_config(StoreConfig::default().with_undo_mode(UndoMode::Anchored));
    let a = store.scope(path!["a"]);
    a.set(1);
    a.set(2);
    a.set(3);

    store.undo(2).unwrap();
    assert_eq!(a.get(), Some(Value::Int(1)));
    store.undo(1).unwrap();
    assert_eq!(store.state(), Value::map());
    assert!(matches!(
        store.undo(1),
        Err(StoreError::UndoOutOfRange { steps: 1, available: 0 })
    ));
}

#[test]
fn state_subscribers_see_every_commit() {
    let store = Store::new();
    let states = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&states);
    let _sub = store.subscribe(move |state| s.borrow_mut().push(state.clone()));

    store.scope_with(path!["a"], 1);
    store.scope(path!["a"]).set(2);
    store.undo(1).unwrap();

    assert_eq!(
        *states.borrow(),
        vec![v(json!({"a": 1})), v(json!({"a": 2})), v(json!({"a": 1}))]
    );
}

#[test]
fn history_subscribers_run_last() {
    let store = Store::new();
    let a = store.scope(path!["a"]);
    let order = Rc::new(RefCell::new(Vec::new()));

    let o = Rc::clone(&order);
    let _h = store.history().subscribe(move |_| o.borrow_mut().push("history"));
    let o = Rc::clone(&order);
    let _p = a.subscribe(move |_| o.borrow_mut().push("path"));
    let o = Rc::clone(&order);
    let _s = store.subscribe(move |_| o.borrow_mut().push("state"));

    a.set(1);
    assert_eq!(*order.borrow(), vec!["state", "path", "history"]);
}
