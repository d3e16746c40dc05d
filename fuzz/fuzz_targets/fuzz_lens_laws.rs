#![no_main]

use kaleido_value::{Key, Lens, Path, Value};
use libfuzzer_sys::fuzz_target;

/// Indices are folded into a small range so padding stays bounded.
fn clamp(keys: Vec<Key>) -> Path {
    keys.into_iter()
        .take(8)
        .map(|key| match key {
            Key::Index(i) => Key::Index(i % 16),
            Key::Field(f) => Key::Field(f.chars().take(4).collect()),
        })
        .collect()
}

/// A numeric field addresses the same slot as the matching index.
fn aliases(path: &Path) -> bool {
    path.keys()
        .iter()
        .any(|key| !key.is_index() && key.to_index().is_some())
}

fuzz_target!(|input: (Vec<Key>, Vec<Key>, i64, i64)| {
    let (a, b, x, y) = input;
    let (a, b) = (Lens::new(clamp(a)), Lens::new(clamp(b)));
    let state = Value::map();

    let once = a.set(Value::Int(x), &state);
    assert_eq!(a.view(&once), Some(&Value::Int(x)));

    let twice = a.set(Value::Int(y), &once);
    assert_eq!(twice, a.set(Value::Int(y), &state));
    assert_eq!(a.view(&twice), Some(&Value::Int(y)));

    if a.path().overlaps(b.path()) || aliases(a.path()) || aliases(b.path()) {
        return;
    }
    let both = b.set(Value::Int(y), &once);
    assert_eq!(a.view(&both), Some(&Value::Int(x)));
    assert_eq!(b.view(&both), Some(&Value::Int(y)));
});
