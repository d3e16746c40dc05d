#![no_main]

use arbitrary::Arbitrary;
use kaleido_runtime::{Store, StoreConfig, UndoMode};
use kaleido_value::{Key, Path, Value};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Op {
    Watch(Vec<u8>),
    Set(Vec<u8>, i64),
    Undo(u8),
    Reset,
}

#[derive(Arbitrary, Debug)]
struct Input {
    anchored: bool,
    ops: Vec<Op>,
}

/// Small alphabet so paths collide, overlap and alias often.
fn path_from(bytes: &[u8]) -> Path {
    bytes
        .iter()
        .take(4)
        .map(|b| match b % 6 {
            0 => Key::Index(usize::from(b / 6 % 4)),
            1 => Key::Field((b / 6 % 4).to_string()),
            n => Key::Field(char::from(b'a' + n).to_string()),
        })
        .collect()
}

fuzz_target!(|input: Input| {
    let mode = if input.anchored {
        UndoMode::Anchored
    } else {
        UndoMode::Live
    };
    let store = Store::with_config(StoreConfig::default().with_undo_mode(mode));
    let mut watched = Vec::new();

    for op in input.ops.into_iter().take(64) {
        match op {
            Op::Watch(bytes) => watched.push(store.scope(path_from(&bytes))),
            Op::Set(bytes, n) => store.scope(path_from(&bytes)).set(n),
            Op::Undo(steps) => {
                let before = store.history().len();
                let written = store.undo(usize::from(steps % 8)).is_ok();
                assert_eq!(store.history().len(), before + usize::from(written));
            }
            Op::Reset => store.set_state(Value::map()),
        }
        assert_eq!(store.history().last(), Some(store.state()));
        for scope in &watched {
            assert_eq!(scope.stream().get(), scope.get(), "cell at {}", scope.path());
        }
    }
});
