#![no_main]

use kaleido_value::Path;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: &str| {
    // Parsing never panics; a parsed path prints back to an equal path.
    if let Ok(path) = input.parse::<Path>() {
        let again: Path = path
            .to_string()
            .parse()
            .unwrap_or_else(|_| panic!("display of {path:?} must reparse"));
        assert_eq!(again, path);
    }
});
