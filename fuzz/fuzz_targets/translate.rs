#![no_main]
use libfuzzer_sys::fuzz_target;

use ctrans::{parse_program, Scanner, Store};

fuzz_target!(|data: &str| {
    let _ = Scanner::scan_all(data);

    if let Ok(node) = parse_program(data) {
        let mut store = Store::new();
        let first = node.evaluate(&mut store);
        let code = node.generate_code();
        assert!(!code.contains("--"), "{code}");

        // a second run sees the variables of the first, and must agree
        if let Ok(first) = first {
            let second = node.evaluate(&mut store).unwrap();
            assert!(first == second || (first.is_nan() && second.is_nan()));
        }
    }
});
