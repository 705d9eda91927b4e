//! Property-based tests for normalized code comparison.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use mtc::normalize::{code_eq, normalize};
use proptest::prelude::*;

fn line() -> impl Strategy<Value = String> {
    "[a-z(){};=+ ]{0,12}"
}

fn indent() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), Just("\t".to_owned()), Just("    ".to_owned())]
}

proptest! {
    #[test]
    fn normalize_is_idempotent(lines in prop::collection::vec(line(), 0..8)) {
        let once = normalize(&lines.join("\n"));
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn layout_does_not_change_equality(
        lines in prop::collection::vec((indent(), line()), 0..8),
        crlf in any::<bool>(),
    ) {
        let plain: Vec<&str> = lines.iter().map(|(_, text)| text.as_str()).collect();
        let ending = if crlf { "\r\n" } else { "\n" };
        let laid_out: Vec<String> = lines
            .iter()
            .map(|(indent, text)| format!("{indent}{text}"))
            .collect();
        prop_assert!(code_eq(&plain.join("\n"), &laid_out.join(ending)));
    }
}
