//! Whitespace-insensitive comparison of generated code.
//!
//! Viewers promise structural equivalence, not byte-identical layout.
//! [`normalize`] canonicalizes the layout differences that carry no
//! meaning so that two renderings can be compared with [`code_eq`].

const TAB: &str = "    ";

/// Canonical layout of `code`.
///
/// Line endings become `\n`, tabs expand to four spaces, every line is
/// trimmed and empty lines are dropped. A closing brace followed by
/// `else` and an opening brace, across any whitespace, becomes
/// `} else {`.
pub fn normalize(code: &str) -> String {
    let code = code.replace("\r\n", "\n").replace('\t', TAB);
    let lines: Vec<&str> = code
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    collapse_else(&lines.join("\n"))
}

/// Whether `a` and `b` are the same code up to [`normalize`].
pub fn code_eq(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

fn collapse_else(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(brace) = rest.find('}') {
        out.push_str(&rest[..brace]);
        let after = &rest[brace + 1..];
        match else_block(after) {
            Some(consumed) => {
                out.push_str("} else {");
                rest = &after[consumed..];
            }
            None => {
                out.push('}');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Length of a `\s*else\s*{` prefix of `text`, if there is one.
fn else_block(text: &str) -> Option<usize> {
    let body = text.trim_start();
    let body = body.strip_prefix("else")?;
    let tail = body.trim_start();
    tail.starts_with('{')
        .then(|| text.len() - tail.len() + 1)
}
