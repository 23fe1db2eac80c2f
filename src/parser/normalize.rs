use std::sync::LazyLock;

use regex::Regex;

static SPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s\p{Zs}]{2,}").unwrap());

/// Replace line breaks and tabs with spaces.
pub fn flatten_lines(text: &str) -> String {
    text.replace(['\r', '\n', '\t'], " ")
}

/// Single-line prose: line breaks flattened, whitespace runs collapsed, ends trimmed.
pub fn normalize(text: &str) -> String {
    let flat = flatten_lines(text);
    SPACE_RUN_RE.replace_all(flat.trim(), " ").into_owned()
}
