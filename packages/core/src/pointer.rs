//! RFC 6901 JSON pointer construction for finding paths.

/// Escape a single reference token: `~` → `~0`, `/` → `~1`.
pub fn escape(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Append `token` to the pointer `base`.
///
/// ```rust
/// use envelint::pointer::join;
///
/// assert_eq!(join("", "data"), "/data");
/// assert_eq!(join("/data", "a/b"), "/data/a~1b");
/// ```
pub fn join(base: &str, token: &str) -> String {
    format!("{base}/{}", escape(token))
}

/// Append an array index to the pointer `base`.
pub fn join_index(base: &str, index: usize) -> String {
    format!("{base}/{index}")
}
