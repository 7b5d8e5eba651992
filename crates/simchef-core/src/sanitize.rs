//! Filesystem-safe path components.

/// Makes `name` usable as a single path component.
///
/// Replaces NUL, `/`, `\` and control characters with `_`; everything else
/// (including non-ASCII letters and spaces) is kept so that names stay
/// recognizable and mappings stay reversible. `.`/`..`/empty become `_`.
pub fn sanitize_component(name: &str) -> String {
    let out: String = name
        .chars()
        .map(|c| {
            if c == '\0' || c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    if out.is_empty() || out == "." || out == ".." {
        "_".to_string()
    } else {
        out
    }
}
