//! Linux-safe path component sanitization.

/// Sanitizes one path component (directory or filename) for safe use on Linux.
///
/// Mirrored layouts turn URL path segments into real directories, so a
/// component must never escape its parent:
/// - Replaces NUL, `/`, `\`, and control characters with `_`
/// - Replaces spaces and tabs with `_`, collapsing runs of `_`
/// - Trims leading/trailing dots and underscores
/// - Limits length to 255 bytes (Linux NAME_MAX)
///
/// Returns an empty string when nothing survives (e.g. `"."` or `".."`);
/// callers pick their own fallback.
pub fn sanitize_component(segment: &str) -> String {
    const NAME_MAX: usize = 255;

    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        let keep = !(c == '\0' || c == '/' || c == '\\' || c == ' ' || c == '\t' || c.is_control());
        if keep {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');

    if trimmed.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        trimmed[..take].to_string()
    } else {
        trimmed.to_string()
    }
}
