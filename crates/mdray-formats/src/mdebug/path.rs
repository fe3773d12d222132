//! Lexical path handling.
//!
//! Paths recovered from legacy debug sections mix UNIX and Windows
//! conventions, sometimes within one section. Everything here is purely
//! lexical: no filesystem access, forward slashes in all output.

/// Joins a base directory and a path the way the compiler that emitted them
/// would have.
///
/// If `base` is empty, or `path` is already absolute (leading separator or a
/// `X:/` drive prefix), `path` wins on its own; otherwise the two are joined
/// and normalized.
pub fn merge_paths(base: &str, path: &str) -> String {
    let bytes = path.as_bytes();
    let is_absolute_unix = matches!(bytes.first(), Some(b'/') | Some(b'\\'));
    let is_absolute_windows = bytes.len() >= 3
        && bytes[1] == b':'
        && (bytes[2] == b'/' || bytes[2] == b'\\');

    if base.is_empty() || is_absolute_unix || is_absolute_windows {
        return normalize_path(path);
    }
    normalize_path(&format!("{}/{}", base, path))
}

/// Normalizes a path to forward slashes, collapsing `.` and `..` segments
/// and upper-casing a drive letter if one is present.
pub fn normalize_path(input: &str) -> String {
    let mut rest = input;
    let mut is_absolute = false;
    let mut drive_letter = None;

    let bytes = rest.as_bytes();
    if matches!(bytes.first(), Some(b'/') | Some(b'\\')) {
        // UNIX path, drive-relative Windows path or UNC Windows path.
        is_absolute = true;
    } else if bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'/' || bytes[2] == b'\\')
    {
        is_absolute = true;
        drive_letter = Some(bytes[0].to_ascii_uppercase() as char);
        rest = &rest[2..];
    }

    let mut parts: Vec<&str> = Vec::new();
    for part in rest.split(|c| c == '/' || c == '\\') {
        match part {
            "" | "." => {}
            ".." if matches!(parts.last(), Some(&prev) if prev != "..") => {
                parts.pop();
            }
            _ => parts.push(part),
        }
    }

    let mut output = String::new();
    if let Some(letter) = drive_letter {
        output.push(letter);
        output.push(':');
    }
    if is_absolute {
        output.push('/');
    }
    output.push_str(&parts.join("/"));
    output
}
