//! Input-file reading.
//!
//! Trace and config files share the same line discipline: blank lines
//! and `#` comments (whole-line or trailing) are stripped before the
//! remaining lines reach the parsers.

use std::io;
use std::path::Path;

/// Read a file and return its meaningful lines, in order.
pub fn read_input_lines(path: &Path) -> io::Result<Vec<String>> {
    Ok(clean_lines(&std::fs::read_to_string(path)?))
}

/// Strip blank lines and comments; trim what remains.
pub fn clean_lines(raw: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = match line.split_once('#') {
            Some((before, _)) => before.trim(),
            None => line,
        };
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
    lines
}
