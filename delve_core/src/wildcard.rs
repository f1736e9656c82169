//! Wildcard expansion for command arguments.
//!
//! Every argument containing `*` or `?` is replaced by the sorted names of the
//! matching entries in the working directory (or in the literal directory
//! prefix of the pattern, e.g. `notes/*.txt`). A pattern that matches nothing
//! expands to nothing. The destination operand of `mv` is never expanded.
//!
//! Expansion runs before middleware so interceptors only ever see concrete
//! paths.

use globset::{GlobBuilder, GlobMatcher};
use std::path::Path;

/// Returns true if the argument contains a wildcard metacharacter.
pub fn is_pattern(arg: &str) -> bool {
    arg.contains('*') || arg.contains('?')
}

/// Expand wildcard arguments for `command` relative to `cwd`.
pub fn expand(args: &[String], command: &str, cwd: &Path) -> Vec<String> {
    let protected_last = command == "mv" && !args.is_empty();
    let mut expanded = Vec::with_capacity(args.len());

    for (index, arg) in args.iter().enumerate() {
        let is_destination = protected_last && index == args.len() - 1;
        if is_destination || !is_pattern(arg) {
            expanded.push(arg.clone());
            continue;
        }
        let matches = expand_pattern(arg, cwd);
        tracing::debug!("Expanded '{}' to {} entries", arg, matches.len());
        expanded.extend(matches);
    }

    expanded
}

/// Sorted entry names matching one pattern.
pub fn expand_pattern(pattern: &str, cwd: &Path) -> Vec<String> {
    let (dir_part, name_part) = match pattern.rfind('/') {
        Some(pos) => (Some(&pattern[..=pos]), &pattern[pos + 1..]),
        None => (None, pattern),
    };

    // Only the final component may carry wildcards.
    if dir_part.is_some_and(is_pattern) {
        return Vec::new();
    }

    let Some(matcher) = compile(name_part) else {
        return Vec::new();
    };
    let search_dir = match dir_part {
        Some(dir) => cwd.join(dir),
        None => cwd.to_path_buf(),
    };
    let Ok(read_dir) = std::fs::read_dir(&search_dir) else {
        return Vec::new();
    };

    let include_hidden = name_part.starts_with('.');
    let mut names: Vec<String> = read_dir
        .filter_map(|e| e.ok())
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| include_hidden || !name.starts_with('.'))
        .filter(|name| matcher.is_match(name))
        .collect();
    names.sort();

    match dir_part {
        Some(dir) => names.into_iter().map(|n| format!("{dir}{n}")).collect(),
        None => names,
    }
}

/// Build a matcher where only `*` and `?` are special.
fn compile(pattern: &str) -> Option<GlobMatcher> {
    let mut escaped = String::with_capacity(pattern.len());
    for ch in pattern.chars() {
        match ch {
            '[' | ']' | '{' | '}' => {
                escaped.push('[');
                escaped.push(ch);
                escaped.push(']');
            }
            _ => escaped.push(ch),
        }
    }

    GlobBuilder::new(&escaped)
        .literal_separator(true)
        .backslash_escape(false)
        .build()
        .map(|g| g.compile_matcher())
        .map_err(|e| tracing::debug!("Ignoring invalid pattern '{}': {}", pattern, e))
        .ok()
}
