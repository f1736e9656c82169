use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Normalize a path lexically (without filesystem access).
///
/// `..` never climbs above the root component.
pub fn normalize_path_lexically(path: &Path) -> PathBuf {
    let mut stack = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match stack.last() {
                Some(Component::Normal(_)) => {
                    stack.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => stack.push(component),
            },
            c => stack.push(c),
        }
    }

    stack.iter().collect()
}

/// Resolve `arg` against `cwd` the way the boundary checks see it.
///
/// The deepest existing ancestor of the joined path is canonicalized, so a
/// symlink anywhere along the way cannot smuggle a target out of the root,
/// and the components that do not exist yet are appended to it. Returns
/// `None` when the path cannot be resolved safely: a `..` among the missing
/// components, or an existing entry that does not canonicalize (a dangling
/// symlink).
pub fn resolve_for_validation(cwd: &Path, arg: &str) -> Option<PathBuf> {
    let full_path = cwd.join(arg);
    let mut missing: Vec<&OsStr> = Vec::new();

    for ancestor in full_path.ancestors() {
        match std::fs::canonicalize(ancestor) {
            Ok(base) => {
                return Some(missing.iter().rev().fold(base, |acc, name| acc.join(name)));
            }
            Err(_) if std::fs::symlink_metadata(ancestor).is_ok() => return None,
            Err(_) => {}
        }

        match ancestor.components().next_back() {
            Some(Component::Normal(name)) => missing.push(name),
            Some(Component::CurDir) => {}
            _ => return None,
        }
    }

    None
}
