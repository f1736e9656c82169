//! # Snapshot and Diff Engine
//!
//! Reconstructs what a command did to the filesystem without any OS change
//! notification API: the subtree under the working directory is walked before
//! and after the command, and the two snapshots are classified into
//! created, deleted, modified, and renamed sets.
//!
//! ## Checksums
//!
//! Each entry records size and modification time eagerly. The SHA-256 content
//! checksum is computed lazily, only when size and timestamp cannot settle a
//! decision. A before-snapshot can be primed with checksums for the paths a
//! command is about to touch, so content comparisons remain possible after
//! those files are gone.
//!
//! ## Rename inference
//!
//! Each deleted file is matched against the created files; the first created
//! file with identical content becomes its rename target. Matching is greedy
//! and iteration order between equal candidates is not part of the contract.
//! Files with accidentally identical content can therefore be paired
//! differently from what actually happened. When the original checksum was
//! never computed, identical size and modification time stand in for it.

use sha2::{Digest, Sha256};
use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

use crate::context::CommandContext;

/// Metadata captured for one path in a snapshot.
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub size: u64,
    pub modified: Option<SystemTime>,
    pub is_dir: bool,
    checksum: OnceCell<Option<String>>,
}

impl FileMetadata {
    fn from_fs(metadata: &std::fs::Metadata) -> Self {
        Self {
            size: metadata.len(),
            modified: metadata.modified().ok(),
            is_dir: metadata.is_dir(),
            checksum: OnceCell::new(),
        }
    }

    /// Size and timestamp both match.
    fn same_fingerprint(&self, other: &FileMetadata) -> bool {
        self.size == other.size && self.modified.is_some() && self.modified == other.modified
    }
}

/// Map of root-relative path to metadata at one point in time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    root: PathBuf,
    entries: BTreeMap<PathBuf, FileMetadata>,
}

impl Snapshot {
    /// Walk the subtree under `root`.
    ///
    /// A missing root yields an empty snapshot rather than an error, which
    /// covers commands that delete the directory they started in.
    pub fn capture(root: &Path) -> Self {
        let mut entries = BTreeMap::new();

        if root.is_dir() {
            for entry in WalkDir::new(root)
                .min_depth(1)
                .follow_links(false)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let Ok(relative) = entry.path().strip_prefix(root) else {
                    continue;
                };
                match entry.metadata() {
                    Ok(metadata) => {
                        entries.insert(relative.to_path_buf(), FileMetadata::from_fs(&metadata));
                    }
                    Err(e) => {
                        tracing::debug!("Skipping {:?} in snapshot: {}", entry.path(), e);
                    }
                }
            }
        }

        tracing::trace!("Captured snapshot of {:?}: {} entries", root, entries.len());
        Self {
            root: root.to_path_buf(),
            entries,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &BTreeMap<PathBuf, FileMetadata> {
        &self.entries
    }

    pub fn get(&self, relative: &Path) -> Option<&FileMetadata> {
        self.entries.get(relative)
    }

    pub fn contains(&self, relative: &Path) -> bool {
        self.entries.contains_key(relative)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Content checksum of a file entry, computed from disk on first use.
    ///
    /// Returns `None` for directories, unknown paths, and files that can no
    /// longer be read.
    pub fn checksum(&self, relative: &Path) -> Option<&str> {
        let entry = self.entries.get(relative)?;
        if entry.is_dir {
            return None;
        }
        entry
            .checksum
            .get_or_init(|| compute_checksum(&self.root.join(relative)))
            .as_deref()
    }

    /// Checksum only if it has already been computed.
    pub fn cached_checksum(&self, relative: &Path) -> Option<&str> {
        self.entries
            .get(relative)?
            .checksum
            .get()
            .and_then(|c| c.as_deref())
    }

    /// Compute checksums for every file at or below each of `paths`.
    ///
    /// Paths outside the snapshot root are ignored.
    pub fn prime_checksums(&self, paths: &[PathBuf]) {
        for path in paths {
            let Ok(prefix) = path.strip_prefix(&self.root) else {
                continue;
            };
            for (relative, entry) in &self.entries {
                if !entry.is_dir && relative.starts_with(prefix) {
                    let _ = self.checksum(relative);
                }
            }
        }
    }

    fn absolute(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }
}

fn compute_checksum(path: &Path) -> Option<String> {
    let mut file = File::open(path).ok()?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher).ok()?;
    Some(format!("{:x}", hasher.finalize()))
}

/// Classify the differences between two snapshots of the same root into the
/// context's created/deleted/modified/renamed fields.
pub fn diff(before: &Snapshot, after: &Snapshot, context: &mut CommandContext) {
    let created: BTreeSet<&PathBuf> = after
        .entries
        .keys()
        .filter(|p| !before.contains(p))
        .collect();
    let deleted: BTreeSet<&PathBuf> = before
        .entries
        .keys()
        .filter(|p| !after.contains(p))
        .collect();

    for (relative, old) in &before.entries {
        let Some(new) = after.get(relative) else {
            continue;
        };
        if is_modified(before, after, relative, old, new) {
            context.modified.insert(before.absolute(relative));
        }
    }

    let renames = infer_renames(before, after, &deleted, &created);

    context
        .created
        .extend(created.iter().map(|p| after.absolute(p)));
    context
        .deleted
        .extend(deleted.iter().map(|p| before.absolute(p)));
    for (from, to) in renames {
        context.record_rename(before.absolute(from), after.absolute(to));
    }

    tracing::debug!(
        "Diff of {:?}: {} created, {} deleted, {} modified, {} renamed",
        before.root,
        context.created.len(),
        context.deleted.len(),
        context.modified.len(),
        context.renamed.len()
    );
}

fn is_modified(
    before: &Snapshot,
    after: &Snapshot,
    relative: &Path,
    old: &FileMetadata,
    new: &FileMetadata,
) -> bool {
    if old.is_dir != new.is_dir {
        return true;
    }
    if old.is_dir || old.same_fingerprint(new) {
        return false;
    }
    // Size or timestamp changed: only a matching original checksum clears it.
    match before.cached_checksum(relative) {
        Some(original) => after.checksum(relative) != Some(original),
        None => true,
    }
}

fn infer_renames<'a>(
    before: &Snapshot,
    after: &Snapshot,
    deleted: &BTreeSet<&'a PathBuf>,
    created: &BTreeSet<&'a PathBuf>,
) -> Vec<(&'a PathBuf, &'a PathBuf)> {
    let mut pool: Vec<&PathBuf> = created
        .iter()
        .copied()
        .filter(|p| after.get(p).is_some_and(|m| !m.is_dir))
        .collect();
    let mut renames = Vec::new();

    for &gone in deleted {
        let Some(old) = before.get(gone) else {
            continue;
        };
        if old.is_dir {
            continue;
        }

        let found = pool.iter().position(|candidate| {
            let Some(new) = after.get(candidate) else {
                return false;
            };
            if new.size != old.size {
                return false;
            }
            match before.cached_checksum(gone) {
                Some(original) => after.checksum(candidate) == Some(original),
                None => old.same_fingerprint(new),
            }
        });

        if let Some(index) = found {
            renames.push((gone, pool.remove(index)));
        }
    }

    renames
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn bump_mtime(path: &Path) {
        let file = fs::OpenOptions::new().write(true).open(path).unwrap();
        let later = SystemTime::now() + Duration::from_secs(120);
        file.set_modified(later).unwrap();
    }

    #[test]
    fn test_capture_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        let snapshot = Snapshot::capture(&temp.path().join("gone"));
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_capture_records_files_and_directories() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("dir")).unwrap();
        fs::write(temp.path().join("dir/a.txt"), "alpha").unwrap();

        let snapshot = Snapshot::capture(temp.path());
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.get(Path::new("dir")).unwrap().is_dir);
        assert_eq!(snapshot.get(Path::new("dir/a.txt")).unwrap().size, 5);
    }

    #[test]
    fn test_checksum_is_lazy() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "alpha").unwrap();

        let snapshot = Snapshot::capture(temp.path());
        assert!(snapshot.cached_checksum(Path::new("a.txt")).is_none());
        let sum = snapshot.checksum(Path::new("a.txt")).unwrap().to_string();
        assert_eq!(snapshot.cached_checksum(Path::new("a.txt")), Some(sum.as_str()));
    }

    #[test]
    fn test_diff_created_and_deleted() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("old.txt"), "one").unwrap();

        let before = Snapshot::capture(root);
        fs::remove_file(root.join("old.txt")).unwrap();
        fs::write(root.join("fresh.txt"), "different").unwrap();
        let after = Snapshot::capture(root);

        let mut ctx = CommandContext::new("rm", root);
        diff(&before, &after, &mut ctx);

        assert!(ctx.created.contains(&root.join("fresh.txt")));
        assert!(ctx.deleted.contains(&root.join("old.txt")));
        assert!(ctx.renamed.is_empty());
    }

    #[test]
    fn test_diff_detects_size_change_as_modified() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("log.txt"), "one").unwrap();

        let before = Snapshot::capture(root);
        fs::write(root.join("log.txt"), "one two three").unwrap();
        let after = Snapshot::capture(root);

        let mut ctx = CommandContext::new("touch", root);
        diff(&before, &after, &mut ctx);
        assert_eq!(ctx.modified.len(), 1);
        assert!(ctx.modified.contains(&root.join("log.txt")));
    }

    #[test]
    fn test_diff_touched_but_identical_content_is_not_modified_when_primed() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let file = root.join("same.txt");
        fs::write(&file, "stable").unwrap();

        let before = Snapshot::capture(root);
        before.prime_checksums(std::slice::from_ref(&file));
        bump_mtime(&file);
        let after = Snapshot::capture(root);

        let mut ctx = CommandContext::new("touch", root);
        diff(&before, &after, &mut ctx);
        assert!(ctx.modified.is_empty());
    }

    #[test]
    fn test_diff_timestamp_change_without_checksum_is_modified() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let file = root.join("same.txt");
        fs::write(&file, "stable").unwrap();

        let before = Snapshot::capture(root);
        bump_mtime(&file);
        let after = Snapshot::capture(root);

        let mut ctx = CommandContext::new("touch", root);
        diff(&before, &after, &mut ctx);
        assert!(ctx.modified.contains(&file));
    }

    #[test]
    fn test_rename_inferred_from_primed_checksum() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("a.txt"), "payload").unwrap();

        let before = Snapshot::capture(root);
        before.prime_checksums(&[root.join("a.txt")]);
        fs::rename(root.join("a.txt"), root.join("b.txt")).unwrap();
        let after = Snapshot::capture(root);

        let mut ctx = CommandContext::new("mv", root);
        diff(&before, &after, &mut ctx);

        assert_eq!(ctx.renamed.get(&root.join("a.txt")), Some(&root.join("b.txt")));
        assert!(ctx.created.is_empty());
        assert!(ctx.deleted.is_empty());
        assert!(ctx.is_consistent());
    }

    #[test]
    fn test_rename_inferred_from_fingerprint_without_checksum() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("a.txt"), "payload").unwrap();

        let before = Snapshot::capture(root);
        fs::rename(root.join("a.txt"), root.join("b.txt")).unwrap();
        let after = Snapshot::capture(root);

        let mut ctx = CommandContext::new("mv", root);
        diff(&before, &after, &mut ctx);
        assert_eq!(ctx.renamed.len(), 1);
        assert!(ctx.is_consistent());
    }

    #[test]
    fn test_no_rename_when_content_differs() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("a.txt"), "payload").unwrap();

        let before = Snapshot::capture(root);
        before.prime_checksums(&[root.join("a.txt")]);
        fs::remove_file(root.join("a.txt")).unwrap();
        fs::write(root.join("b.txt"), "PAYLOAD").unwrap();
        let after = Snapshot::capture(root);

        let mut ctx = CommandContext::new("rm", root);
        diff(&before, &after, &mut ctx);
        assert!(ctx.renamed.is_empty());
        assert_eq!(ctx.created.len(), 1);
        assert_eq!(ctx.deleted.len(), 1);
    }

    #[test]
    fn test_each_created_file_pairs_with_at_most_one_deleted() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("a.txt"), "twin").unwrap();
        fs::write(root.join("b.txt"), "twin").unwrap();

        let before = Snapshot::capture(root);
        before.prime_checksums(&[root.to_path_buf()]);
        fs::remove_file(root.join("a.txt")).unwrap();
        fs::rename(root.join("b.txt"), root.join("c.txt")).unwrap();
        let after = Snapshot::capture(root);

        let mut ctx = CommandContext::new("rm", root);
        diff(&before, &after, &mut ctx);
        assert_eq!(ctx.renamed.len(), 1);
        assert_eq!(ctx.deleted.len(), 1);
        assert!(ctx.created.is_empty());
        assert!(ctx.is_consistent());
    }
}
