//! Moving files into their category folders.
//!
//! The [`Organizer`] walks a target directory, classifies every regular file by
//! extension and moves it into `Sorted <Category>` (or `Others`) directly under
//! the target root. Files already inside one of those folders are never
//! touched again, and an existing file at the destination is never
//! overwritten: the incoming file gets a ` (n)` suffix instead.

use crate::config::CompiledFilters;
use crate::file_category::{Category, ExtensionIndex};
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashSet};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Errors that can occur while organizing a directory.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The target root does not exist.
    #[error("The specified directory does not exist: {}", .0.display())]
    RootNotFound(PathBuf),
    /// The target root exists but is not a directory.
    #[error("The specified path is not a directory: {}", .0.display())]
    RootNotADirectory(PathBuf),
    /// Something other than a directory already sits on an output folder name.
    #[error(
        "Cannot create output folder {}: a non-directory entry with that name exists",
        .0.display()
    )]
    OutputFolderBlocked(PathBuf),
    /// A category folder could not be created.
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A file could not be moved to its destination.
    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
    /// An entry could not be read while walking the tree.
    #[error("Failed to read directory entry: {0}")]
    Walk(#[from] walkdir::Error),
}

impl OrganizeError {
    /// True for errors that stop a run before anything is touched.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            OrganizeError::RootNotFound(_)
                | OrganizeError::RootNotADirectory(_)
                | OrganizeError::OutputFolderBlocked(_)
        )
    }
}

/// Result type for organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// A single successful move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub category: Category,
}

impl MoveRecord {
    /// File name of the moved file as it was before the move.
    pub fn file_name(&self) -> String {
        display_name(&self.source)
    }
}

/// What happened to one file during a run.
#[derive(Debug)]
pub enum FileOutcome {
    Moved(MoveRecord),
    Failed { path: PathBuf, error: OrganizeError },
    /// Left in place by the exclusion rules.
    Excluded(PathBuf),
}

/// Aggregated outcomes of a run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub moved: Vec<MoveRecord>,
    pub failed: Vec<(PathBuf, OrganizeError)>,
    pub excluded: Vec<PathBuf>,
}

impl RunReport {
    fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Moved(record) => self.moved.push(record),
            FileOutcome::Failed { path, error } => self.failed.push((path, error)),
            FileOutcome::Excluded(path) => self.excluded.push(path),
        }
    }

    /// Number of files this run looked at.
    pub fn total_processed(&self) -> usize {
        self.moved.len() + self.failed.len() + self.excluded.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Moved files per destination folder name, sorted by folder name.
    pub fn counts_by_folder(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.moved {
            *counts.entry(record.category.folder_name()).or_insert(0) += 1;
        }
        counts
    }
}

/// Receives progress notifications during [`Organizer::run_with`].
pub trait RunObserver {
    /// Called once with the number of regular files about to be processed.
    fn on_start(&mut self, _candidates: usize) {}

    /// Called after each file has been handled.
    fn on_outcome(&mut self, _outcome: &FileOutcome) {}
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// Sorts the files of a directory tree into category folders.
#[derive(Debug)]
pub struct Organizer {
    index: ExtensionIndex,
    filters: CompiledFilters,
    output_folders: HashSet<String>,
}

impl Organizer {
    /// Creates an organizer using `index` and no exclusion rules.
    pub fn new(index: ExtensionIndex) -> Self {
        Self::with_filters(index, CompiledFilters::default())
    }

    /// Creates an organizer that leaves files rejected by `filters` in place.
    pub fn with_filters(index: ExtensionIndex, filters: CompiledFilters) -> Self {
        let output_folders = index.output_folders();
        Self {
            index,
            filters,
            output_folders,
        }
    }

    /// Names of the folders this organizer sorts into.
    pub fn output_folders(&self) -> &HashSet<String> {
        &self.output_folders
    }

    /// Creates every output folder directly under `root`.
    ///
    /// Existing folders are left as they are, so calling this repeatedly is
    /// harmless. Nothing is created when `root` is not an existing directory
    /// or when any output folder name is taken by a non-directory.
    pub fn prepare(&self, root: &Path) -> OrganizeResult<()> {
        validate_root(root)?;

        let mut folders: Vec<PathBuf> = self
            .output_folders
            .iter()
            .map(|name| root.join(name))
            .collect();
        folders.sort();
        if let Some(blocked) = folders.iter().find(|path| occupied_by_non_dir(path)) {
            return Err(OrganizeError::OutputFolderBlocked(blocked.clone()));
        }
        for folder in &folders {
            ensure_dir(folder)?;
        }

        info!(
            "Prepared {} output folders under {}",
            self.output_folders.len(),
            root.display()
        );
        Ok(())
    }

    /// Organizes `root` without progress reporting.
    pub fn run(&self, root: &Path) -> OrganizeResult<RunReport> {
        self.run_with(root, &mut NoopObserver)
    }

    /// Organizes every regular file under `root`, reporting to `observer`.
    ///
    /// Returns an error only when `root` is missing or not a directory, in
    /// which case the filesystem is left untouched. Failures on individual
    /// files are recorded in the report and do not stop the run.
    pub fn run_with(
        &self,
        root: &Path,
        observer: &mut dyn RunObserver,
    ) -> OrganizeResult<RunReport> {
        validate_root(root)?;

        let candidates = self.collect_candidates(root);
        observer.on_start(candidates.len());

        let mut report = RunReport::default();
        for candidate in candidates {
            let outcome = match candidate {
                Ok(path) => self.organize_file(root, &path),
                Err(error) => FileOutcome::Failed {
                    path: error_path(&error, root),
                    error,
                },
            };
            observer.on_outcome(&outcome);
            report.record(outcome);
        }

        info!(
            "Run over {} finished: {} moved, {} failed, {} excluded",
            root.display(),
            report.moved.len(),
            report.failed.len(),
            report.excluded.len()
        );
        Ok(report)
    }

    /// Lists every regular file under `root` outside the output folders.
    ///
    /// Output folders are pruned from the walk entirely. Symlinks are not
    /// followed, but a link whose target is a regular file counts as a file
    /// and is moved as a link.
    fn collect_candidates(&self, root: &Path) -> Vec<OrganizeResult<PathBuf>> {
        WalkDir::new(root)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| {
                let organized = entry
                    .path()
                    .strip_prefix(root)
                    .map(|rel| is_already_organized(rel, &self.output_folders))
                    .unwrap_or(false);
                if organized && entry.depth() == 1 {
                    debug!("Skipping output folder {}", entry.path().display());
                }
                !organized
            })
            .filter_map(|entry| match entry {
                Ok(entry) if is_file_entry(&entry) => Some(Ok(entry.into_path())),
                Ok(_) => None,
                Err(e) => Some(Err(OrganizeError::from(e))),
            })
            .collect()
    }

    /// Classifies, resolves and moves one file.
    fn organize_file(&self, root: &Path, path: &Path) -> FileOutcome {
        let rel_path = path.strip_prefix(root).unwrap_or(path);
        if !self.filters.should_include(rel_path) {
            debug!("Excluded by filters: {}", rel_path.display());
            return FileOutcome::Excluded(path.to_path_buf());
        }

        let category = self.index.classify_path(path);
        let folder = root.join(category.folder_name());

        match self.move_into(path, &folder) {
            Ok(destination) => FileOutcome::Moved(MoveRecord {
                source: path.to_path_buf(),
                destination,
                category,
            }),
            Err(error) => FileOutcome::Failed {
                path: path.to_path_buf(),
                error,
            },
        }
    }

    fn move_into(&self, path: &Path, folder: &Path) -> OrganizeResult<PathBuf> {
        // The folder may have been removed since prepare().
        ensure_dir(folder)?;

        let file_name = path.file_name().ok_or_else(|| OrganizeError::FileMoveFailure {
            from: path.to_path_buf(),
            to: folder.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "file has no name component"),
        })?;

        let destination = resolve_destination(folder, file_name);
        debug!("Moving {} -> {}", path.display(), destination.display());

        move_file(path, &destination).map_err(|source| OrganizeError::FileMoveFailure {
            from: path.to_path_buf(),
            to: destination.clone(),
            source,
        })?;
        Ok(destination)
    }
}

/// Returns true when `rel_path` lies inside one of `output_folders`.
///
/// Only the first component of the path (relative to the target root) is
/// checked.
///
/// ```
/// use sortfolder::file_organizer::is_already_organized;
/// use std::collections::HashSet;
/// use std::path::Path;
///
/// let folders: HashSet<String> = ["Sorted PDFs".to_string()].into();
/// assert!(is_already_organized(Path::new("Sorted PDFs/report.pdf"), &folders));
/// assert!(!is_already_organized(Path::new("inbox/Sorted PDFs/report.pdf"), &folders));
/// ```
pub fn is_already_organized(rel_path: &Path, output_folders: &HashSet<String>) -> bool {
    match rel_path.components().next() {
        Some(Component::Normal(first)) => first
            .to_str()
            .is_some_and(|name| output_folders.contains(name)),
        _ => false,
    }
}

/// Picks a free path for `file_name` inside `folder`.
///
/// Returns `folder/file_name` when nothing exists there, otherwise the first
/// free `folder/"{stem} ({n}){suffix}"` for n = 1, 2, ... The filesystem is
/// queried at every step.
pub fn resolve_destination(folder: &Path, file_name: &OsStr) -> PathBuf {
    let candidate = folder.join(file_name);
    if !path_occupied(&candidate) {
        return candidate;
    }

    let name = Path::new(file_name);
    let stem = name.file_stem().unwrap_or(file_name);
    let suffix = name
        .extension()
        .map(|ext| {
            let mut suffix = OsString::from(".");
            suffix.push(ext);
            suffix
        })
        .unwrap_or_default();

    let mut counter: u64 = 1;
    loop {
        let mut numbered = stem.to_os_string();
        numbered.push(format!(" ({})", counter));
        numbered.push(&suffix);
        let candidate = folder.join(numbered);
        if !path_occupied(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Moves `from` to `to`, copying across filesystems when a rename cannot.
///
/// On success exactly one copy of the data exists, at `to`.
pub fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            warn!(
                "{} is on another device, falling back to copy",
                from.display()
            );
            copy_then_remove(from, to)
        }
        Err(e) => Err(e),
    }
}

fn copy_then_remove(from: &Path, to: &Path) -> io::Result<()> {
    if let Err(e) = copy_entry(from, to) {
        discard_partial_copy(to);
        return Err(e);
    }
    if let Err(e) = fs::remove_file(from) {
        discard_partial_copy(to);
        return Err(e);
    }
    Ok(())
}

/// Copies a regular file, or recreates a symlink so it keeps pointing at the
/// same target.
fn copy_entry(from: &Path, to: &Path) -> io::Result<()> {
    if fs::symlink_metadata(from)?.file_type().is_symlink() {
        return copy_symlink(from, to);
    }
    fs::copy(from, to).map(|_| ())
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(from)?, to)
}

#[cfg(windows)]
fn copy_symlink(from: &Path, to: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(fs::read_link(from)?, to)
}

#[cfg(not(any(unix, windows)))]
fn copy_symlink(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to).map(|_| ())
}

fn discard_partial_copy(path: &Path) {
    if let Err(e) = fs::remove_file(path)
        && e.kind() != io::ErrorKind::NotFound
    {
        warn!("Could not remove copy at {}: {}", path.display(), e);
    }
}

/// Regular files, plus symlinks that resolve to a regular file. Links to
/// directories and dangling links are skipped.
fn is_file_entry(entry: &walkdir::DirEntry) -> bool {
    let file_type = entry.file_type();
    if file_type.is_file() {
        return true;
    }
    file_type.is_symlink() && fs::metadata(entry.path()).is_ok_and(|meta| meta.is_file())
}

fn validate_root(root: &Path) -> OrganizeResult<()> {
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(OrganizeError::RootNotADirectory(root.to_path_buf())),
        Err(_) => Err(OrganizeError::RootNotFound(root.to_path_buf())),
    }
}

fn ensure_dir(path: &Path) -> OrganizeResult<()> {
    fs::create_dir_all(path).map_err(|source| OrganizeError::DirectoryCreationFailed {
        path: path.to_path_buf(),
        source,
    })
}

fn path_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

// Symlinks to directories are fine; create_dir_all accepts them.
fn occupied_by_non_dir(path: &Path) -> bool {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => false,
        Ok(_) => !fs::metadata(path).is_ok_and(|meta| meta.is_dir()),
        Err(_) => false,
    }
}

fn error_path(error: &OrganizeError, root: &Path) -> PathBuf {
    match error {
        OrganizeError::Walk(e) => e.path().unwrap_or(root).to_path_buf(),
        _ => root.to_path_buf(),
    }
}

/// File name of `path` for display, falling back to the whole path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn organizer() -> Organizer {
        Organizer::new(ExtensionIndex::default())
    }

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, content).expect("Failed to write test file");
        path
    }

    fn reserved() -> HashSet<String> {
        ExtensionIndex::default().output_folders()
    }

    #[test]
    fn test_already_organized_checks_first_component_only() {
        let folders = reserved();
        assert!(is_already_organized(Path::new("Sorted PDFs/a.pdf"), &folders));
        assert!(is_already_organized(Path::new("Others/deep/x.bin"), &folders));
        assert!(is_already_organized(Path::new("Sorted Images"), &folders));
        assert!(!is_already_organized(Path::new("a.pdf"), &folders));
        assert!(!is_already_organized(Path::new("inbox/Others/x.bin"), &folders));
        assert!(!is_already_organized(Path::new("Sorted Stuff/x.bin"), &folders));
        assert!(!is_already_organized(Path::new(""), &folders));
    }

    #[test]
    fn test_resolve_destination_free_name() {
        let temp_dir = TempDir::new().unwrap();
        let dest = resolve_destination(temp_dir.path(), OsStr::new("report.pdf"));
        assert_eq!(dest, temp_dir.path().join("report.pdf"));
    }

    #[test]
    fn test_resolve_destination_counts_up() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "report.pdf", "a");
        write(temp_dir.path(), "report (1).pdf", "b");

        let dest = resolve_destination(temp_dir.path(), OsStr::new("report.pdf"));
        assert_eq!(dest, temp_dir.path().join("report (2).pdf"));
    }

    #[test]
    fn test_resolve_destination_keeps_inner_dots_in_stem() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "backup.tar.gz", "a");
        write(temp_dir.path(), "Makefile", "b");

        assert_eq!(
            resolve_destination(temp_dir.path(), OsStr::new("backup.tar.gz")),
            temp_dir.path().join("backup.tar (1).gz")
        );
        assert_eq!(
            resolve_destination(temp_dir.path(), OsStr::new("Makefile")),
            temp_dir.path().join("Makefile (1)")
        );
    }

    #[test]
    fn test_resolve_destination_treats_directories_as_occupied() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("notes.txt")).unwrap();

        assert_eq!(
            resolve_destination(temp_dir.path(), OsStr::new("notes.txt")),
            temp_dir.path().join("notes (1).txt")
        );
    }

    #[test]
    fn test_move_file_renames() {
        let temp_dir = TempDir::new().unwrap();
        let from = write(temp_dir.path(), "a.txt", "content");
        let to = temp_dir.path().join("b.txt");

        move_file(&from, &to).unwrap();

        assert!(!from.exists());
        assert_eq!(fs::read_to_string(&to).unwrap(), "content");
    }

    #[test]
    fn test_copy_then_remove_leaves_one_copy() {
        let temp_dir = TempDir::new().unwrap();
        let from = write(temp_dir.path(), "a.txt", "content");
        let to = temp_dir.path().join("b.txt");

        copy_then_remove(&from, &to).unwrap();

        assert!(!from.exists());
        assert_eq!(fs::read_to_string(&to).unwrap(), "content");
    }

    #[test]
    fn test_copy_then_remove_missing_source_leaves_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("gone.txt");
        let to = temp_dir.path().join("b.txt");

        assert!(copy_then_remove(&from, &to).is_err());
        assert!(!to.exists());
    }

    #[test]
    fn test_prepare_creates_all_folders_idempotently() {
        let temp_dir = TempDir::new().unwrap();
        let organizer = organizer();

        organizer.prepare(temp_dir.path()).unwrap();
        write(temp_dir.path(), "Sorted PDFs/keep.pdf", "keep");
        organizer.prepare(temp_dir.path()).unwrap();

        for name in organizer.output_folders() {
            assert!(temp_dir.path().join(name).is_dir(), "missing {}", name);
        }
        assert!(temp_dir.path().join("Sorted PDFs/keep.pdf").exists());
    }

    #[test]
    fn test_prepare_rejects_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");

        let err = organizer().prepare(&missing).unwrap_err();
        assert!(err.is_precondition());
        assert!(!missing.exists());
    }

    #[test]
    fn test_prepare_blocked_folder_creates_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "Sorted PDFs", "not a directory");

        let err = organizer().prepare(root).unwrap_err();

        assert!(matches!(
            &err,
            OrganizeError::OutputFolderBlocked(path) if path == &root.join("Sorted PDFs")
        ));
        assert!(err.is_precondition());
        let entries: Vec<_> = fs::read_dir(root).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert!(!root.join("Others").exists());
        assert!(!root.join("Sorted Archives").exists());
    }

    #[test]
    fn test_run_rejects_file_root() {
        let temp_dir = TempDir::new().unwrap();
        let file = write(temp_dir.path(), "plain.txt", "x");

        let err = organizer().run(&file).unwrap_err();
        assert!(matches!(err, OrganizeError::RootNotADirectory(_)));
        assert_eq!(fs::read_to_string(&file).unwrap(), "x");
    }

    #[test]
    fn test_run_moves_by_category() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "report.pdf", "pdf");
        write(root, "photo.JPG", "jpg");
        write(root, "notes.unknownext", "?");

        let report = organizer().run(root).unwrap();

        assert_eq!(report.moved.len(), 3);
        assert!(report.is_complete_success());
        assert!(root.join("Sorted PDFs/report.pdf").is_file());
        assert!(root.join("Sorted Images/photo.JPG").is_file());
        assert!(root.join("Others/notes.unknownext").is_file());
        assert!(!root.join("report.pdf").exists());
    }

    #[test]
    fn test_run_flattens_nested_files_and_keeps_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "inbox/2024/song.mp3", "mp3");

        organizer().run(root).unwrap();

        assert!(root.join("Sorted Audio/song.mp3").is_file());
        assert!(root.join("inbox/2024").is_dir());
    }

    #[test]
    fn test_run_never_touches_output_folders() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "Sorted PDFs/misplaced.mp3", "stay");
        write(root, "Others/keep.pdf", "stay");

        let report = organizer().run(root).unwrap();

        assert!(report.moved.is_empty());
        assert!(root.join("Sorted PDFs/misplaced.mp3").is_file());
        assert!(root.join("Others/keep.pdf").is_file());
    }

    #[test]
    fn test_run_continues_after_a_failure() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        // A regular file squatting on the PDF folder name blocks PDF moves.
        write(root, "Sorted PDFs", "not a directory");
        write(root, "report.pdf", "pdf");
        write(root, "photo.png", "png");

        let report = organizer().run(root).unwrap();

        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, root.join("report.pdf"));
        assert!(root.join("report.pdf").is_file());
        assert!(root.join("Sorted Images/photo.png").is_file());
        assert_eq!(
            fs::read_to_string(root.join("Sorted PDFs")).unwrap(),
            "not a directory"
        );
    }

    #[test]
    fn test_run_reports_excluded_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "movie.mp4.part", "partial");
        write(root, "movie2.mp4", "done");

        let filters = crate::config::FilterConfig::from_toml(
            "[filters.exclude]\nextensions = [\"part\"]\n",
        )
        .unwrap()
        .compile()
        .unwrap();
        let organizer = Organizer::with_filters(ExtensionIndex::default(), filters);

        let report = organizer.run(root).unwrap();

        assert_eq!(report.excluded, vec![root.join("movie.mp4.part")]);
        assert!(root.join("movie.mp4.part").is_file());
        assert!(root.join("Sorted Videos/movie2.mp4").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_moves_file_symlinks_as_links() {
        let outside = TempDir::new().unwrap();
        let target = write(outside.path(), "real.txt", "data");
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::os::unix::fs::symlink(&target, root.join("link.txt")).unwrap();

        let report = organizer().run(root).unwrap();

        assert_eq!(report.moved.len(), 1);
        let moved = root.join("Sorted Documents/link.txt");
        assert!(fs::symlink_metadata(&moved).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&moved).unwrap(), target);
        assert!(fs::symlink_metadata(root.join("link.txt")).is_err());
        assert_eq!(fs::read_to_string(&target).unwrap(), "data");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_leaves_directory_and_dangling_links() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "inbox/a.txt", "a");
        std::os::unix::fs::symlink(root.join("inbox"), root.join("inbox-link")).unwrap();
        std::os::unix::fs::symlink(root.join("gone.pdf"), root.join("dangling.pdf")).unwrap();

        let report = organizer().run(root).unwrap();

        assert_eq!(report.moved.len(), 1);
        assert!(root.join("Sorted Documents/a.txt").is_file());
        for link in ["inbox-link", "dangling.pdf"] {
            let meta = fs::symlink_metadata(root.join(link)).unwrap();
            assert!(meta.file_type().is_symlink(), "{} was moved", link);
        }
        assert!(!root.join("Sorted PDFs").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_then_remove_recreates_symlink() {
        let temp_dir = TempDir::new().unwrap();
        let target = write(temp_dir.path(), "real.txt", "data");
        let from = temp_dir.path().join("link.txt");
        std::os::unix::fs::symlink(&target, &from).unwrap();
        let to = temp_dir.path().join("moved.txt");

        copy_then_remove(&from, &to).unwrap();

        assert!(fs::symlink_metadata(&from).is_err());
        assert_eq!(fs::read_link(&to).unwrap(), target);
        assert!(target.is_file());
    }

    #[test]
    fn test_observer_sees_every_outcome() {
        #[derive(Default)]
        struct Recorder {
            started: Option<usize>,
            outcomes: usize,
        }
        impl RunObserver for Recorder {
            fn on_start(&mut self, candidates: usize) {
                self.started = Some(candidates);
            }
            fn on_outcome(&mut self, _outcome: &FileOutcome) {
                self.outcomes += 1;
            }
        }

        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "a.txt", "a");
        write(temp_dir.path(), "b.zip", "b");

        let mut recorder = Recorder::default();
        organizer()
            .run_with(temp_dir.path(), &mut recorder)
            .unwrap();

        assert_eq!(recorder.started, Some(2));
        assert_eq!(recorder.outcomes, 2);
    }

    #[test]
    fn test_counts_by_folder() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "a.txt", "a");
        write(temp_dir.path(), "b.txt", "b");
        write(temp_dir.path(), "c.xyz", "c");

        let report = organizer().run(temp_dir.path()).unwrap();
        let counts = report.counts_by_folder();

        assert_eq!(counts.get("Sorted Documents"), Some(&2));
        assert_eq!(counts.get("Others"), Some(&1));
        assert_eq!(report.total_processed(), 3);
    }
}
