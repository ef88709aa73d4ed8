use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::builders::provisioner::{DirectoryProvisioner, ProvisionOutcome};
use crate::builders::replacer::{LineRewriter, Substitution};
use crate::builders::staging::{SiblingStaging, StagedSink, StagingProvider, discard_scratch};
use crate::core::error::{Result, StoreError};

/// Counts gathered while an update rewrites a file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UpdateSummary {
    pub lines_scanned: usize,
    pub lines_changed: usize,
    pub replacements: usize,
}

/// Owns a single text file and exposes create, read, update and delete on it.
///
/// The store never caches contents or keeps a handle open between calls;
/// each operation opens what it needs and releases it before returning.
pub struct FileStore {
    path: PathBuf,
    provisioned: ProvisionOutcome,
    staging: Box<dyn StagingProvider>,
    sync_on_write: bool,
}

impl FileStore {
    /// Creates a store for `path`, creating its parent directory if missing.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_staging(path, Box::new(SiblingStaging::new()))
    }

    /// Like [`FileStore::new`], with a custom staging provider for updates.
    pub fn with_staging<P: AsRef<Path>>(
        path: P,
        staging: Box<dyn StagingProvider>,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if path.file_name().is_none() {
            return Err(StoreError::InvalidPath {
                path,
                reason: "path does not name a file".to_string(),
            });
        }

        let provisioned = DirectoryProvisioner::new().ensure_parent(&path)?;

        Ok(Self {
            path,
            provisioned,
            staging,
            sync_on_write: true,
        })
    }

    /// Controls whether writes are flushed to disk with `fsync` before the
    /// operation returns. On by default.
    pub fn with_sync(mut self, sync_on_write: bool) -> Self {
        self.sync_on_write = sync_on_write;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether constructing this store had to create the parent directory.
    pub fn provisioned(&self) -> ProvisionOutcome {
        self.provisioned
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Writes `contents` as the whole file, creating or truncating it.
    pub fn create(&self, contents: &str) -> Result<()> {
        let mut file =
            File::create(&self.path).map_err(|e| StoreError::unwritable(&self.path, e))?;
        file.write_all(contents.as_bytes())
            .map_err(|e| StoreError::unwritable(&self.path, e))?;
        if self.sync_on_write {
            file.sync_all()
                .map_err(|e| StoreError::unwritable(&self.path, e))?;
        }

        info!(path = %self.path.display(), bytes = contents.len(), "created file");
        Ok(())
    }

    /// Opens the file and returns its lines, terminators stripped.
    ///
    /// The iterator is lazy; call `read` again to start over from the top.
    pub fn read(&self) -> Result<Lines> {
        let file = File::open(&self.path).map_err(|e| StoreError::unreadable(&self.path, e))?;
        debug!(path = %self.path.display(), "opened file for reading");
        Ok(Lines {
            path: self.path.clone(),
            reader: BufReader::new(file),
            buf: String::new(),
            done: false,
        })
    }

    /// Returns the exact contents of the file, terminators included.
    pub fn read_to_string(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| StoreError::unreadable(&self.path, e))
    }

    /// Replaces every occurrence of `old` with `new`, line by line, and
    /// installs the result atomically.
    pub fn update(&self, old: &str, new: &str) -> Result<UpdateSummary> {
        let substitution = Substitution::new(old, new)?;
        self.rewrite(&substitution)
    }

    /// Runs `rewriter` over every line and atomically installs the output.
    ///
    /// The rewritten lines go to a temporary file first. Only once that file
    /// is completely written is it renamed over the target, so a failure at
    /// any earlier point leaves the original untouched. The temporary file is
    /// removed on every failure path.
    pub fn rewrite(&self, rewriter: &dyn LineRewriter) -> Result<UpdateSummary> {
        let source = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::FileNotFound {
                    path: self.path.clone(),
                });
            }
            Err(e) => return Err(StoreError::unreadable(&self.path, e)),
        };
        let permissions = source
            .metadata()
            .map_err(|e| StoreError::unreadable(&self.path, e))?
            .permissions();
        let install_path = self.resolve_install_path()?;

        let scratch = self.staging.scratch_path(&install_path);
        let sink = match self.staging.open_scratch(&scratch) {
            Ok(sink) => sink,
            Err(e) => {
                discard_scratch(&scratch);
                return Err(StoreError::temporary_write(&scratch, e));
            }
        };

        let summary = match self.copy_rewritten(BufReader::new(source), sink, rewriter, &scratch) {
            Ok(summary) => summary,
            Err(error) => {
                warn!(path = %self.path.display(), %error, "update aborted, original left intact");
                discard_scratch(&scratch);
                return Err(error);
            }
        };

        // The replacement takes over the target's mode, not the umask default.
        if let Err(e) = fs::set_permissions(&scratch, permissions) {
            discard_scratch(&scratch);
            return Err(StoreError::temporary_write(&scratch, e));
        }

        if let Err(source) = fs::rename(&scratch, &install_path) {
            discard_scratch(&scratch);
            return Err(StoreError::ReplaceFailed {
                path: install_path,
                temp_path: scratch,
                source,
            });
        }

        info!(
            path = %self.path.display(),
            replacements = summary.replacements,
            lines_changed = summary.lines_changed,
            "updated file"
        );
        Ok(summary)
    }

    /// Removes the file.
    pub fn delete(&self) -> Result<()> {
        fs::remove_file(&self.path).map_err(|source| StoreError::DeleteFailed {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), "deleted file");
        Ok(())
    }

    /// The file an update actually replaces.
    ///
    /// When the target is a symlink the rename must land on the file it
    /// points to; renaming over the link would swap the link for a regular
    /// file and leave the real file unchanged.
    fn resolve_install_path(&self) -> Result<PathBuf> {
        let metadata =
            fs::symlink_metadata(&self.path).map_err(|e| StoreError::unreadable(&self.path, e))?;
        if !metadata.file_type().is_symlink() {
            return Ok(self.path.clone());
        }

        let resolved =
            fs::canonicalize(&self.path).map_err(|e| StoreError::unreadable(&self.path, e))?;
        debug!(
            link = %self.path.display(),
            resolved = %resolved.display(),
            "updating symlink target"
        );
        Ok(resolved)
    }

    // The sink is consumed so its handle is closed before the caller renames.
    fn copy_rewritten(
        &self,
        mut reader: BufReader<File>,
        mut sink: Box<dyn StagedSink>,
        rewriter: &dyn LineRewriter,
        scratch: &Path,
    ) -> Result<UpdateSummary> {
        let mut summary = UpdateSummary::default();
        let mut buf = String::new();

        loop {
            buf.clear();
            let read = reader
                .read_line(&mut buf)
                .map_err(|e| StoreError::unreadable(&self.path, e))?;
            if read == 0 {
                break;
            }

            let (body, terminator) = split_terminator(&buf);
            let (text, count) = rewriter.rewrite_line(body);
            summary.lines_scanned += 1;
            if count > 0 {
                summary.lines_changed += 1;
                summary.replacements += count;
            }

            sink.write_all(text.as_bytes())
                .and_then(|()| sink.write_all(terminator.as_bytes()))
                .map_err(|e| StoreError::temporary_write(scratch, e))?;
        }

        sink.flush()
            .map_err(|e| StoreError::temporary_write(scratch, e))?;
        if self.sync_on_write {
            sink.sync()
                .map_err(|e| StoreError::temporary_write(scratch, e))?;
        }

        Ok(summary)
    }
}

/// Lazy line iterator returned by [`FileStore::read`].
///
/// Yields each line without its `\n` or `\r\n`. After the first error the
/// iterator is exhausted.
pub struct Lines {
    path: PathBuf,
    reader: BufReader<File>,
    buf: String,
    done: bool,
}

impl Iterator for Lines {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.buf.clear();
        match self.reader.read_line(&mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => Some(Ok(split_terminator(&self.buf).0.to_string())),
            Err(e) => {
                self.done = true;
                Some(Err(StoreError::unreadable(&self.path, e)))
            }
        }
    }
}

/// Splits a line as returned by `read_line` into its body and terminator.
fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_split_terminator() {
        assert_eq!(split_terminator("abc\n"), ("abc", "\n"));
        assert_eq!(split_terminator("abc\r\n"), ("abc", "\r\n"));
        assert_eq!(split_terminator("abc"), ("abc", ""));
        assert_eq!(split_terminator("\n"), ("", "\n"));
    }

    #[test]
    fn test_create_overwrites_without_adding_newline() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("file.txt")).unwrap();

        store.create("first version that is long").unwrap();
        store.create("short").unwrap();

        assert_eq!(fs::read(store.path()).unwrap(), b"short");
    }

    #[test]
    fn test_create_into_directory_is_unwritable() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("taken");
        fs::create_dir(&target).unwrap();

        let store = FileStore::new(&target).unwrap();
        assert!(matches!(
            store.create("x"),
            Err(StoreError::FileUnwritable { .. })
        ));
    }

    #[test]
    fn test_read_yields_lines_in_order() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("file.txt")).unwrap();
        store.create("one\r\ntwo\nthree").unwrap();

        let lines: Vec<String> = store.read().unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(lines, vec!["one", "two", "three"]);

        // A second call starts again from the top.
        assert_eq!(store.read().unwrap().count(), 3);
    }

    #[test]
    fn test_read_missing_file_is_unreadable() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent.txt")).unwrap();

        let error = store.read().err().unwrap();
        assert!(matches!(error, StoreError::FileUnreadable { .. }));
        assert!(error.is_missing_file());
    }

    #[test]
    fn test_update_preserves_line_terminators() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("file.txt")).unwrap();
        store.create("cat\r\ncat dog\ndog").unwrap();

        let summary = store.update("cat", "bird").unwrap();

        assert_eq!(store.read_to_string().unwrap(), "bird\r\nbird dog\ndog");
        assert_eq!(
            summary,
            UpdateSummary {
                lines_scanned: 3,
                lines_changed: 2,
                replacements: 2,
            }
        );
    }

    #[test]
    fn test_update_leaves_no_temporary_file() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("file.txt")).unwrap();
        store.create("abc\n").unwrap();

        store.update("b", "B").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_update_empty_search_touches_nothing() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("file.txt")).unwrap();

        // The file does not even exist; validation happens first.
        assert!(matches!(
            store.update("", "x"),
            Err(StoreError::EmptySearchText)
        ));
    }

    #[test]
    fn test_update_of_empty_file() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("file.txt")).unwrap();
        store.create("").unwrap();

        let summary = store.update("a", "b").unwrap();

        assert_eq!(summary, UpdateSummary::default());
        assert_eq!(store.read_to_string().unwrap(), "");
    }

    #[test]
    fn test_delete_twice_fails() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("file.txt")).unwrap();
        store.create("bye").unwrap();

        store.delete().unwrap();
        assert!(!store.exists());
        assert!(matches!(
            store.delete(),
            Err(StoreError::DeleteFailed { .. })
        ));
    }

    #[test]
    fn test_root_path_is_invalid() {
        assert!(matches!(
            FileStore::new("/"),
            Err(StoreError::InvalidPath { .. })
        ));
    }
}
