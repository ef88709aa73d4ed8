use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// A writable destination for the temporary replacement file.
///
/// Beyond plain `Write`, the store needs to push the bytes all the way to
/// disk before it promotes the file into place.
pub trait StagedSink: Write {
    fn sync(&mut self) -> io::Result<()>;
}

impl StagedSink for BufWriter<File> {
    fn sync(&mut self) -> io::Result<()> {
        self.flush()?;
        self.get_ref().sync_all()
    }
}

/// The `StagingProvider` trait abstracts where an update writes its rewritten
/// content before it is installed over the target.
///
/// The file store only ever talks to this trait, so tests can swap in a
/// provider whose sink fails partway through a write.
pub trait StagingProvider {
    /// Picks the path of the temporary file for `target`.
    ///
    /// The default puts it next to the target so the final rename never
    /// crosses a filesystem boundary, and gives it a unique hidden name.
    fn scratch_path(&self, target: &Path) -> PathBuf {
        let file_name = target
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("file");
        target.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()))
    }

    /// Creates the temporary file at `scratch` and returns a sink for it.
    fn open_scratch(&self, scratch: &Path) -> io::Result<Box<dyn StagedSink>>;
}

/// Stages replacement content in a fresh file beside the target.
#[derive(Debug, Default, Clone, Copy)]
pub struct SiblingStaging;

impl SiblingStaging {
    pub fn new() -> Self {
        Self
    }
}

impl StagingProvider for SiblingStaging {
    fn open_scratch(&self, scratch: &Path) -> io::Result<Box<dyn StagedSink>> {
        // `create_new` refuses to clobber anything that already sits at the name.
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(scratch)?;
        debug!(scratch = %scratch.display(), "opened temporary file");
        Ok(Box::new(BufWriter::new(file)))
    }
}

/// Removes a temporary file left behind by a failed update.
///
/// Failures here are logged rather than returned, the caller is already
/// reporting the error that caused the discard.
pub fn discard_scratch(scratch: &Path) {
    match fs::remove_file(scratch) {
        Ok(()) => debug!(scratch = %scratch.display(), "discarded temporary file"),
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => warn!(
            scratch = %scratch.display(),
            %error,
            "failed to discard temporary file"
        ),
    }
}
