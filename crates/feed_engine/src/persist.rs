use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{0:?} exists but is not a directory")]
    NotADirectory(PathBuf),
    #[error("{path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PersistError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| PersistError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub fn ensure_data_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() && !dir.is_dir() {
        return Err(PersistError::NotADirectory(dir.to_path_buf()));
    }
    fs::create_dir_all(dir).map_err(PersistError::io(dir))
}

/// One small text file under the data directory, e.g. the credential store.
///
/// Writes go through a sibling temp file that is renamed over the target.
#[derive(Debug, Clone)]
pub struct StateFile {
    dir: PathBuf,
    path: PathBuf,
}

impl StateFile {
    pub fn new(dir: impl Into<PathBuf>, filename: &str) -> Self {
        let dir = dir.into();
        let path = dir.join(filename);
        Self { dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when the file has never been written.
    pub fn read(&self) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(PersistError::io(&self.path)(err)),
        }
    }

    pub fn write(&self, content: &str) -> Result<(), PersistError> {
        ensure_data_dir(&self.dir)?;

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(PersistError::io(&self.dir))?;
        tmp.write_all(content.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(PersistError::io(tmp.path()))?;
        tmp.persist(&self.path)
            .map_err(|err| PersistError::io(&self.path)(err.error))?;
        Ok(())
    }
}
