//! Plaintext file tier for machines without a usable secret store
//! (CI runners, containers, headless Linux).
//!
//! The file holds the token followed by a single newline. The directory is
//! created 0700 and the file 0600. Modes are passed to the create call, and
//! the token is written to a uniquely named sibling temp file that is
//! renamed into place, so no reader ever sees a world-readable or
//! half-written token and concurrent logins never share a temp file.

use super::CredentialBackend;
use crate::error::BackendError;
use crate::token::Token;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};

#[cfg(unix)]
use std::os::unix::fs::{DirBuilderExt, PermissionsExt};

#[cfg(unix)]
const DIR_MODE: u32 = 0o700;
#[cfg(unix)]
const FILE_MODE: u32 = 0o600;

/// Token stored in a single owner-only file
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Write the token to a fresh temp file next to the target.
    /// Dropping the returned handle without persisting removes it.
    fn write_tmp(&self, dir: &Path, token: &Token) -> Result<NamedTempFile, BackendError> {
        let mut tmp = create_private_tmp(dir).map_err(|e| BackendError::io("create", dir, e))?;
        tmp.write_all(token.expose().as_bytes())
            .and_then(|_| tmp.write_all(b"\n"))
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| BackendError::io("write", tmp.path(), e))?;
        Ok(tmp)
    }
}

impl CredentialBackend for FileBackend {
    fn name(&self) -> &'static str {
        "file"
    }

    fn get(&self) -> Result<Option<Token>, BackendError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(BackendError::io("read", &self.path, e)),
        };

        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        Ok(Some(Token::new(trimmed)))
    }

    fn set(&self, token: &Token) -> Result<(), BackendError> {
        let dir = self.parent();
        create_private_dir(dir).map_err(|e| BackendError::io("create", dir, e))?;

        self.write_tmp(dir, token)?
            .persist(&self.path)
            .map(|_| ())
            .map_err(|e| BackendError::io("replace", &self.path, e.error))
    }

    fn delete(&self) -> Result<(), BackendError> {
        remove_if_exists(&self.path).map_err(|e| BackendError::io("remove", &self.path, e))
    }
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::DirBuilder::new().recursive(true).mode(DIR_MODE).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

fn tmp_builder() -> Builder<'static, 'static> {
    let mut builder = Builder::new();
    builder.prefix(".token-").suffix(".tmp");
    builder
}

#[cfg(unix)]
fn create_private_tmp(dir: &Path) -> io::Result<NamedTempFile> {
    tmp_builder()
        .permissions(fs::Permissions::from_mode(FILE_MODE))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn create_private_tmp(dir: &Path) -> io::Result<NamedTempFile> {
    tmp_builder().tempfile_in(dir)
}
