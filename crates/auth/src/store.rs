//! CredentialStore - one token, two tiers
//!
//! Reads prefer the vault and fall back to the file. Writes go to exactly
//! one tier and clear the other, so at rest at most one copy exists:
//!
//! ```text
//! Absent  --set(vault)--> InVault
//! Absent  --set(file)---> InFile
//! InVault --set(file)---> InFile   (vault cleared)
//! InFile  --set(vault)--> InVault  (file cleared)
//! any     --delete------> Absent
//! ```

use crate::backends::{CredentialBackend, FileBackend, KeyringBackend, UnavailableVault};
use crate::error::{BackendError, CredentialError};
use crate::token::Token;
use ghvault_core::Paths;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Tier currently holding the live token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageLocation {
    Vault,
    File,
    None,
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageLocation::Vault => write!(f, "vault"),
            StorageLocation::File => write!(f, "file"),
            StorageLocation::None => write!(f, "none"),
        }
    }
}

/// Read/write/delete contract over the vault and file tiers
pub struct CredentialStore {
    vault: Box<dyn CredentialBackend>,
    file: Box<dyn CredentialBackend>,
}

impl CredentialStore {
    /// Compose explicit backends
    pub fn new(
        vault: impl CredentialBackend + 'static,
        file: impl CredentialBackend + 'static,
    ) -> Self {
        Self {
            vault: Box::new(vault),
            file: Box::new(file),
        }
    }

    /// Platform secret store plus the token file under `paths`.
    ///
    /// If no secret store can be opened the vault tier reports itself
    /// unavailable: reads fall through to the file, vault writes fail.
    pub fn open(paths: &Paths) -> Self {
        let file = FileBackend::new(paths.token_file());
        match KeyringBackend::open() {
            Ok(vault) => Self::new(vault, file),
            Err(e) => {
                debug!(error = %e, "platform secret store unavailable");
                Self::new(UnavailableVault::new(e.to_string()), file)
            }
        }
    }

    /// Current token and the tier it was read from
    pub fn lookup(&self) -> Result<Option<(Token, StorageLocation)>, CredentialError> {
        match self.vault.get() {
            Ok(Some(token)) => return Ok(Some((token, StorageLocation::Vault))),
            Ok(None) => debug!(tier = self.vault.name(), "no token in vault"),
            Err(e) => debug!(tier = self.vault.name(), error = %e, "vault read failed, trying file"),
        }

        let token = self.file.get().map_err(CredentialError::FileReadFailed)?;
        Ok(token.map(|t| (t, StorageLocation::File)))
    }

    /// Current token, or `None` when neither tier holds one
    pub fn get(&self) -> Result<Option<Token>, CredentialError> {
        Ok(self.lookup()?.map(|(token, _)| token))
    }

    /// Tier the next `get` would read from
    pub fn location(&self) -> Result<StorageLocation, CredentialError> {
        Ok(self
            .lookup()?
            .map_or(StorageLocation::None, |(_, location)| location))
    }

    /// Store `token` in the vault, or in the file when `skip_vault` is set.
    ///
    /// A failed vault write is never retried against the file; the caller
    /// must ask for the file tier explicitly.
    pub fn set(&self, token: &Token, skip_vault: bool) -> Result<(), CredentialError> {
        if skip_vault {
            clear(self.vault.as_ref());
            self.file.set(token).map_err(CredentialError::FileWriteFailed)?;
            debug!(tier = self.file.name(), "token stored");
        } else {
            self.vault
                .set(token)
                .map_err(CredentialError::from_vault_write)?;
            debug!(tier = self.vault.name(), "token stored");
            clear(self.file.as_ref());
        }
        Ok(())
    }

    /// Remove the token from both tiers.
    ///
    /// Never fails: both tiers are always attempted and "nothing stored"
    /// is success. Tiers that could not be cleared are returned so the
    /// caller can warn; an empty list means nothing is left behind.
    pub fn delete(&self) -> Vec<BackendError> {
        let mut failures = Vec::new();
        failures.extend(clear(self.vault.as_ref()));
        failures.extend(clear(self.file.as_ref()));
        failures
    }
}

/// Best-effort removal from one tier
fn clear(backend: &dyn CredentialBackend) -> Option<BackendError> {
    match backend.delete() {
        Ok(()) => {
            debug!(tier = backend.name(), "tier cleared");
            None
        }
        Err(e) => {
            warn!(tier = backend.name(), error = %e, "failed to clear token");
            Some(e)
        }
    }
}
