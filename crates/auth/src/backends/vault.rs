//! OS secret store tier.
//!
//! Uses the `keyring` crate:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring / KWallet)
//!
//! The entry identity is fixed so every invocation finds the same item.

use super::CredentialBackend;
use crate::error::BackendError;
use crate::token::Token;
use keyring::Entry;

/// Keychain service name
pub const SERVICE: &str = "ghvault";

/// Keychain account name
pub const ACCOUNT: &str = "github-token";

/// Token stored in the platform secret store
pub struct KeyringBackend {
    entry: Entry,
}

impl KeyringBackend {
    /// Bind to the ghvault entry in the platform store.
    ///
    /// Fails when no platform store can be reached at all (unsupported
    /// platform, no session bus).
    pub fn open() -> Result<Self, BackendError> {
        let entry = Entry::new(SERVICE, ACCOUNT).map_err(map_keyring_error)?;
        Ok(Self { entry })
    }

    /// Use a pre-built entry (mock credentials in tests)
    pub fn with_entry(entry: Entry) -> Self {
        Self { entry }
    }
}

impl CredentialBackend for KeyringBackend {
    fn name(&self) -> &'static str {
        "vault"
    }

    fn get(&self) -> Result<Option<Token>, BackendError> {
        match self.entry.get_password() {
            Ok(secret) => Ok(Some(Token::new(secret))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(map_keyring_error(e)),
        }
    }

    fn set(&self, token: &Token) -> Result<(), BackendError> {
        self.entry
            .set_password(token.expose())
            .map_err(map_keyring_error)
    }

    fn delete(&self) -> Result<(), BackendError> {
        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(map_keyring_error(e)),
        }
    }
}

/// Sort keyring failures into "store unreachable" and "store said no"
fn map_keyring_error(err: keyring::Error) -> BackendError {
    match err {
        keyring::Error::PlatformFailure(e) => BackendError::Unavailable(e.to_string()),
        keyring::Error::NoStorageAccess(e) => BackendError::Unavailable(e.to_string()),
        other => BackendError::Rejected(other.to_string()),
    }
}

/// Stand-in used when no platform store could be opened at startup.
///
/// Reads and deletes report the outage so the orchestrator falls through
/// to the file tier; writes fail.
pub struct UnavailableVault {
    reason: String,
}

impl UnavailableVault {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl CredentialBackend for UnavailableVault {
    fn name(&self) -> &'static str {
        "vault"
    }

    fn get(&self) -> Result<Option<Token>, BackendError> {
        Err(BackendError::Unavailable(self.reason.clone()))
    }

    fn set(&self, _token: &Token) -> Result<(), BackendError> {
        Err(BackendError::Unavailable(self.reason.clone()))
    }

    fn delete(&self) -> Result<(), BackendError> {
        Err(BackendError::Unavailable(self.reason.clone()))
    }
}
