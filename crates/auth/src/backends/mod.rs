//! Storage tiers a token can live in.
//!
//! Each tier holds at most one token. "Not found" never escapes a backend:
//! reads return `Ok(None)` and deletes return `Ok(())`.

pub mod file;
pub mod memory;
pub mod vault;

use crate::error::BackendError;
use crate::token::Token;

pub use self::file::FileBackend;
pub use self::memory::MemoryBackend;
pub use self::vault::{KeyringBackend, UnavailableVault};

/// Capability interface shared by the vault and file tiers.
///
/// Calls are blocking. Implementations must be `Send + Sync` so a caller
/// can run them on a worker thread.
pub trait CredentialBackend: Send + Sync {
    /// Short tier name for logs
    fn name(&self) -> &'static str;

    /// Current token, or `None` if nothing is stored
    fn get(&self) -> Result<Option<Token>, BackendError>;

    /// Store `token`, replacing any existing entry
    fn set(&self, token: &Token) -> Result<(), BackendError>;

    /// Remove the entry; succeeds if there was none
    fn delete(&self) -> Result<(), BackendError>;
}
