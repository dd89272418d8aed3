//! auth - GitHub token vault for ghvault
//!
//! Keeps one fine-grained personal access token across invocations.
//! The OS secret store is the default home; an owner-only file under the
//! config directory is the explicit fallback for CI and containers. A token
//! lives in exactly one of the two tiers at a time.
//!
//! ```no_run
//! use auth::{policy, CredentialStore};
//! use ghvault_core::Paths;
//!
//! # fn main() -> Result<(), auth::CredentialError> {
//! let store = CredentialStore::open(&Paths::new());
//! let token = policy::check("github_pat_AAAAAAAAAAAAAAAAAAAAAA")?;
//! store.set(&token, false)?;
//! assert_eq!(store.get()?, Some(token));
//! for failure in store.delete() {
//!     eprintln!("warning: {}", failure);
//! }
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod error;
pub mod policy;
pub mod store;
pub mod token;

pub use backends::{CredentialBackend, FileBackend, KeyringBackend, MemoryBackend};
pub use error::{BackendError, CredentialError};
pub use policy::is_allowed;
pub use store::{CredentialStore, StorageLocation};
pub use token::{classify, Token, TokenType, TokenValidation};
