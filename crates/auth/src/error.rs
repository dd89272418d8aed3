//! Errors for the token vault

use crate::token::TokenType;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by a single storage tier.
///
/// "Not found" is not an error at this level: backends fold it into
/// `Ok(None)` for reads and `Ok(())` for deletes.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("secure vault unavailable: {0}")]
    Unavailable(String),

    #[error("secure vault rejected the request: {0}")]
    Rejected(String),

    #[error("failed to {op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BackendError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        BackendError::Io {
            op,
            path: path.into(),
            source,
        }
    }
}

/// Errors surfaced to login/logout flows
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("token does not look like a GitHub personal access token")]
    FormatInvalid,

    #[error("{0} tokens are not accepted - create a fine-grained personal access token instead")]
    PolicyRejected(TokenType),

    #[error("no secure vault available ({0}) - retry with --insecure-storage to store the token in a plaintext file")]
    VaultUnavailable(String),

    #[error("failed to store token in the secure vault ({0}) - retry with --insecure-storage to store the token in a plaintext file")]
    VaultWriteFailed(String),

    #[error("failed to write token file: {0}")]
    FileWriteFailed(BackendError),

    #[error("failed to read token file: {0}")]
    FileReadFailed(BackendError),
}

impl CredentialError {
    /// Map a failed vault write onto the caller-facing taxonomy
    pub(crate) fn from_vault_write(err: BackendError) -> Self {
        match err {
            BackendError::Unavailable(reason) => CredentialError::VaultUnavailable(reason),
            other => CredentialError::VaultWriteFailed(other.to_string()),
        }
    }

    /// True for failures of the secure vault tier
    pub fn is_vault_error(&self) -> bool {
        matches!(
            self,
            CredentialError::VaultUnavailable(_) | CredentialError::VaultWriteFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vault_write_mapping() {
        let err = CredentialError::from_vault_write(BackendError::Unavailable(
            "no session bus".to_string(),
        ));
        assert!(matches!(err, CredentialError::VaultUnavailable(_)));
        assert!(err.is_vault_error());
        assert!(err.to_string().contains("--insecure-storage"));

        let err = CredentialError::from_vault_write(BackendError::Rejected(
            "attribute too long".to_string(),
        ));
        assert!(matches!(err, CredentialError::VaultWriteFailed(_)));
        assert!(err.is_vault_error());
        assert!(err.to_string().contains("attribute too long"));
        assert!(err.to_string().contains("--insecure-storage"));
    }

    #[test]
    fn test_policy_message_names_type() {
        let err = CredentialError::PolicyRejected(TokenType::Classic);
        assert!(err.to_string().starts_with("classic tokens are not accepted"));
        assert!(!err.is_vault_error());
    }

    #[test]
    fn test_io_error_message() {
        let err = BackendError::io(
            "write",
            "/tmp/ghvault/token",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "failed to write /tmp/ghvault/token: denied");
    }
}
