//! Which token shapes may be stored
//!
//! Only fine-grained tokens are accepted. Classic tokens carry account-wide
//! scopes that cannot be revoked per repository.

use crate::error::CredentialError;
use crate::token::{classify, Token, TokenType};

/// Allow-list decision for a classified token
pub fn is_allowed(token_type: TokenType) -> bool {
    matches!(token_type, TokenType::FineGrained)
}

/// Classify and apply the policy in one step.
///
/// Runs before any storage I/O so a rejected token leaves no state behind.
pub fn check(raw: &str) -> Result<Token, CredentialError> {
    let validation = classify(raw);
    if !validation.valid {
        return Err(CredentialError::FormatInvalid);
    }
    if !is_allowed(validation.token_type) {
        return Err(CredentialError::PolicyRejected(validation.token_type));
    }
    Ok(Token::new(raw))
}
