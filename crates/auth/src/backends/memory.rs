//! In-memory [`CredentialBackend`] backed by `Arc<Mutex<..>>`.
//!
//! For tests and embedding. Nothing is persisted. Clones share state, so a
//! test can hand one clone to a [`CredentialStore`](crate::CredentialStore)
//! and inspect the tier directly through another.

use super::CredentialBackend;
use crate::error::BackendError;
use crate::token::Token;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
enum Fault {
    Unavailable(String),
    Rejected(String),
}

#[derive(Debug, Default)]
struct Slot {
    token: Option<Token>,
    fault: Option<Fault>,
}

/// Single-token store held in process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<Slot>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend already holding `token`
    pub fn with_token(token: Token) -> Self {
        let backend = Self::new();
        backend.slot().token = Some(token);
        backend
    }

    /// Make every call fail as if the store were unreachable
    pub fn fail_with(&self, reason: impl Into<String>) {
        self.slot().fault = Some(Fault::Unavailable(reason.into()));
    }

    /// Make every call fail as if the store refused the request
    pub fn reject_with(&self, reason: impl Into<String>) {
        self.slot().fault = Some(Fault::Rejected(reason.into()));
    }

    /// Bring the store back
    pub fn recover(&self) {
        self.slot().fault = None;
    }

    /// Token currently held, bypassing any simulated fault
    pub fn peek(&self) -> Option<Token> {
        self.slot().token.clone()
    }

    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check(slot: &Slot) -> Result<(), BackendError> {
        match &slot.fault {
            Some(Fault::Unavailable(reason)) => Err(BackendError::Unavailable(reason.clone())),
            Some(Fault::Rejected(reason)) => Err(BackendError::Rejected(reason.clone())),
            None => Ok(()),
        }
    }
}

impl CredentialBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get(&self) -> Result<Option<Token>, BackendError> {
        let slot = self.slot();
        Self::check(&slot)?;
        Ok(slot.token.clone())
    }

    fn set(&self, token: &Token) -> Result<(), BackendError> {
        let mut slot = self.slot();
        Self::check(&slot)?;
        slot.token = Some(token.clone());
        Ok(())
    }

    fn delete(&self) -> Result<(), BackendError> {
        let mut slot = self.slot();
        Self::check(&slot)?;
        slot.token = None;
        Ok(())
    }
}
