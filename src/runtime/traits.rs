//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::policy;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// Failure while producing a reply
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplyError {
    #[error("Reply computation failed: {0}")]
    ReplyComputationFailed(String),
}

impl ReplyError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::ReplyComputationFailed(message.into())
    }
}

/// Source of bot replies
///
/// The keyword policy is the only production implementation. A networked
/// backend would slot in here and own its own timeout.
#[async_trait]
pub trait ReplySource: Send + Sync {
    async fn reply(&self, text: &str) -> Result<String, ReplyError>;
}

/// Out-of-band confirmation before the transcript is cleared
#[async_trait]
pub trait ClearConfirmation: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: ReplySource + ?Sized> ReplySource for Arc<T> {
    async fn reply(&self, text: &str) -> Result<String, ReplyError> {
        (**self).reply(text).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Adapter to use the keyword policy as a `ReplySource`
pub struct KeywordReplySource {
    rng: Mutex<StdRng>,
}

impl KeywordReplySource {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

#[async_trait]
impl ReplySource for KeywordReplySource {
    async fn reply(&self, text: &str) -> Result<String, ReplyError> {
        let text = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            policy::reply(text, &mut *rng)
        };
        Ok(text)
    }
}

/// Confirmation already collected by the caller (e.g. a browser `confirm()`
/// whose answer arrives in the request body)
#[derive(Debug, Clone, Copy)]
pub struct PresetConfirmation(pub bool);

#[async_trait]
impl ClearConfirmation for PresetConfirmation {
    async fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}
