//! Policy gate capability.
//!
//! A policy gate answers a single question about an already well-formed
//! value: should it be rejected? Implementations range from in-memory
//! blocklists to network-backed anti-spam services; the domain only depends
//! on this trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::PolicyGateError;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Asynchronous "is this value rejected by policy?" predicate.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PolicyGate: Send + Sync {
    /// `Ok(true)` rejects the value, `Ok(false)` lets it through and
    /// `Err(_)` means no answer could be obtained.
    async fn is_rejected(&self, value: &str) -> Result<bool, PolicyGateError>;
}

#[async_trait]
impl<G: PolicyGate + ?Sized> PolicyGate for Arc<G> {
    async fn is_rejected(&self, value: &str) -> Result<bool, PolicyGateError> {
        (**self).is_rejected(value).await
    }
}

#[async_trait]
impl<G: PolicyGate + ?Sized> PolicyGate for Box<G> {
    async fn is_rejected(&self, value: &str) -> Result<bool, PolicyGateError> {
        (**self).is_rejected(value).await
    }
}
