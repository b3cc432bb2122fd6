//! Network trust configuration for engine-side streaming.
//!
//! The engine performs all network fetching itself, so TLS trust is
//! configured by pushing policy across the boundary rather than by building a
//! client here. Trust settings are process-wide: they affect subsequent
//! network playback on every handle, not just one session.

use crate::error::Result;
use bridge_traits::AudioEngine;
use serde::{Deserialize, Serialize};

/// Declarative TLS trust policy for network-backed playback.
///
/// Assemble with the builder methods, then push to the engine with
/// [`apply`](Self::apply). Applying replaces whatever trust state the engine
/// held before, so a policy is always a full description, never a delta.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkTrustPolicy {
    /// Accept invalid or self-signed certificates. Intended for development
    /// against local streaming servers.
    pub allow_invalid_certs: bool,
    /// Extra trusted root certificates, PEM text, in addition to the
    /// engine's default store.
    pub trusted_roots_pem: Vec<String>,
}

impl NetworkTrustPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allow_invalid_certs(mut self, allow: bool) -> Self {
        self.allow_invalid_certs = allow;
        self
    }

    pub fn with_trusted_root_pem(mut self, pem: impl Into<String>) -> Self {
        self.trusted_roots_pem.push(pem.into());
        self
    }

    /// Push this policy to the engine, replacing its current trust state.
    ///
    /// Existing roots are cleared before the policy's roots are added, so
    /// repeated applies of the same policy are idempotent. Affects subsequent
    /// playback only; streams already connected keep their trust decisions.
    pub fn apply(&self, engine: &dyn AudioEngine) -> Result<()> {
        if self.allow_invalid_certs {
            tracing::warn!("accepting invalid TLS certificates for network playback");
        }
        engine.clear_trusted_roots()?;
        for pem in &self.trusted_roots_pem {
            engine.add_trusted_root_pem(pem)?;
        }
        engine.set_allow_invalid_certs(self.allow_invalid_certs)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_roots() {
        let policy = NetworkTrustPolicy::new()
            .with_allow_invalid_certs(true)
            .with_trusted_root_pem("-----BEGIN CERTIFICATE-----\nAAA\n-----END CERTIFICATE-----")
            .with_trusted_root_pem("-----BEGIN CERTIFICATE-----\nBBB\n-----END CERTIFICATE-----");
        assert!(policy.allow_invalid_certs);
        assert_eq!(policy.trusted_roots_pem.len(), 2);
    }

    #[test]
    fn default_policy_trusts_nothing_extra() {
        let policy = NetworkTrustPolicy::default();
        assert!(!policy.allow_invalid_certs);
        assert!(policy.trusted_roots_pem.is_empty());
    }
}
