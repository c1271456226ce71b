// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::Arc;
use std::time::Duration;

use rxsig_x509::{parse_trust_anchor_bundle, CrlFetcher, TrustAnchor};

/// What an undetermined revocation outcome resolves to.
///
/// The historical behavior accepts a certificate when no CRL could be
/// obtained from any distribution point; rejecting instead is available for
/// deployments that prefer to fail closed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RevocationPolicy {
    AcceptWhenUndetermined,
    RejectWhenUndetermined,
}

/// Injected configuration for a verification run.
///
/// The trust set is part of the settings, never ambient process state; a
/// verifier with an empty trust set rejects every certificate as untrusted.
pub struct VerificationSettings {
    pub(crate) trust_anchors: Vec<TrustAnchor>,
    pub(crate) revocation_policy: RevocationPolicy,
    pub(crate) fetch_timeout: Duration,
    pub(crate) crl_fetcher: Option<Arc<dyn CrlFetcher>>,
}

impl VerificationSettings {
    /// Configure the trust set from a comma-joined PEM sub-CA bundle.
    pub fn with_trust_anchor_bundle(mut self, bundle: &str) -> Result<Self, String> {
        self.trust_anchors = parse_trust_anchor_bundle(bundle)?;
        Ok(self)
    }

    /// Configure the trust set from already-parsed anchors.
    pub fn with_trust_anchors(mut self, anchors: Vec<TrustAnchor>) -> Self {
        self.trust_anchors = anchors;
        self
    }

    pub fn with_revocation_policy(mut self, policy: RevocationPolicy) -> Self {
        self.revocation_policy = policy;
        self
    }

    /// Bounded timeout applied to each distribution-point fetch.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Replace the HTTP CRL fetcher, e.g. with a canned one in tests.
    pub fn with_crl_fetcher(mut self, fetcher: Arc<dyn CrlFetcher>) -> Self {
        self.crl_fetcher = Some(fetcher);
        self
    }
}

impl Default for VerificationSettings {
    fn default() -> Self {
        Self {
            trust_anchors: Vec::new(),
            revocation_policy: RevocationPolicy::AcceptWhenUndetermined,
            fetch_timeout: Duration::from_secs(10),
            crl_fetcher: None,
        }
    }
}
