// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! X.509 checks for prescription signature verification.
//!
//! Covers the certificate-facing half of the verifier: parsing the signer
//! certificate embedded in a signature, the validity-window check, the
//! trust-anchor check against a configured sub-CA set, and CRL-based
//! revocation with its reason-code timing rules.

mod certificate;
mod crl;
mod fetch;
mod revocation;
mod trust;
mod validity;

pub use certificate::{parse_certificate_base64, parse_certificate_der, ParsedCertificate};
pub use crl::{parse_crl_der, revocation_applies, CrlReasonCode, ParsedCrl, RevokedEntry};
pub use fetch::{CrlFetchError, CrlFetcher, HttpCrlFetcher};
pub use revocation::{check_revocation, RevocationStatus};
pub use trust::{is_issued_by_trusted_anchor, parse_trust_anchor_bundle, TrustAnchor};
pub use validity::certificate_valid_at;
