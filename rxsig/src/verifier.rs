// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The verification orchestrator.
//!
//! Checks run in a fixed order. The format gate (including the
//! single-certificate and certificate-parse checks) short-circuits; every
//! later check runs regardless of earlier failures so one pass reports every
//! independently-detectable problem with a signature.

use tracing::{debug, warn};

use rxsig_x509::{
    certificate_valid_at, check_revocation, is_issued_by_trusted_anchor, parse_certificate_base64,
    HttpCrlFetcher, RevocationStatus,
};

use crate::algorithms::SignatureAlgorithm;
use crate::digest::{digest_matches_prescription, extract_embedded_signed_info};
use crate::hl7_time::parse_hl7_datetime;
use crate::prescription::ParentPrescription;
use crate::settings::{RevocationPolicy, VerificationSettings};
use crate::signature_block::SignatureBlock;
use crate::signature_verifier::verify_signature_value;

/// The failure-reason taxonomy. The literal strings are the output contract;
/// callers pattern-match on them.
pub mod reasons {
    pub const INVALID_SIGNATURE_FORMAT: &str = "Invalid signature format";
    pub const MULTIPLE_CERTIFICATES: &str = "Multiple certificates detected";
    pub const INVALID_CERTIFICATE: &str = "Invalid certificate";
    pub const DIGEST_MISMATCH: &str = "Signature doesn't match prescription";
    pub const SIGNATURE_INVALID: &str = "Signature is invalid";
    pub const CERTIFICATE_EXPIRED: &str = "Certificate expired when signed";
    pub const CERTIFICATE_NOT_TRUSTED: &str = "Certificate not trusted";
    pub const CERTIFICATE_REVOKED: &str = "Certificate is revoked";
}

/// Verify a prescription signature end to end.
///
/// Returns the accumulated failure reasons; an empty vector is the sole
/// success signal.
pub async fn verify_prescription_signature(
    prescription: &ParentPrescription,
    settings: &VerificationSettings,
) -> Vec<String> {
    // Format gate: a signature that cannot be parsed into its required
    // fields stops everything else.
    let signature_element = match prescription.signature_element() {
        Ok(element) => element,
        Err(e) => {
            debug!(error = %e, "signature format check failed");
            return vec![reasons::INVALID_SIGNATURE_FORMAT.to_string()];
        }
    };
    let block = match SignatureBlock::from_signature_element(signature_element) {
        Ok(block) => block,
        Err(e) => {
            debug!(error = %e, "signature format check failed");
            return vec![reasons::INVALID_SIGNATURE_FORMAT.to_string()];
        }
    };
    let signed_at = match prescription.signing_time().and_then(parse_hl7_datetime) {
        Ok(instant) => instant,
        Err(e) => {
            debug!(error = %e, "signing time is missing or malformed");
            return vec![reasons::INVALID_SIGNATURE_FORMAT.to_string()];
        }
    };

    if block.has_multiple_certificates() {
        debug!("certificate text contains PEM boundaries");
        return vec![reasons::MULTIPLE_CERTIFICATES.to_string()];
    }

    let certificate = match parse_certificate_base64(&block.certificate_text) {
        Ok(certificate) => certificate,
        Err(e) => {
            warn!(error = %e, "could not parse X509 certificate");
            return vec![reasons::INVALID_CERTIFICATE.to_string()];
        }
    };

    let mut errors: Vec<String> = Vec::new();

    // Cryptographic checks: digest match and signature validity are
    // independent and may both fail.
    match SignatureAlgorithm::from_signature_method_uri(&block.signature_method_uri) {
        Err(e) => {
            warn!(error = %e, "signature method is not a supported algorithm");
            errors.push(reasons::SIGNATURE_INVALID.to_string());
        }
        Ok(algorithm) => {
            match digest_matches_prescription(prescription, &block, algorithm) {
                Ok(true) => debug!("digest matches prescription"),
                Ok(false) => {
                    debug!(embedded_digest = ?block.digest_value, "digest does not match prescription");
                    errors.push(reasons::DIGEST_MISMATCH.to_string());
                }
                Err(e) => {
                    debug!(error = %e, "digest could not be computed");
                    errors.push(reasons::DIGEST_MISMATCH.to_string());
                }
            }

            let signature_valid = extract_embedded_signed_info(&block).and_then(|signed_info| {
                verify_signature_value(&signed_info, &block.signature_value, &certificate.spki_der, algorithm)
                    .map_err(|(code, message)| format!("{code}: {message}"))
            });
            match signature_valid {
                Ok(()) => debug!("signature value verified"),
                Err(e) => {
                    debug!(error = %e, "signature value did not verify");
                    errors.push(reasons::SIGNATURE_INVALID.to_string());
                }
            }
        }
    }

    if certificate_valid_at(&certificate, signed_at) {
        debug!("certificate was valid when signed");
    } else {
        debug!(
            not_before = certificate.not_before,
            not_after = certificate.not_after,
            signed_at,
            "certificate was not valid when signed"
        );
        errors.push(reasons::CERTIFICATE_EXPIRED.to_string());
    }

    if is_issued_by_trusted_anchor(&certificate, &settings.trust_anchors) {
        debug!("certificate chains to a trusted issuer");
    } else {
        debug!(issuer = %certificate.issuer_dn, "certificate does not chain to a trusted issuer");
        errors.push(reasons::CERTIFICATE_NOT_TRUSTED.to_string());
    }

    let status = match &settings.crl_fetcher {
        Some(fetcher) => check_revocation(&certificate, signed_at, fetcher.as_ref()).await,
        None => match HttpCrlFetcher::new(settings.fetch_timeout) {
            Ok(fetcher) => check_revocation(&certificate, signed_at, &fetcher).await,
            Err(e) => {
                warn!(error = %e, "could not construct CRL fetcher");
                RevocationStatus::Undetermined
            }
        },
    };
    let revoked = match status {
        RevocationStatus::Revoked => true,
        RevocationStatus::NotRevoked => false,
        RevocationStatus::Undetermined => {
            warn!(policy = ?settings.revocation_policy, "revocation status could not be determined");
            settings.revocation_policy == RevocationPolicy::RejectWhenUndetermined
        }
    };
    if revoked {
        errors.push(reasons::CERTIFICATE_REVOKED.to_string());
    } else {
        debug!("certificate is not revoked");
    }

    errors
}
