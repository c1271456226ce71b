// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Revocation check over the certificate's CRL distribution points.

use tracing::warn;

use crate::certificate::ParsedCertificate;
use crate::crl::{parse_crl_der, revocation_applies};
use crate::fetch::CrlFetcher;

/// Outcome of the revocation check.
///
/// `Undetermined` means no distribution point yielded a usable CRL; the
/// caller resolves it through its configured policy rather than this module
/// hard-coding fail-open or fail-closed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RevocationStatus {
    NotRevoked,
    Revoked,
    Undetermined,
}

/// Check the certificate against the CRLs named by its distribution points.
///
/// Points are tried sequentially in certificate order. A fetch or parse
/// failure is soft: it is logged and the next point is tried. The first CRL
/// entry matching the certificate serial decides the outcome and stops the
/// scan; a matched entry whose reason code the policy does not cover counts
/// as not revoked.
pub async fn check_revocation(
    certificate: &ParsedCertificate,
    signed_at: i64,
    fetcher: &dyn CrlFetcher,
) -> RevocationStatus {
    let serial = &certificate.serial_hex;

    if certificate.crl_distribution_points.is_empty() {
        warn!(serial, "certificate carries no CRL distribution points");
        return RevocationStatus::Undetermined;
    }

    let mut any_usable_crl = false;

    for uri in &certificate.crl_distribution_points {
        let bytes = match fetcher.fetch(uri).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(serial, uri = uri.as_str(), error = %e, "could not fetch CRL");
                continue;
            }
        };

        let crl = match parse_crl_der(&bytes) {
            Ok(crl) => crl,
            Err(e) => {
                warn!(serial, uri = uri.as_str(), error = %e, "could not parse CRL");
                continue;
            }
        };

        any_usable_crl = true;

        for entry in &crl.entries {
            if !entry.serial_hex.eq_ignore_ascii_case(serial) {
                continue;
            }

            let Some(reason) = entry.reason_code else {
                warn!(serial, uri = uri.as_str(), "matched CRL entry has no usable reason code");
                return RevocationStatus::NotRevoked;
            };

            return match revocation_applies(reason, signed_at, entry.revocation_date) {
                Some(true) => {
                    warn!(serial, uri = uri.as_str(), ?reason, "certificate found revoked on CRL");
                    RevocationStatus::Revoked
                }
                Some(false) => RevocationStatus::NotRevoked,
                None => {
                    warn!(serial, uri = uri.as_str(), ?reason, "unhandled CRL reason code");
                    RevocationStatus::NotRevoked
                }
            };
        }
    }

    if any_usable_crl {
        RevocationStatus::NotRevoked
    } else {
        warn!(serial, "no distribution point yielded a usable CRL");
        RevocationStatus::Undetermined
    }
}
