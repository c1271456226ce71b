// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! CRL parsing and the reason-code revocation policy.
//!
//! Whether a CRL entry actually invalidates a prescription depends on *why*
//! the certificate was revoked (CRL entry extension `2.5.29.21`):
//!
//! - dated reasons (unspecified, affiliation changed, superseded, cessation
//!   of operation, certificate hold, remove from CRL) only affect signatures
//!   created at or after the revocation date;
//! - compromise reasons (key compromise, CA compromise) taint every
//!   signature the key ever produced, regardless of date.

use x509_parser::revocation_list::CertificateRevocationList;

/// CRL entry reason codes, RFC 5280 section 5.3.1.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CrlReasonCode {
    Unspecified,
    KeyCompromise,
    CaCompromise,
    AffiliationChanged,
    Superseded,
    CessationOfOperation,
    CertificateHold,
    RemoveFromCrl,
    PrivilegeWithdrawn,
    AaCompromise,
}

impl CrlReasonCode {
    /// Map the raw extension value. Value 7 is unused per RFC 5280.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Unspecified),
            1 => Some(Self::KeyCompromise),
            2 => Some(Self::CaCompromise),
            3 => Some(Self::AffiliationChanged),
            4 => Some(Self::Superseded),
            5 => Some(Self::CessationOfOperation),
            6 => Some(Self::CertificateHold),
            8 => Some(Self::RemoveFromCrl),
            9 => Some(Self::PrivilegeWithdrawn),
            10 => Some(Self::AaCompromise),
            _ => None,
        }
    }
}

/// One entry from a CRL's revoked-certificate list.
#[derive(Debug, Clone)]
pub struct RevokedEntry {
    /// Lowercase hex, matching [`crate::ParsedCertificate::serial_hex`].
    pub serial_hex: String,
    /// Unix seconds.
    pub revocation_date: i64,
    /// `None` when the entry has no reason-code extension or carries a value
    /// outside RFC 5280.
    pub reason_code: Option<CrlReasonCode>,
}

#[derive(Debug, Clone)]
pub struct ParsedCrl {
    pub issuer_dn: String,
    pub entries: Vec<RevokedEntry>,
}

pub fn parse_crl_der(der: &[u8]) -> Result<ParsedCrl, String> {
    use x509_parser::prelude::FromDer as _;

    let (_, crl) = CertificateRevocationList::from_der(der).map_err(|e| format!("invalid CRL DER: {e}"))?;

    let entries = crl
        .iter_revoked_certificates()
        .map(|revoked| RevokedEntry {
            serial_hex: hex::encode(revoked.raw_serial()),
            revocation_date: revoked.revocation_date.timestamp(),
            reason_code: revoked
                .reason_code()
                .and_then(|(_critical, code)| CrlReasonCode::from_value(code.0 as u8)),
        })
        .collect();

    Ok(ParsedCrl {
        issuer_dn: crl.issuer().to_string(),
        entries,
    })
}

/// Apply the reason-code policy to a matched CRL entry.
///
/// Returns `Some(true)` when the entry revokes a signature made at
/// `signed_at`, `Some(false)` when the signature predates a dated revocation,
/// and `None` for reason codes the policy does not cover (the caller treats
/// those as not-revoked and logs a warning).
pub fn revocation_applies(reason: CrlReasonCode, signed_at: i64, revoked_at: i64) -> Option<bool> {
    use CrlReasonCode::*;
    match reason {
        KeyCompromise | CaCompromise => Some(true),
        Unspecified | AffiliationChanged | Superseded | CessationOfOperation | CertificateHold
        | RemoveFromCrl => Some(signed_at >= revoked_at),
        PrivilegeWithdrawn | AaCompromise => None,
    }
}
