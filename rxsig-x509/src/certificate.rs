// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Parsed view of a signer certificate.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use x509_parser::extensions::{DistributionPointName, GeneralName, ParsedExtension};

/// The certificate fields the verifier consumes, extracted once at parse time.
///
/// `serial_hex` is normalized to lowercase hex so CRL entry comparison is a
/// plain string equality. `not_before`/`not_after` are unix seconds.
#[derive(Debug, Clone)]
pub struct ParsedCertificate {
    pub der: Vec<u8>,
    pub subject_dn: String,
    pub issuer_dn: String,
    pub serial_hex: String,
    pub not_before: i64,
    pub not_after: i64,
    pub spki_der: Vec<u8>,
    pub tbs_der: Vec<u8>,
    pub signature_oid: String,
    pub signature: Vec<u8>,
    pub crl_distribution_points: Vec<String>,
}

/// Parse the certificate text embedded in a signature.
///
/// The `X509Certificate` element carries bare base64 DER, possibly wrapped
/// across lines, so whitespace is stripped before decoding.
pub fn parse_certificate_base64(certificate_text: &str) -> Result<ParsedCertificate, String> {
    let compact: String = certificate_text.split_whitespace().collect();
    let der = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| format!("invalid certificate base64: {e}"))?;
    parse_certificate_der(&der)
}

pub fn parse_certificate_der(der: &[u8]) -> Result<ParsedCertificate, String> {
    let (_, cert) =
        x509_parser::parse_x509_certificate(der).map_err(|e| format!("invalid cert DER: {e}"))?;

    let mut crl_distribution_points = Vec::new();
    for ext in cert.extensions() {
        if let ParsedExtension::CRLDistributionPoints(points) = ext.parsed_extension() {
            for point in points.iter() {
                if let Some(DistributionPointName::FullName(names)) = &point.distribution_point {
                    for name in names {
                        if let GeneralName::URI(uri) = name {
                            crl_distribution_points.push((*uri).to_string());
                        }
                    }
                }
            }
        }
    }

    Ok(ParsedCertificate {
        der: der.to_vec(),
        subject_dn: cert.tbs_certificate.subject.to_string(),
        issuer_dn: cert.tbs_certificate.issuer.to_string(),
        serial_hex: hex::encode(cert.raw_serial()),
        not_before: cert.validity().not_before.timestamp(),
        not_after: cert.validity().not_after.timestamp(),
        spki_der: cert.tbs_certificate.subject_pki.raw.to_vec(),
        // `x509-parser` keeps the raw DER for TBSCertificate; expose it via `AsRef`.
        tbs_der: cert.tbs_certificate.as_ref().to_vec(),
        signature_oid: cert.signature_algorithm.algorithm.to_string(),
        signature: cert.signature_value.data.to_vec(),
        crl_distribution_points,
    })
}
