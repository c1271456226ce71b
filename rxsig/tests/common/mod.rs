// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shared helpers for `rxsig` integration tests.
//!
//! Builds complete signed prescriptions end to end: an `rcgen` CA, an RSA
//! leaf certificate, a fixed prescription template, and a real PKCS#1 v1.5
//! signature over the recomputed `SignedInfo`. Tests tamper with the parts
//! they need and feed the result to the verifier. The canned fetcher stands
//! in for the HTTP client so revocation paths never touch the network.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::OnceLock;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rsa::pkcs8::EncodePrivateKey as _;
use rsa::RsaPrivateKey;
use sha1::Sha1;
use sha2::Sha256;
use signature::{SignatureEncoding as _, Signer as _};

use rxsig::{
    calculate_signed_info_from_prescription, ParentPrescription, SignatureAlgorithm, VerificationSettings,
};
use rxsig_x509::{CrlFetchError, CrlFetcher};

pub(crate) const SIGNING_TIME: &str = "20240601120000";
pub(crate) const CRL_URL: &str = "http://crl.example.test/sub-ca.crl";
pub(crate) const PRESCRIPTION_ID: &str = "A7B86F8D-1D81-FC28-E050-D20AE3A215F0";

pub(crate) struct TestCa {
    pub(crate) cert: rcgen::Certificate,
    pub(crate) key: rcgen::KeyPair,
}

impl TestCa {
    pub(crate) fn pem(&self) -> String {
        self.cert.pem()
    }
}

pub(crate) fn make_ca(common_name: &str) -> TestCa {
    let mut params = rcgen::CertificateParams::default();
    params.distinguished_name = rcgen::DistinguishedName::new();
    params
        .distinguished_name
        .push(rcgen::DnType::CommonName, common_name);
    params.is_ca = rcgen::IsCa::Ca(rcgen::BasicConstraints::Unconstrained);

    let key = rcgen::KeyPair::generate().unwrap();
    let cert = params.self_signed(&key).unwrap();
    TestCa { cert, key }
}

/// RSA key generation dominates test time, so one key is shared across the
/// binary. Certificates built from it still differ per scenario.
fn test_rsa_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| RsaPrivateKey::new(&mut rand::thread_rng(), 2048).unwrap())
}

/// A leaf certificate with its RSA signing key.
pub(crate) struct TestSigner {
    pub(crate) key: RsaPrivateKey,
    pub(crate) cert_der: Vec<u8>,
}

impl TestSigner {
    pub(crate) fn cert_base64(&self) -> String {
        STANDARD.encode(&self.cert_der)
    }
}

/// An RSA end-entity certificate issued by `ca`.
pub(crate) fn make_rsa_signer(
    ca: &TestCa,
    serial: &[u8],
    not_before: time::OffsetDateTime,
    not_after: time::OffsetDateTime,
    crl_uris: &[&str],
) -> TestSigner {
    let key = test_rsa_key().clone();
    let pkcs8 = key.to_pkcs8_der().unwrap();
    let key_pair = rcgen::KeyPair::try_from(pkcs8.as_bytes()).unwrap();

    let mut params = rcgen::CertificateParams::default();
    params.distinguished_name = rcgen::DistinguishedName::new();
    params
        .distinguished_name
        .push(rcgen::DnType::CommonName, "prescriber.test");
    params.serial_number = Some(rcgen::SerialNumber::from(serial.to_vec()));
    params.not_before = not_before;
    params.not_after = not_after;
    params.crl_distribution_points = crl_uris
        .iter()
        .map(|uri| rcgen::CrlDistributionPoint {
            uris: vec![(*uri).to_string()],
        })
        .collect();
    // rcgen 0.13 only emits the extensions block when one of its gating
    // flags is set; without this the distribution points above are silently
    // dropped from the certificate.
    params.use_authority_key_identifier_extension = true;

    let cert_der = params
        .signed_by(&key_pair, &ca.cert, &ca.key)
        .unwrap()
        .der()
        .to_vec();
    TestSigner { key, cert_der }
}

/// A signer valid 2020-01-01 through 2030-01-01 with one distribution point.
pub(crate) fn make_default_signer(ca: &TestCa) -> TestSigner {
    make_rsa_signer(
        ca,
        &[0x4a, 0x1f, 0x33],
        rcgen::date_time_ymd(2020, 1, 1),
        rcgen::date_time_ymd(2030, 1, 1),
        &[CRL_URL],
    )
}

pub(crate) struct RevokedSpec {
    pub(crate) serial: Vec<u8>,
    pub(crate) revoked_at: time::OffsetDateTime,
    pub(crate) reason: Option<rcgen::RevocationReason>,
}

/// A CRL signed by `ca` listing the given entries, returned as DER.
pub(crate) fn make_crl_der(ca: &TestCa, entries: Vec<RevokedSpec>) -> Vec<u8> {
    let params = rcgen::CertificateRevocationListParams {
        this_update: rcgen::date_time_ymd(2020, 1, 1),
        next_update: rcgen::date_time_ymd(2035, 1, 1),
        crl_number: rcgen::SerialNumber::from(vec![1u8]),
        issuing_distribution_point: None,
        revoked_certs: entries
            .into_iter()
            .map(|entry| rcgen::RevokedCertParams {
                serial_number: rcgen::SerialNumber::from(entry.serial),
                revocation_time: entry.revoked_at,
                reason_code: entry.reason,
                invalidity_date: None,
            })
            .collect(),
        key_identifier_method: rcgen::KeyIdMethod::Sha256,
    };
    params.signed_by(&ca.cert, &ca.key).unwrap().der().to_vec()
}

/// A fetcher returning canned responses by URL; unmapped URLs fail with a
/// transport error.
pub(crate) struct CannedCrlFetcher {
    responses: HashMap<String, Vec<u8>>,
}

impl CannedCrlFetcher {
    pub(crate) fn new() -> Self {
        Self {
            responses: HashMap::new(),
        }
    }

    pub(crate) fn with_crl(mut self, url: &str, der: Vec<u8>) -> Self {
        self.responses.insert(url.to_string(), der);
        self
    }
}

#[async_trait]
impl CrlFetcher for CannedCrlFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, CrlFetchError> {
        match self.responses.get(url) {
            Some(der) => Ok(der.clone()),
            None => Err(CrlFetchError::Transport(format!("no route to {url}"))),
        }
    }
}

/// Settings trusting exactly `ca`, with revocation left to the caller.
pub(crate) fn settings_trusting(ca: &TestCa) -> VerificationSettings {
    VerificationSettings::default()
        .with_trust_anchor_bundle(&ca.pem())
        .unwrap()
}

/// The prescription template. The `signature_xml` slot is the content of
/// `signatureText`; everything outside it is what gets hashed.
pub(crate) fn prescription_xml(signing_time: &str, signature_xml: &str) -> String {
    format!(
        r#"<ParentPrescription xmlns="urn:hl7-org:v3">
             <id root="C2A40E26-EDE2-49FE-9BDA-A2CA1F3BA3F2"/>
             <recordTarget><Patient><id extension="9453740519"/></Patient></recordTarget>
             <pertinentInformation1>
               <pertinentPrescription>
                 <id root="{PRESCRIPTION_ID}"/>
                 <author>
                   <time value="{signing_time}"/>
                   <signatureText>{signature_xml}</signatureText>
                   <AgentPerson><id extension="100112897984"/><agentPerson><name>DR TEST PRESCRIBER</name></agentPerson></AgentPerson>
                 </author>
                 <pertinentInformation2><pertinentLineItem><id root="L1"/><repeatNumber><low value="1"/><high value="6"/></repeatNumber></pertinentLineItem></pertinentInformation2>
                 <pertinentInformation2><pertinentLineItem><id root="L2"/></pertinentLineItem></pertinentInformation2>
               </pertinentPrescription>
             </pertinentInformation1>
           </ParentPrescription>"#
    )
}

/// The pieces of a signature block, exposed so tests can tamper with one
/// part at a time before assembly.
pub(crate) struct SignedParts {
    pub(crate) signed_info: String,
    pub(crate) signature_base64: String,
    pub(crate) certificate_base64: String,
}

/// Sign the template's content: recompute `SignedInfo` from an unsigned
/// render and sign its canonical bytes with the leaf key.
pub(crate) fn sign_prescription(
    signing_time: &str,
    signer: &TestSigner,
    algorithm: SignatureAlgorithm,
) -> SignedParts {
    let unsigned = prescription_xml(signing_time, "");
    let prescription = ParentPrescription::parse(&unsigned).unwrap();
    let signed_info = calculate_signed_info_from_prescription(&prescription, algorithm).unwrap();

    let signature_bytes = match algorithm {
        SignatureAlgorithm::RsaSha1 => rsa::pkcs1v15::SigningKey::<Sha1>::new(signer.key.clone())
            .sign(signed_info.as_bytes())
            .to_vec(),
        SignatureAlgorithm::RsaSha256 => rsa::pkcs1v15::SigningKey::<Sha256>::new(signer.key.clone())
            .sign(signed_info.as_bytes())
            .to_vec(),
    };

    SignedParts {
        signed_info,
        signature_base64: STANDARD.encode(signature_bytes),
        certificate_base64: signer.cert_base64(),
    }
}

/// Render the full document with the given signature parts embedded.
pub(crate) fn assemble_prescription(signing_time: &str, parts: &SignedParts) -> String {
    let signature = format!(
        concat!(
            r#"<Signature xmlns="http://www.w3.org/2000/09/xmldsig#">{signed_info}"#,
            "<SignatureValue>{signature}</SignatureValue>",
            "<KeyInfo><X509Data><X509Certificate>{certificate}</X509Certificate></X509Data></KeyInfo>",
            "</Signature>",
        ),
        signed_info = parts.signed_info,
        signature = parts.signature_base64,
        certificate = parts.certificate_base64,
    );
    prescription_xml(signing_time, &signature)
}

/// A correctly signed document, end to end.
pub(crate) fn signed_prescription(
    signing_time: &str,
    signer: &TestSigner,
    algorithm: SignatureAlgorithm,
) -> String {
    assemble_prescription(signing_time, &sign_prescription(signing_time, signer, algorithm))
}
