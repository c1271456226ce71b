// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Trust-anchor check against the configured sub-CA set.
//!
//! The trust set arrives as a comma-joined bundle of PEM certificates. A
//! signer certificate is trusted when any one anchor issued it: the leaf's
//! issuer DN must equal the anchor's subject DN and the anchor's public key
//! must verify the leaf's TBS signature.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};

use rsa::pkcs1v15;
use rsa::pkcs8::DecodePublicKey as _;
use rsa::RsaPublicKey;
use signature::Verifier as _;

use p256::elliptic_curve::sec1::ToEncodedPoint as _;

use crate::certificate::{parse_certificate_der, ParsedCertificate};

/// A configured trusted issuing authority.
#[derive(Debug, Clone)]
pub struct TrustAnchor {
    pub der: Vec<u8>,
    pub subject_dn: String,
    pub spki_der: Vec<u8>,
}

/// Parse a comma-joined bundle of PEM sub-CA certificates.
///
/// At least one anchor must parse for the bundle to be usable; any malformed
/// entry fails the whole bundle so a typo never silently narrows the trust
/// set.
pub fn parse_trust_anchor_bundle(bundle: &str) -> Result<Vec<TrustAnchor>, String> {
    let mut anchors = Vec::new();
    for entry in bundle.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let der = decode_pem_certificate(entry)?;
        let parsed = parse_certificate_der(&der)?;
        anchors.push(TrustAnchor {
            der,
            subject_dn: parsed.subject_dn,
            spki_der: parsed.spki_der,
        });
    }
    if anchors.is_empty() {
        return Err("trust anchor bundle contains no certificates".to_string());
    }
    Ok(anchors)
}

fn decode_pem_certificate(pem: &str) -> Result<Vec<u8>, String> {
    let body: String = pem
        .lines()
        .filter(|line| !line.contains("-----"))
        .flat_map(|line| line.split_whitespace())
        .collect();
    if body.is_empty() {
        return Err("PEM entry contains no certificate body".to_string());
    }
    STANDARD
        .decode(body.as_bytes())
        .map_err(|e| format!("invalid PEM base64: {e}"))
}

/// OR semantics across the trust set: the first anchor that issued the leaf
/// wins.
pub fn is_issued_by_trusted_anchor(leaf: &ParsedCertificate, anchors: &[TrustAnchor]) -> bool {
    for anchor in anchors {
        if anchor.subject_dn != leaf.issuer_dn {
            continue;
        }
        if verify_cert_signature(&anchor.spki_der, &leaf.tbs_der, &leaf.signature_oid, &leaf.signature).is_ok() {
            return true;
        }
    }
    false
}

fn rsa_public_key_from_spki(spki_der: &[u8]) -> Result<RsaPublicKey, String> {
    RsaPublicKey::from_public_key_der(spki_der).map_err(|e| format!("bad RSA public key: {e}"))
}

fn verify_cert_signature(issuer_spki_der: &[u8], tbs_der: &[u8], signature_oid: &str, signature: &[u8]) -> Result<(), String> {
    match signature_oid {
        // sha1WithRSAEncryption. Still issued by the sub-CA generation this
        // verifier has to accept.
        "1.2.840.113549.1.1.5" => {
            let key = rsa_public_key_from_spki(issuer_spki_der)?;
            let vk = pkcs1v15::VerifyingKey::<Sha1>::new(key);
            let sig = pkcs1v15::Signature::try_from(signature).map_err(|e| format!("bad RSA signature bytes: {e}"))?;
            vk.verify(tbs_der, &sig).map_err(|_| "certificate signature verification failed".to_string())
        }
        // sha256WithRSAEncryption / sha384WithRSAEncryption / sha512WithRSAEncryption
        "1.2.840.113549.1.1.11" => {
            let key = rsa_public_key_from_spki(issuer_spki_der)?;
            let vk = pkcs1v15::VerifyingKey::<Sha256>::new(key);
            let sig = pkcs1v15::Signature::try_from(signature).map_err(|e| format!("bad RSA signature bytes: {e}"))?;
            vk.verify(tbs_der, &sig).map_err(|_| "certificate signature verification failed".to_string())
        }
        "1.2.840.113549.1.1.12" => {
            let key = rsa_public_key_from_spki(issuer_spki_der)?;
            let vk = pkcs1v15::VerifyingKey::<Sha384>::new(key);
            let sig = pkcs1v15::Signature::try_from(signature).map_err(|e| format!("bad RSA signature bytes: {e}"))?;
            vk.verify(tbs_der, &sig).map_err(|_| "certificate signature verification failed".to_string())
        }
        "1.2.840.113549.1.1.13" => {
            let key = rsa_public_key_from_spki(issuer_spki_der)?;
            let vk = pkcs1v15::VerifyingKey::<Sha512>::new(key);
            let sig = pkcs1v15::Signature::try_from(signature).map_err(|e| format!("bad RSA signature bytes: {e}"))?;
            vk.verify(tbs_der, &sig).map_err(|_| "certificate signature verification failed".to_string())
        }

        // ecdsa-with-SHA256 / SHA384 / SHA512
        "1.2.840.10045.4.3.2" => {
            let pk = p256::PublicKey::from_public_key_der(issuer_spki_der)
                .map_err(|e| format!("bad P-256 issuer public key: {e}"))?;
            let ep = pk.to_encoded_point(false);
            let vk = p256::ecdsa::VerifyingKey::from_sec1_bytes(ep.as_bytes())
                .map_err(|e| format!("bad P-256 issuer public key: {e}"))?;
            let sig = p256::ecdsa::Signature::from_der(signature)
                .map_err(|e| format!("bad ECDSA signature bytes: {e}"))?;
            vk.verify(tbs_der, &sig).map_err(|_| "certificate signature verification failed".to_string())
        }
        "1.2.840.10045.4.3.3" => {
            let pk = p384::PublicKey::from_public_key_der(issuer_spki_der)
                .map_err(|e| format!("bad P-384 issuer public key: {e}"))?;
            let ep = pk.to_encoded_point(false);
            let vk = p384::ecdsa::VerifyingKey::from_sec1_bytes(ep.as_bytes())
                .map_err(|e| format!("bad P-384 issuer public key: {e}"))?;
            let sig = p384::ecdsa::Signature::from_der(signature)
                .map_err(|e| format!("bad ECDSA signature bytes: {e}"))?;
            vk.verify(tbs_der, &sig).map_err(|_| "certificate signature verification failed".to_string())
        }
        "1.2.840.10045.4.3.4" => {
            let pk = p521::PublicKey::from_public_key_der(issuer_spki_der)
                .map_err(|e| format!("bad P-521 issuer public key: {e}"))?;
            let ep = pk.to_encoded_point(false);
            let vk = p521::ecdsa::VerifyingKey::from_sec1_bytes(ep.as_bytes())
                .map_err(|e| format!("bad P-521 issuer public key: {e}"))?;
            let sig = p521::ecdsa::Signature::from_der(signature)
                .map_err(|e| format!("bad ECDSA signature bytes: {e}"))?;
            vk.verify(tbs_der, &sig).map_err(|_| "certificate signature verification failed".to_string())
        }

        _ => Err(format!("unsupported certificate signature algorithm OID: {signature_oid}")),
    }
}
