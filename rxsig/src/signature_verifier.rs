// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! RSA PKCS#1 v1.5 verification of the signature value.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sha1::Sha1;
use sha2::Sha256;

use rsa::pkcs1v15;
use rsa::pkcs8::DecodePublicKey as _;
use rsa::RsaPublicKey;
use signature::Verifier as _;

use crate::algorithms::SignatureAlgorithm;

/// Verify `signature_base64` over the canonicalized `SignedInfo` bytes with
/// the signer certificate's public key.
///
/// Errors are `(code, message)` pairs: the code feeds logs, the message the
/// diagnostic. The caller maps any error to the signature-invalid reason.
pub fn verify_signature_value(
    signed_info_c14n: &str,
    signature_base64: &str,
    spki_der: &[u8],
    algorithm: SignatureAlgorithm,
) -> Result<(), (String, String)> {
    // Signature text may be wrapped across lines inside the element.
    let compact: String = signature_base64.split_whitespace().collect();
    let signature_bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ("BAD_SIGNATURE".to_string(), format!("bad signature base64: {e}")))?;

    let key = rsa_public_key(spki_der)?;
    let signature = pkcs1v15::Signature::try_from(signature_bytes.as_slice())
        .map_err(|e| ("BAD_SIGNATURE".to_string(), format!("bad RSA signature bytes: {e}")))?;

    let message = signed_info_c14n.as_bytes();
    match algorithm {
        SignatureAlgorithm::RsaSha1 => pkcs1v15::VerifyingKey::<Sha1>::new(key)
            .verify(message, &signature)
            .map_err(|_| ("BAD_SIGNATURE".to_string(), "signature verification failed".to_string())),
        SignatureAlgorithm::RsaSha256 => pkcs1v15::VerifyingKey::<Sha256>::new(key)
            .verify(message, &signature)
            .map_err(|_| ("BAD_SIGNATURE".to_string(), "signature verification failed".to_string())),
    }
}

fn rsa_public_key(spki_der: &[u8]) -> Result<RsaPublicKey, (String, String)> {
    RsaPublicKey::from_public_key_der(spki_der)
        .map_err(|e| ("INVALID_PUBLIC_KEY".to_string(), format!("bad RSA public key: {e}")))
}
