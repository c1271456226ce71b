// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sha1::Sha1;
use sha2::{Digest as _, Sha256};

/// Signature schemes supported by the prescription signing profile.
///
/// Both are RSA PKCS#1 v1.5; the digest side of each scheme also fixes the
/// `DigestMethod` used when rebuilding `SignedInfo`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    RsaSha1,
    RsaSha256,
}

impl SignatureAlgorithm {
    /// Resolve the `SignatureMethod` algorithm URI declared by a signature.
    ///
    /// URIs are matched by substring because signers have used both the
    /// xmldsig and xmldsig-more URI families. Anything that names neither
    /// scheme is an unsupported algorithm, never a silent SHA-1 default.
    pub fn from_signature_method_uri(uri: &str) -> Result<Self, String> {
        if uri.contains("rsa-sha256") {
            Ok(Self::RsaSha256)
        } else if uri.contains("rsa-sha1") {
            Ok(Self::RsaSha1)
        } else {
            Err(format!("unsupported signature algorithm: {uri}"))
        }
    }

    pub fn signature_method_uri(self) -> &'static str {
        match self {
            Self::RsaSha1 => "http://www.w3.org/2000/09/xmldsig#rsa-sha1",
            Self::RsaSha256 => "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256",
        }
    }

    pub fn digest_method_uri(self) -> &'static str {
        match self {
            Self::RsaSha1 => "http://www.w3.org/2000/09/xmldsig#sha1",
            Self::RsaSha256 => "http://www.w3.org/2001/04/xmlenc#sha256",
        }
    }

    /// Hash with the scheme's digest and return standard base64.
    pub fn hash_base64(self, data: &[u8]) -> String {
        match self {
            Self::RsaSha1 => STANDARD.encode(Sha1::digest(data)),
            Self::RsaSha256 => STANDARD.encode(Sha256::digest(data)),
        }
    }
}
