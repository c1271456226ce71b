// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Typed view of the XML-DSIG `Signature` element.
//!
//! Parsing fails closed: any missing required field is an error here, so no
//! later check ever dereferences an absent part of the signature.

use rxsig_xml::XmlElement;

#[derive(Debug, Clone)]
pub struct SignatureBlock {
    /// The embedded `SignedInfo` subtree, as written by the signer.
    pub signed_info: XmlElement,
    /// The `xmlns` declared on `Signature`, re-attached to `SignedInfo`
    /// before canonicalization.
    pub signature_xmlns: Option<String>,
    /// Declared canonicalization method, if any.
    pub canonicalization_method: Option<String>,
    /// The `SignatureMethod` algorithm URI.
    pub signature_method_uri: String,
    /// The embedded `DigestValue` text, kept for diagnostics.
    pub digest_value: Option<String>,
    /// Base64 signature bytes.
    pub signature_value: String,
    /// Base64 DER of the signer certificate.
    pub certificate_text: String,
}

impl SignatureBlock {
    pub fn from_signature_element(signature: &XmlElement) -> Result<Self, String> {
        let signed_info = signature.required_child("SignedInfo")?.clone();

        let signature_method_uri = signed_info
            .required_child("SignatureMethod")?
            .attribute("Algorithm")
            .ok_or_else(|| "SignatureMethod has no Algorithm attribute".to_string())?
            .to_string();

        let canonicalization_method = signed_info
            .child("CanonicalizationMethod")
            .and_then(|m| m.attribute("Algorithm"))
            .map(str::to_string);

        let digest_value = signed_info
            .child("Reference")
            .and_then(|r| r.child("DigestValue"))
            .map(|d| d.text());

        let signature_value = signature.required_child("SignatureValue")?.text();
        if signature_value.trim().is_empty() {
            return Err("SignatureValue is empty".to_string());
        }

        let x509_data = signature
            .required_child("KeyInfo")?
            .required_child("X509Data")?;
        let certificates: Vec<&XmlElement> = x509_data.children_named("X509Certificate").collect();
        let certificate = match certificates.as_slice() {
            [single] => *single,
            [] => return Err("missing element <X509Certificate> under <X509Data>".to_string()),
            _ => return Err("more than one <X509Certificate> element".to_string()),
        };
        let certificate_text = certificate.text();
        if certificate_text.trim().is_empty() {
            return Err("X509Certificate is empty".to_string());
        }

        Ok(Self {
            signed_info,
            signature_xmlns: signature.attribute("xmlns").map(str::to_string),
            canonicalization_method,
            signature_method_uri,
            digest_value,
            signature_value,
            certificate_text,
        })
    }

    /// PEM armor inside the certificate text means a concatenated chain was
    /// embedded where exactly one bare base64 certificate belongs.
    pub fn has_multiple_certificates(&self) -> bool {
        self.certificate_text.contains("BEGIN CERTIFICATE")
            || self.certificate_text.contains("END CERTIFICATE")
    }
}
