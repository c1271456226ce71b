// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Digest computation and the `SignedInfo` comparison.
//!
//! Both sides of the digest check are canonicalized `SignedInfo` strings:
//! the embedded side is the document's own `SignedInfo` with the signature's
//! namespace re-attached; the computed side is rebuilt from scratch around
//! the recomputed fragments digest. Equal strings mean the signed content is
//! untouched.

use rxsig_xml::{canonicalize, canonicalize_with_method, XmlElement, EXCLUSIVE_C14N};

use crate::algorithms::SignatureAlgorithm;
use crate::fragments::extract_fragments;
use crate::prescription::ParentPrescription;
use crate::signature_block::SignatureBlock;

/// The XML-DSIG namespace carried by `SignedInfo`.
pub const XMLDSIG_NS: &str = "http://www.w3.org/2000/09/xmldsig#";

/// Canonicalize the embedded `SignedInfo`.
///
/// The signer declared the namespace on the enclosing `Signature` element,
/// so it is copied onto `SignedInfo` (replacing any attributes already
/// there) before serialization.
pub fn extract_embedded_signed_info(block: &SignatureBlock) -> Result<String, String> {
    let mut signed_info = block.signed_info.clone();
    signed_info.attributes.clear();
    if let Some(ns) = &block.signature_xmlns {
        signed_info.set_attribute("xmlns", ns.clone());
    }
    canonicalize_with_method(&signed_info, block.canonicalization_method.as_deref())
}

/// Rebuild `SignedInfo` around a freshly computed fragments digest and
/// canonicalize it.
pub fn calculate_signed_info_from_prescription(
    prescription: &ParentPrescription,
    algorithm: SignatureAlgorithm,
) -> Result<String, String> {
    let fragments = extract_fragments(prescription)?;
    let digest_base64 = algorithm.hash_base64(canonicalize(&fragments).as_bytes());
    Ok(canonicalize(&build_signed_info(algorithm, &digest_base64)))
}

/// The `SignedInfo` layout of the prescription signing profile.
pub fn build_signed_info(algorithm: SignatureAlgorithm, digest_base64: &str) -> XmlElement {
    XmlElement::new("SignedInfo")
        .with_attribute("xmlns", XMLDSIG_NS)
        .with_child(XmlElement::new("CanonicalizationMethod").with_attribute("Algorithm", EXCLUSIVE_C14N))
        .with_child(
            XmlElement::new("SignatureMethod").with_attribute("Algorithm", algorithm.signature_method_uri()),
        )
        .with_child(
            XmlElement::new("Reference")
                .with_child(
                    XmlElement::new("Transforms")
                        .with_child(XmlElement::new("Transform").with_attribute("Algorithm", EXCLUSIVE_C14N)),
                )
                .with_child(
                    XmlElement::new("DigestMethod").with_attribute("Algorithm", algorithm.digest_method_uri()),
                )
                .with_child(XmlElement::new("DigestValue").with_text(digest_base64)),
        )
}

/// The digest check: byte-equal comparison of the two canonical strings.
pub fn digest_matches_prescription(
    prescription: &ParentPrescription,
    block: &SignatureBlock,
    algorithm: SignatureAlgorithm,
) -> Result<bool, String> {
    let embedded = extract_embedded_signed_info(block)?;
    let computed = calculate_signed_info_from_prescription(prescription, algorithm)?;
    Ok(embedded == computed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebuilt_signed_info_has_the_pinned_layout() {
        let signed_info = build_signed_info(SignatureAlgorithm::RsaSha1, "DIGESTVALUE=");
        assert_eq!(
            canonicalize(&signed_info),
            concat!(
                r#"<SignedInfo xmlns="http://www.w3.org/2000/09/xmldsig#">"#,
                r#"<CanonicalizationMethod Algorithm="http://www.w3.org/2001/10/xml-exc-c14n#"></CanonicalizationMethod>"#,
                r#"<SignatureMethod Algorithm="http://www.w3.org/2000/09/xmldsig#rsa-sha1"></SignatureMethod>"#,
                r#"<Reference>"#,
                r#"<Transforms><Transform Algorithm="http://www.w3.org/2001/10/xml-exc-c14n#"></Transform></Transforms>"#,
                r#"<DigestMethod Algorithm="http://www.w3.org/2000/09/xmldsig#sha1"></DigestMethod>"#,
                r#"<DigestValue>DIGESTVALUE=</DigestValue>"#,
                r#"</Reference>"#,
                r#"</SignedInfo>"#,
            )
        );
    }

    #[test]
    fn sha256_layout_uses_the_xmldsig_more_uris() {
        let c14n = canonicalize(&build_signed_info(SignatureAlgorithm::RsaSha256, "X"));
        assert!(c14n.contains(r#"SignatureMethod Algorithm="http://www.w3.org/2001/04/xmldsig-more#rsa-sha256""#));
        assert!(c14n.contains(r#"DigestMethod Algorithm="http://www.w3.org/2001/04/xmlenc#sha256""#));
    }
}
