// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Navigation over the HL7v3 `ParentPrescription` subtree.
//!
//! All lookups match on local names so namespace prefixes in the source
//! document are irrelevant. Every accessor that the verifier depends on
//! returns a `Result` naming the missing path; the orchestrator maps those
//! failures to the format-check reason.

use rxsig_xml::{parse_document, XmlElement};

/// The signed clinical document under verification. Read-only; canonical
/// copies are produced elsewhere.
#[derive(Debug, Clone)]
pub struct ParentPrescription {
    root: XmlElement,
}

impl ParentPrescription {
    /// Parse a document and locate its `ParentPrescription` element, which
    /// may be the document element itself or nested in an outer message.
    pub fn parse(xml: &str) -> Result<Self, String> {
        let document = parse_document(xml)?;
        Self::from_element(document)
    }

    pub fn from_element(element: XmlElement) -> Result<Self, String> {
        let root = element
            .find("ParentPrescription")
            .ok_or_else(|| "document contains no <ParentPrescription>".to_string())?
            .clone();
        Ok(Self { root })
    }

    /// The HL7 namespace declared on the prescription root, re-attached to
    /// extracted fragments so they canonicalize as the signer saw them.
    pub fn hl7_namespace(&self) -> Option<&str> {
        self.root.attribute("xmlns")
    }

    fn pertinent_prescription(&self) -> Result<&XmlElement, String> {
        self.root
            .required_child("pertinentInformation1")?
            .required_child("pertinentPrescription")
    }

    fn author(&self) -> Result<&XmlElement, String> {
        self.pertinent_prescription()?.required_child("author")
    }

    /// The `Signature` element inside `signatureText`. An unsigned
    /// placeholder (`signatureText` without a `Signature` child) is an
    /// error, not an empty signature.
    pub fn signature_element(&self) -> Result<&XmlElement, String> {
        self.author()?
            .required_child("signatureText")?
            .required_child("Signature")
    }

    /// The author `time` element (carries the signing time in `@value`).
    pub fn author_time(&self) -> Result<&XmlElement, String> {
        self.author()?.required_child("time")
    }

    /// The signing timestamp in HL7v3 format.
    pub fn signing_time(&self) -> Result<&str, String> {
        self.author_time()?
            .attribute("value")
            .ok_or_else(|| "author <time> has no value attribute".to_string())
    }

    /// The first `id` child of `pertinentPrescription` (the prescription may
    /// carry several ids; only the first was signed).
    pub fn prescription_id(&self) -> Result<&XmlElement, String> {
        self.pertinent_prescription()?.required_child("id")
    }

    pub fn agent_person(&self) -> Result<&XmlElement, String> {
        self.author()?.required_child("AgentPerson")
    }

    pub fn record_target(&self) -> Result<&XmlElement, String> {
        self.root.required_child("recordTarget")
    }

    /// Every `pertinentLineItem`, in document order.
    pub fn line_items(&self) -> Result<Vec<&XmlElement>, String> {
        let prescription = self.pertinent_prescription()?;
        Ok(prescription
            .children_named("pertinentInformation2")
            .filter_map(|info| info.child("pertinentLineItem"))
            .collect())
    }
}
