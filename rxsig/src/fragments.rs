// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Fragment extraction: the sub-elements the signer hashed.
//!
//! The envelope is `<FragmentsToBeHashed>` holding `<Fragment>` children in
//! a fixed schema-defined order: author time with the first prescription id,
//! then `AgentPerson`, then `recordTarget`, then one fragment per line item.
//! Any deviation from this selection shows up downstream as a digest
//! mismatch, which is an expected failure mode rather than an error here.

use rxsig_xml::{XmlElement, XmlNode};

use crate::prescription::ParentPrescription;

/// Build the hashing envelope for a prescription.
pub fn extract_fragments(prescription: &ParentPrescription) -> Result<XmlElement, String> {
    let namespace = prescription.hl7_namespace();

    let mut envelope = XmlElement::new("FragmentsToBeHashed");

    envelope = envelope.with_child(
        XmlElement::new("Fragment")
            .with_child(namespaced_copy(prescription.author_time()?, namespace))
            .with_child(namespaced_copy(prescription.prescription_id()?, namespace)),
    );

    envelope = envelope.with_child(
        XmlElement::new("Fragment").with_child(namespaced_copy(prescription.agent_person()?, namespace)),
    );

    envelope = envelope.with_child(
        XmlElement::new("Fragment").with_child(namespaced_copy(prescription.record_target()?, namespace)),
    );

    for line_item in prescription.line_items()? {
        let reduced = reduce_repeat_number(line_item);
        envelope = envelope.with_child(XmlElement::new("Fragment").with_child(namespaced_copy(&reduced, namespace)));
    }

    Ok(envelope)
}

/// Clone a signed element with the HL7 namespace re-attached to its root,
/// matching the standalone form the signer hashed.
fn namespaced_copy(element: &XmlElement, namespace: Option<&str>) -> XmlElement {
    let mut copy = element.clone();
    if let Some(ns) = namespace {
        copy.set_attribute("xmlns", ns);
    }
    copy
}

/// The signed form of a line item keeps only the `high` bound of its
/// `repeatNumber`; an absent `repeatNumber` stays absent.
fn reduce_repeat_number(line_item: &XmlElement) -> XmlElement {
    let mut copy = line_item.clone();
    for child in &mut copy.children {
        let XmlNode::Element(element) = child else { continue };
        if element.local_name() != "repeatNumber" {
            continue;
        }
        let mut reduced = XmlElement::new(element.name.clone());
        if let Some(high) = element.child("high") {
            reduced.children.push(XmlNode::Element(high.clone()));
        }
        *element = reduced;
    }
    copy
}
