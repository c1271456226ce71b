// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Prescription signature verification engine.
//!
//! Given a digitally-signed HL7v3 parent prescription, this crate decides
//! whether the embedded XML-DSIG signature is structurally valid,
//! cryptographically correct, bound to a certificate that was valid at
//! signing time, issued by a configured trusted sub-CA, and not revoked.
//!
//! The entry points are [`verify_prescription_signature`] (parsed document)
//! and [`verify_prescription_signature_xml`] (raw XML), both returning the
//! list of failure reasons; an empty list is the sole success signal.

// Internal implementation modules.
mod algorithms;
mod digest;
mod fragments;
mod hl7_time;
mod prescription;
mod signature_block;
mod signature_verifier;
mod verifier;

// Public API organization (lib.rs is a publisher).
mod api;
mod settings;

pub use algorithms::SignatureAlgorithm;
pub use api::verify_prescription_signature_xml;
pub use digest::{
    build_signed_info, calculate_signed_info_from_prescription, digest_matches_prescription,
    extract_embedded_signed_info, XMLDSIG_NS,
};
pub use fragments::extract_fragments;
pub use hl7_time::parse_hl7_datetime;
pub use prescription::ParentPrescription;
pub use settings::{RevocationPolicy, VerificationSettings};
pub use signature_block::SignatureBlock;
pub use signature_verifier::verify_signature_value;
pub use verifier::{reasons, verify_prescription_signature};
