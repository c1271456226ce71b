// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use tracing::debug;

use crate::prescription::ParentPrescription;
use crate::settings::VerificationSettings;
use crate::verifier;

/// Verify a prescription supplied as raw XML.
///
/// A document that does not parse, or parses without a `ParentPrescription`,
/// reports the format reason the same way a structurally-broken signature
/// does.
pub async fn verify_prescription_signature_xml(xml: &str, settings: &VerificationSettings) -> Vec<String> {
    match ParentPrescription::parse(xml) {
        Ok(prescription) => verifier::verify_prescription_signature(&prescription, settings).await,
        Err(e) => {
            debug!(error = %e, "input document did not parse");
            vec![verifier::reasons::INVALID_SIGNATURE_FORMAT.to_string()]
        }
    }
}
