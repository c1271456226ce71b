// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Certificate validity-window check.

use crate::ParsedCertificate;

/// Inclusive range test: a signature created exactly at `notBefore` or
/// `notAfter` is still covered by the certificate.
pub fn certificate_valid_at(certificate: &ParsedCertificate, instant: i64) -> bool {
    certificate.not_before <= instant && instant <= certificate.not_after
}
