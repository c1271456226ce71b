// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shared helpers for `rxsig-x509` integration tests.
//!
//! Certificate, CRL and fetcher factories live here so each test file only
//! carries the scenario under test. All certificates are generated with
//! `rcgen`; the canned fetcher stands in for the HTTP client so revocation
//! tests never touch the network.

#![allow(dead_code)]

use std::collections::HashMap;

use async_trait::async_trait;
use rxsig_x509::{CrlFetchError, CrlFetcher};

pub(crate) struct TestCa {
    pub(crate) cert: rcgen::Certificate,
    pub(crate) key: rcgen::KeyPair,
}

impl TestCa {
    pub(crate) fn pem(&self) -> String {
        self.cert.pem()
    }
}

pub(crate) fn make_ca(common_name: &str) -> TestCa {
    let mut params = rcgen::CertificateParams::default();
    params.distinguished_name = rcgen::DistinguishedName::new();
    params
        .distinguished_name
        .push(rcgen::DnType::CommonName, common_name);
    params.is_ca = rcgen::IsCa::Ca(rcgen::BasicConstraints::Unconstrained);

    let key = rcgen::KeyPair::generate().unwrap();
    let cert = params.self_signed(&key).unwrap();
    TestCa { cert, key }
}

/// An end-entity certificate issued by `ca`, returned as DER.
pub(crate) fn make_leaf_der(
    ca: &TestCa,
    serial: &[u8],
    not_before: time::OffsetDateTime,
    not_after: time::OffsetDateTime,
    crl_uris: &[&str],
) -> Vec<u8> {
    let mut params = rcgen::CertificateParams::default();
    params.distinguished_name = rcgen::DistinguishedName::new();
    params
        .distinguished_name
        .push(rcgen::DnType::CommonName, "prescriber.test");
    params.serial_number = Some(rcgen::SerialNumber::from(serial.to_vec()));
    params.not_before = not_before;
    params.not_after = not_after;
    params.crl_distribution_points = crl_uris
        .iter()
        .map(|uri| rcgen::CrlDistributionPoint {
            uris: vec![(*uri).to_string()],
        })
        .collect();
    // rcgen 0.13 only emits the extensions block when one of its gating
    // flags is set; without this the distribution points above are silently
    // dropped from the certificate.
    params.use_authority_key_identifier_extension = true;

    let key = rcgen::KeyPair::generate().unwrap();
    params.signed_by(&key, &ca.cert, &ca.key).unwrap().der().to_vec()
}

pub(crate) struct RevokedSpec {
    pub(crate) serial: Vec<u8>,
    pub(crate) revoked_at: time::OffsetDateTime,
    pub(crate) reason: Option<rcgen::RevocationReason>,
}

/// A CRL signed by `ca` listing the given entries, returned as DER.
pub(crate) fn make_crl_der(ca: &TestCa, entries: Vec<RevokedSpec>) -> Vec<u8> {
    let params = rcgen::CertificateRevocationListParams {
        this_update: rcgen::date_time_ymd(2020, 1, 1),
        next_update: rcgen::date_time_ymd(2035, 1, 1),
        crl_number: rcgen::SerialNumber::from(vec![1u8]),
        issuing_distribution_point: None,
        revoked_certs: entries
            .into_iter()
            .map(|entry| rcgen::RevokedCertParams {
                serial_number: rcgen::SerialNumber::from(entry.serial),
                revocation_time: entry.revoked_at,
                reason_code: entry.reason,
                invalidity_date: None,
            })
            .collect(),
        key_identifier_method: rcgen::KeyIdMethod::Sha256,
    };
    params.signed_by(&ca.cert, &ca.key).unwrap().der().to_vec()
}

/// A fetcher returning canned responses by URL.
///
/// Unmapped URLs fail with a transport error; explicitly registered failures
/// return HTTP 404. Both exercise the soft-failure path.
pub(crate) struct CannedCrlFetcher {
    responses: HashMap<String, Vec<u8>>,
    not_found: Vec<String>,
}

impl CannedCrlFetcher {
    pub(crate) fn new() -> Self {
        Self {
            responses: HashMap::new(),
            not_found: Vec::new(),
        }
    }

    pub(crate) fn with_crl(mut self, url: &str, der: Vec<u8>) -> Self {
        self.responses.insert(url.to_string(), der);
        self
    }

    pub(crate) fn with_not_found(mut self, url: &str) -> Self {
        self.not_found.push(url.to_string());
        self
    }
}

#[async_trait]
impl CrlFetcher for CannedCrlFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, CrlFetchError> {
        if let Some(der) = self.responses.get(url) {
            return Ok(der.clone());
        }
        if self.not_found.iter().any(|u| u == url) {
            return Err(CrlFetchError::Status(404));
        }
        Err(CrlFetchError::Transport(format!("no route to {url}")))
    }
}
