// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! XML model, strict parser and canonical serialization for prescription
//! signature verification.
//!
//! This crate carries no cryptography and performs no I/O. It exists so the
//! digest pipeline has one pinned definition of "the bytes that were signed":
//! parse a document into an [`XmlElement`] tree, select a subtree, and
//! [`canonicalize`] it.

mod canonical;
mod element;
mod parser;

pub use canonical::{canonicalize, canonicalize_with_method, EXCLUSIVE_C14N};
pub use element::{XmlAttribute, XmlElement, XmlNode};
pub use parser::parse_document;
