// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The Certificate Model: types, annotation parsing, and content hashing.

pub mod certificate;
pub mod hash;
pub mod parser;

pub use certificate::{Certificate, SyncConfiguration};
