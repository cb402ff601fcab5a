// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Informer Integration (spec §4.6): subscribes to Secret Add/Update
//! events and delivers each to the Reconciler.

pub mod secret;

pub use secret::SecretController;
