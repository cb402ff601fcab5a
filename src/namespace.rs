// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace allow/deny filtering (spec §6, §9).

use std::collections::HashSet;

/// Namespace allow/deny policy, computed once from `Config` at startup.
///
/// A namespace is allowed iff it is not in the deny list, AND (the allow
/// list is empty OR it is in the allow list). When both lists mention the
/// same namespace, deny wins (spec §9, resolved Open Question).
#[derive(Debug, Clone, Default)]
pub struct NamespacePolicy {
    allow: HashSet<String>,
    deny: HashSet<String>,
}

impl NamespacePolicy {
    pub fn new(allow: Vec<String>, deny: Vec<String>) -> Self {
        Self {
            allow: allow.into_iter().collect(),
            deny: deny.into_iter().collect(),
        }
    }

    /// Allow every namespace (no allow/deny list configured).
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn is_allowed(&self, namespace: &str) -> bool {
        if self.deny.contains(namespace) {
            return false;
        }
        self.allow.is_empty() || self.allow.contains(namespace)
    }
}
