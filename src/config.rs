// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Process configuration loaded once from environment variables at startup.

use crate::constants::DEFAULT_PREFIX;
use crate::namespace::NamespacePolicy;
use std::env;

/// Operator configuration loaded from environment variables (spec §6).
#[derive(Debug, Clone)]
pub struct Config {
    /// Controller annotation prefix, fixed for the process lifetime.
    pub prefix: String,
    /// Namespace allow/deny policy.
    pub namespace_policy: NamespacePolicy,
    /// Forces every eligible reconcile past the hash check.
    pub cache_disable: bool,
    pub log_level: String,
    pub log_format: String,
    pub enable_metrics: bool,
    pub metrics_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let prefix = env::var("OPERATOR_NAME").unwrap_or_else(|_| DEFAULT_PREFIX.to_string());

        let namespace_policy = if let Ok(single) = env::var("SECRETS_NAMESPACE") {
            // Deprecated single-namespace allowlist overrides the other two.
            NamespacePolicy::new(vec![single], Vec::new())
        } else {
            let enabled = parse_csv(env::var("ENABLED_NAMESPACES").ok());
            let disabled = parse_csv(env::var("DISABLED_NAMESPACES").ok());
            NamespacePolicy::new(enabled, disabled)
        };

        let cache_disable = parse_bool(env::var("CACHE_DISABLE").ok(), false);
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
        let enable_metrics = parse_bool(env::var("ENABLE_METRICS").ok(), true);
        let metrics_port = env::var("METRICS_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8080);

        Config {
            prefix,
            namespace_policy,
            cache_disable,
            log_level,
            log_format,
            enable_metrics,
            metrics_port,
        }
    }
}

fn parse_csv(value: Option<String>) -> Vec<String> {
    match value {
        Some(v) if !v.trim().is_empty() => v
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    match value {
        Some(v) => v.eq_ignore_ascii_case("true"),
        None => default,
    }
}
