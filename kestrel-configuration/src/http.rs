// Copyright 2025 The kmesh Authors
//
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
//

use crate::stability::{SemconvStability, SEMCONV_OPT_IN_VAR};
use compact_str::CompactString;
use http::header::HeaderName;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, env::var, str::FromStr};

pub const KNOWN_METHODS_VAR: &str = "OTEL_INSTRUMENTATION_HTTP_KNOWN_METHODS";
pub const CAPTURE_REQUEST_HEADERS_VAR: &str = "OTEL_INSTRUMENTATION_HTTP_CAPTURE_REQUEST_HEADERS";
pub const CAPTURE_RESPONSE_HEADERS_VAR: &str = "OTEL_INSTRUMENTATION_HTTP_CAPTURE_RESPONSE_HEADERS";
pub const PREFER_FORWARDED_URL_SCHEME_VAR: &str = "OTEL_INSTRUMENTATION_HTTP_PREFER_FORWARDED_URL_SCHEME";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid captured header name {0:?}")]
    InvalidHeaderName(CompactString),
    #[error("invalid HTTP method token {0:?}")]
    InvalidMethodToken(CompactString),
    #[error("failed to open {0}: {1}")]
    Io(String, #[source] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Immutable configuration of the HTTP attribute extraction pipeline.
/// Built once at startup, then shared read-only across requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpExtractionConfig {
    /// Method tokens emitted verbatim; anything else is normalized to `_OTHER`.
    #[serde(default = "default_known_methods")]
    pub known_methods: BTreeSet<CompactString>,
    /// Request header names captured into `http.request.header.*` attributes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub captured_request_headers: Vec<CompactString>,
    /// Response header names captured into `http.response.header.*` attributes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub captured_response_headers: Vec<CompactString>,
    /// When set, the URL scheme is taken from `Forwarded`/`X-Forwarded-Proto`
    /// if one of them carries a proto value.
    #[serde(default)]
    pub prefer_forwarded_url_scheme: bool,
    #[serde(default)]
    pub stability: SemconvStability,
}

impl Default for HttpExtractionConfig {
    fn default() -> Self {
        Self {
            known_methods: default_known_methods(),
            captured_request_headers: Vec::new(),
            captured_response_headers: Vec::new(),
            prefer_forwarded_url_scheme: false,
            stability: SemconvStability::default(),
        }
    }
}

/// RFC 9110 request methods plus PATCH (RFC 5789).
pub fn default_known_methods() -> BTreeSet<CompactString> {
    ["CONNECT", "DELETE", "GET", "HEAD", "OPTIONS", "PATCH", "POST", "PUT", "TRACE"]
        .into_iter()
        .map(CompactString::from)
        .collect()
}

impl HttpExtractionConfig {
    /// Applies environment overrides on top of the current values, in the same
    /// spirit as the runtime configuration: environment wins over file wins
    /// over built-in defaults.
    #[must_use]
    pub fn update_from_env(self) -> Self {
        HttpExtractionConfig {
            known_methods: var(KNOWN_METHODS_VAR)
                .ok()
                .map(|v| split_list(&v).collect::<BTreeSet<_>>())
                .filter(|set| !set.is_empty())
                .unwrap_or(self.known_methods),

            captured_request_headers: var(CAPTURE_REQUEST_HEADERS_VAR)
                .ok()
                .map(|v| split_list(&v).collect())
                .unwrap_or(self.captured_request_headers),

            captured_response_headers: var(CAPTURE_RESPONSE_HEADERS_VAR)
                .ok()
                .map(|v| split_list(&v).collect())
                .unwrap_or(self.captured_response_headers),

            prefer_forwarded_url_scheme: var(PREFER_FORWARDED_URL_SCHEME_VAR)
                .ok()
                .and_then(|v| v.parse::<bool>().ok())
                .unwrap_or(self.prefer_forwarded_url_scheme),

            stability: var(SEMCONV_OPT_IN_VAR)
                .ok()
                .map(|v| SemconvStability::from_opt_in(Some(&v)))
                .unwrap_or(self.stability),
        }
    }

    /// Rejects values that could never match a real header or method. This is
    /// the only fatal error surface of the pipeline; per-request extraction
    /// never fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for name in self.captured_request_headers.iter().chain(&self.captured_response_headers) {
            if HeaderName::from_str(name).is_err() {
                return Err(ConfigError::InvalidHeaderName(name.clone()));
            }
        }
        for method in &self.known_methods {
            if method.is_empty() || !method.bytes().all(is_tchar) {
                return Err(ConfigError::InvalidMethodToken(method.clone()));
            }
        }
        Ok(())
    }
}

fn split_list(value: &str) -> impl Iterator<Item = CompactString> + '_ {
    value.split(',').map(str::trim).filter(|t| !t.is_empty()).map(CompactString::from)
}

// token chars per RFC 9110 §5.6.2
fn is_tchar(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_known_methods_cover_rfc9110_and_patch() {
        let config = HttpExtractionConfig::default();
        for method in ["GET", "HEAD", "POST", "PUT", "DELETE", "CONNECT", "OPTIONS", "TRACE", "PATCH"] {
            assert!(config.known_methods.contains(method), "missing {method}");
        }
        assert!(!config.known_methods.contains("PURGE"));
    }

    #[test]
    fn default_config_is_valid() {
        HttpExtractionConfig::default().validate().unwrap();
    }

    #[test]
    fn invalid_captured_header_is_fatal() {
        let config = HttpExtractionConfig {
            captured_request_headers: vec!["x valid no".into()],
            ..HttpExtractionConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHeaderName(_)));
    }

    #[test]
    fn invalid_method_token_is_fatal() {
        let config = HttpExtractionConfig {
            known_methods: ["G E T".into()].into_iter().collect(),
            ..HttpExtractionConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMethodToken(_)));
    }
}
