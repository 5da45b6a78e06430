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

use serde::{Deserialize, Serialize};
use std::env::var;
use tracing::warn;

/// Selects which generation of HTTP semantic-convention attribute names the
/// extractors emit. During a migration both generations may be emitted at once;
/// at least one generation is always enabled.
///
/// Read once at process start, immutable afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemconvStability {
    /// Emit only the old experimental attribute names (`http.method`, `net.host.name`, ...).
    #[default]
    Old,
    /// Emit only the stable attribute names (`http.request.method`, `server.address`, ...).
    Stable,
    /// Emit both generations side by side.
    Both,
}

/// Environment variable holding the comma-separated opt-in list, following the
/// OpenTelemetry configuration convention. The token `http` selects the stable
/// names, `http/dup` selects dual emission.
pub const SEMCONV_OPT_IN_VAR: &str = "OTEL_SEMCONV_STABILITY_OPT_IN";

impl SemconvStability {
    pub fn from_env() -> Self {
        Self::from_opt_in(var(SEMCONV_OPT_IN_VAR).ok().as_deref())
    }

    /// Parses the opt-in list. `http/dup` wins over `http` when both are present.
    pub fn from_opt_in(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return SemconvStability::Old;
        };

        let mut stability = SemconvStability::Old;
        for token in value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match token {
                "http/dup" => stability = SemconvStability::Both,
                "http" => {
                    if stability != SemconvStability::Both {
                        stability = SemconvStability::Stable;
                    }
                },
                other => {
                    warn!("ignoring unrecognized semconv opt-in token {other:?}");
                },
            }
        }
        stability
    }

    #[inline]
    pub const fn emit_old(self) -> bool {
        matches!(self, SemconvStability::Old | SemconvStability::Both)
    }

    #[inline]
    pub const fn emit_stable(self) -> bool {
        matches!(self, SemconvStability::Stable | SemconvStability::Both)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn default_is_old_only() {
        let stability = SemconvStability::from_opt_in(None);
        assert_eq!(stability, SemconvStability::Old);
        assert!(stability.emit_old());
        assert!(!stability.emit_stable());
    }

    #[test]
    fn opt_in_http_is_stable_only() {
        let stability = SemconvStability::from_opt_in(Some("http"));
        assert_eq!(stability, SemconvStability::Stable);
        assert!(!stability.emit_old());
        assert!(stability.emit_stable());
    }

    #[test]
    fn opt_in_dup_emits_both() {
        let stability = SemconvStability::from_opt_in(Some("http/dup"));
        assert_eq!(stability, SemconvStability::Both);
        assert!(stability.emit_old());
        assert!(stability.emit_stable());
    }

    #[test]
    fn dup_wins_over_plain_http() {
        assert_eq!(SemconvStability::from_opt_in(Some("http,http/dup")), SemconvStability::Both);
        assert_eq!(SemconvStability::from_opt_in(Some("http/dup, http")), SemconvStability::Both);
    }

    #[test]
    #[traced_test]
    fn unknown_tokens_warn_even_after_dup() {
        let stability = SemconvStability::from_opt_in(Some("http/dup,database"));
        assert_eq!(stability, SemconvStability::Both);
        assert!(logs_contain("ignoring unrecognized semconv opt-in token"));
    }

    #[test]
    #[traced_test]
    fn unknown_tokens_are_ignored_with_a_warning() {
        let stability = SemconvStability::from_opt_in(Some("database, http"));
        assert_eq!(stability, SemconvStability::Stable);
        assert!(logs_contain("ignoring unrecognized semconv opt-in token"));
    }

    #[test]
    fn every_mode_enables_at_least_one_generation() {
        for stability in [SemconvStability::Old, SemconvStability::Stable, SemconvStability::Both] {
            assert!(stability.emit_old() || stability.emit_stable());
        }
    }
}
