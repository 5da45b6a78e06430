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

use crate::{
    attributes::{
        ERROR_TYPE, HTTP_METHOD, HTTP_REQUEST_HEADER_PREFIX, HTTP_REQUEST_METHOD, HTTP_REQUEST_METHOD_ORIGINAL,
        HTTP_RESPONSE_HEADER_PREFIX, HTTP_RESPONSE_STATUS_CODE, HTTP_STATUS_CODE, OTHER,
    },
    sink::AttributeSink,
    view::{RequestView, ResponseView},
};
use compact_str::CompactString;
use kestrel_configuration::{HttpExtractionConfig, SemconvStability};
use opentelemetry::{Array, Key, StringValue, Value};
use std::collections::BTreeSet;

/// Attributes shared by the client and server sides: method normalization,
/// allow-listed header capture, status code and the error indicator.
#[derive(Debug, Clone)]
pub(crate) struct HttpCommonAttributesExtractor {
    known_methods: BTreeSet<CompactString>,
    captured_request_headers: Vec<CapturedHeader>,
    captured_response_headers: Vec<CapturedHeader>,
    stability: SemconvStability,
}

/// A configured header name together with its precomputed attribute key.
#[derive(Debug, Clone)]
struct CapturedHeader {
    name: CompactString,
    key: Key,
}

impl CapturedHeader {
    fn precompute(prefix: &str, names: &[CompactString]) -> Vec<Self> {
        names
            .iter()
            .map(|name| Self {
                name: name.clone(),
                key: Key::new(format!("{prefix}{}", name.to_ascii_lowercase().replace('-', "_"))),
            })
            .collect()
    }
}

impl HttpCommonAttributesExtractor {
    pub(crate) fn new(config: &HttpExtractionConfig) -> Self {
        Self {
            known_methods: config.known_methods.clone(),
            captured_request_headers: CapturedHeader::precompute(
                HTTP_REQUEST_HEADER_PREFIX,
                &config.captured_request_headers,
            ),
            captured_response_headers: CapturedHeader::precompute(
                HTTP_RESPONSE_HEADER_PREFIX,
                &config.captured_response_headers,
            ),
            stability: config.stability,
        }
    }

    pub(crate) fn on_start<R: RequestView + ?Sized>(&self, sink: &mut AttributeSink, request: &R) {
        if let Some(method) = request.method() {
            // exact, case-sensitive match; everything else is folded into the
            // sentinel to keep attribute cardinality bounded
            let normalized = if self.known_methods.contains(method) { method } else { OTHER };
            if self.stability.emit_stable() {
                sink.set(HTTP_REQUEST_METHOD, normalized.to_owned());
                if normalized == OTHER {
                    sink.set(HTTP_REQUEST_METHOD_ORIGINAL, method.to_owned());
                }
            }
            if self.stability.emit_old() {
                sink.set(HTTP_METHOD, normalized.to_owned());
            }
        }

        for captured in &self.captured_request_headers {
            capture_header_values(sink, captured, request.header_values(&captured.name));
        }
    }

    pub(crate) fn on_end<R, S>(
        &self,
        sink: &mut AttributeSink,
        _request: &R,
        response: Option<&S>,
        error: Option<&str>,
    ) where
        R: RequestView + ?Sized,
        S: ResponseView + ?Sized,
    {
        if let Some(response) = response {
            if let Some(status) = response.status_code() {
                if self.stability.emit_stable() {
                    sink.set(HTTP_RESPONSE_STATUS_CODE, i64::from(status));
                }
                if self.stability.emit_old() {
                    sink.set(HTTP_STATUS_CODE, i64::from(status));
                }
            }
            for captured in &self.captured_response_headers {
                capture_header_values(sink, captured, response.header_values(&captured.name));
            }
        }

        // set whenever the host reports a failure, regardless of status code
        if let Some(error_type) = error {
            let value = if error_type.is_empty() { OTHER } else { error_type };
            sink.set(ERROR_TYPE, value.to_owned());
        }
    }
}

fn capture_header_values(sink: &mut AttributeSink, captured: &CapturedHeader, values: Vec<&str>) {
    if values.is_empty() {
        return;
    }
    let values: Vec<StringValue> = values.into_iter().map(|v| StringValue::from(v.to_owned())).collect();
    sink.set(captured.key.clone(), Value::Array(Array::String(values)));
}
