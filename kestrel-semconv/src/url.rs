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
    attributes::{HTTP_SCHEME, HTTP_TARGET, URL_PATH, URL_QUERY, URL_SCHEME},
    forwarded,
    sink::AttributeSink,
    view::{first_header_value, RequestView},
};
use kestrel_configuration::SemconvStability;
use kestrel_http_header::{FORWARDED, X_FORWARDED_PROTO};

/// Writes the URL attributes at span start: stable `url.*` and the old
/// `http.scheme` / `http.target` pair.
#[derive(Debug, Clone)]
pub(crate) struct UrlAttributesExtractor {
    stability: SemconvStability,
    prefer_forwarded_url_scheme: bool,
}

impl UrlAttributesExtractor {
    pub(crate) fn new(stability: SemconvStability, prefer_forwarded_url_scheme: bool) -> Self {
        Self { stability, prefer_forwarded_url_scheme }
    }

    pub(crate) fn on_start<R: RequestView + ?Sized>(&self, sink: &mut AttributeSink, request: &R) {
        let scheme = self.scheme(request);
        let path = request.url_path();
        let query = request.url_query();

        if self.stability.emit_stable() {
            sink.set_opt(URL_SCHEME, scheme.map(str::to_owned));
            sink.set_opt(URL_PATH, path.map(str::to_owned));
            sink.set_opt(URL_QUERY, query.map(str::to_owned));
        }
        if self.stability.emit_old() {
            sink.set_opt(HTTP_SCHEME, scheme.map(str::to_owned));
            if let Some(path) = path {
                let target = match query {
                    Some(query) => format!("{path}?{query}"),
                    None => path.to_owned(),
                };
                sink.set(HTTP_TARGET, target);
            }
        }
    }

    /// The URL's own scheme, unless the configuration prefers the scheme the
    /// client used towards the first proxy.
    fn scheme<'a, R: RequestView + ?Sized>(&self, request: &'a R) -> Option<&'a str> {
        if self.prefer_forwarded_url_scheme {
            if let Some(proto) = Self::forwarded_proto(request) {
                return Some(proto);
            }
        }
        request.url_scheme()
    }

    fn forwarded_proto<R: RequestView + ?Sized>(request: &R) -> Option<&str> {
        if let Some(header) = first_header_value(request, FORWARDED.as_str()) {
            if let Some(proto) = forwarded::proto_from_forwarded(header) {
                return Some(proto);
            }
        }
        first_header_value(request, X_FORWARDED_PROTO.as_str()).and_then(forwarded::proto_from_forwarded_proto)
    }
}
