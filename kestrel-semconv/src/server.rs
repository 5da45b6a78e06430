// SPDX-FileCopyrightText: © 2025 kmesh authors
// SPDX-License-Identifier: Apache-2.0
//
// Copyright 2025 kmesh authors
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
    address::{ClientAttributesExtractor, PeerSocketExtractor, ServerAttributesExtractor},
    attributes::HTTP_ROUTE,
    common::HttpCommonAttributesExtractor,
    network::NetworkTransportExtractor,
    route::HttpRouteHolder,
    sink::AttributeSink,
    url::UrlAttributesExtractor,
    view::{RequestView, ResponseView},
};
use kestrel_configuration::{ConfigError, HttpExtractionConfig};
use tracing::debug;

/// Extractor of server-side HTTP span attributes.
///
/// The host pipeline calls [`on_start`](Self::on_start) once when request
/// processing begins and [`on_end`](Self::on_end) once when it completes; each
/// call fans out to the sub-extractors in a fixed order. Extraction itself
/// never fails; the only error path is configuration validation at
/// construction.
#[derive(Debug, Clone)]
pub struct HttpServerAttributesExtractor {
    common: HttpCommonAttributesExtractor,
    url: UrlAttributesExtractor,
    peer_socket: PeerSocketExtractor,
    server: ServerAttributesExtractor,
    client: ClientAttributesExtractor,
    network: NetworkTransportExtractor,
}

impl HttpServerAttributesExtractor {
    pub fn new(config: &HttpExtractionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let stability = config.stability;
        debug!(
            "http server attribute extractor configured: {} known methods, {}+{} captured headers, stability {:?}",
            config.known_methods.len(),
            config.captured_request_headers.len(),
            config.captured_response_headers.len(),
            stability
        );
        Ok(Self {
            common: HttpCommonAttributesExtractor::new(config),
            url: UrlAttributesExtractor::new(stability, config.prefer_forwarded_url_scheme),
            peer_socket: PeerSocketExtractor::new(stability),
            server: ServerAttributesExtractor::new(stability),
            client: ClientAttributesExtractor::new(stability),
            network: NetworkTransportExtractor::new(stability),
        })
    }

    /// Populates span-start attributes. The route template is whatever the
    /// library reports at this point, which may be nothing if routing happens
    /// later in the handler chain.
    pub fn on_start<R: RequestView + ?Sized>(&self, sink: &mut AttributeSink, request: &R) {
        self.common.on_start(sink, request);
        self.url.on_start(sink, request);
        self.peer_socket.on_start(sink, request);
        self.server.write(sink, request, |port| Self::capture_server_port(port, request));
        self.client.write(sink, request);

        sink.set_opt(HTTP_ROUTE, request.route_template().map(str::to_owned));
    }

    /// Populates span-end attributes. Address and port are resolved again
    /// because some libraries only learn them during processing; earlier
    /// non-empty values are kept. The route is the one place where a later
    /// value replaces an earlier one, since path-pattern matching typically
    /// finishes after the span has started.
    pub fn on_end<R, S>(
        &self,
        sink: &mut AttributeSink,
        context: &HttpRouteHolder,
        request: &R,
        response: Option<&S>,
        error: Option<&str>,
    ) where
        R: RequestView + ?Sized,
        S: ResponseView + ?Sized,
    {
        self.common.on_end(sink, request, response, error);
        self.network.on_end(sink, request);
        self.server.write(sink, request, |port| Self::capture_server_port(port, request));
        self.client.write(sink, request);

        if let Some(route) = context.route() {
            sink.replace(HTTP_ROUTE, route.to_string());
        }
    }

    /// A port equal to the scheme default carries no information. Without a
    /// known scheme the default is unknowable, so the port is always kept.
    fn capture_server_port<R: RequestView + ?Sized>(port: u16, request: &R) -> bool {
        match request.url_scheme() {
            Some("http") => port != 80,
            Some("https") => port != 443,
            _ => true,
        }
    }
}
