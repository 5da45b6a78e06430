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
        CLIENT_ADDRESS, HTTP_CLIENT_IP, NET_HOST_NAME, NET_HOST_PORT, NET_SOCK_PEER_ADDR, NET_SOCK_PEER_PORT,
        SERVER_ADDRESS, SERVER_PORT,
    },
    forwarded,
    sink::AttributeSink,
    view::{first_header_value, RequestView},
};
use compact_str::{CompactString, ToCompactString};
use kestrel_configuration::SemconvStability;
use kestrel_http_header::{FORWARDED, X_FORWARDED_FOR};

/// Result of one address resolution: an address and, when the winning source
/// knows it, a port. A source that yields an address without a port leaves the
/// port absent rather than inventing one.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AddressPort {
    pub address: Option<CompactString>,
    pub port: Option<u16>,
}

/// A lower-priority source of address/port information, consulted only when
/// the library's own fields are empty.
pub trait FallbackAddressPortExtractor<R: ?Sized> {
    fn extract(&self, sink: &mut AddressPort, request: &R);
}

/// Fallback for the server role: the `Host` request header, in
/// `host`, `host:port` or `[v6]:port` form.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HostAddressPortExtractor;

impl<R: RequestView + ?Sized> FallbackAddressPortExtractor<R> for HostAddressPortExtractor {
    fn extract(&self, sink: &mut AddressPort, request: &R) {
        let Some(host) = first_header_value(request, http::header::HOST.as_str()) else {
            return;
        };
        let (address, port) = split_host_port(host);
        sink.address = address.map(|address| address.to_compact_string());
        sink.port = port;
    }
}

fn split_host_port(host: &str) -> (Option<&str>, Option<u16>) {
    if let Some(rest) = host.strip_prefix('[') {
        let Some((address, after)) = rest.split_once(']') else {
            return (None, None);
        };
        if address.is_empty() {
            return (None, None);
        }
        (Some(address), after.strip_prefix(':').and_then(|p| p.parse().ok()))
    } else if let Some((address, port)) = host.rsplit_once(':') {
        if address.contains(':') {
            // bare IPv6, the "port" was one of its groups
            (Some(host), None)
        } else if address.is_empty() {
            (None, None)
        } else {
            (Some(address), port.parse().ok())
        }
    } else if host.is_empty() {
        (None, None)
    } else {
        (Some(host), None)
    }
}

/// Fallback for the client role: `Forwarded` `for=`, then the first entry of
/// `X-Forwarded-For`. Client port recovery from forwarded headers is an
/// intentional non-feature; the port stays absent.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ForwardedClientAddressExtractor;

impl<R: RequestView + ?Sized> FallbackAddressPortExtractor<R> for ForwardedClientAddressExtractor {
    fn extract(&self, sink: &mut AddressPort, request: &R) {
        if let Some(header) = first_header_value(request, FORWARDED.as_str()) {
            if let Some(ip) = forwarded::client_ip_from_forwarded(header) {
                sink.address = Some(ip.into());
                return;
            }
        }
        if let Some(header) = first_header_value(request, X_FORWARDED_FOR.as_str()) {
            sink.address = forwarded::client_ip_from_forwarded_for(header).map(CompactString::from);
        }
    }
}

/// Resolves and writes the server-side address and port, `server.address` /
/// `net.host.name` depending on the enabled generations. The port is passed
/// through `capture_port` so the orchestrator can suppress scheme-default
/// ports.
#[derive(Debug, Clone)]
pub(crate) struct ServerAttributesExtractor {
    stability: SemconvStability,
}

impl ServerAttributesExtractor {
    pub(crate) fn new(stability: SemconvStability) -> Self {
        Self { stability }
    }

    pub(crate) fn write<R>(&self, sink: &mut AttributeSink, request: &R, capture_port: impl Fn(u16) -> bool)
    where
        R: RequestView + ?Sized,
    {
        let resolved = Self::resolve(request);
        let Some(address) = resolved.address else {
            return;
        };
        let port = resolved.port.filter(|&p| capture_port(p));

        if self.stability.emit_stable() {
            sink.set(SERVER_ADDRESS, address.to_string());
            sink.set_opt(SERVER_PORT, port.map(i64::from));
        }
        if self.stability.emit_old() {
            sink.set(NET_HOST_NAME, address.to_string());
            sink.set_opt(NET_HOST_PORT, port.map(i64::from));
        }
    }

    /// The library's own notion of its local address wins; the `Host` header
    /// is only a fallback. The port always comes from the same source as the
    /// address.
    fn resolve<R: RequestView + ?Sized>(request: &R) -> AddressPort {
        let mut resolved = AddressPort::default();
        if let Some(address) = request.server_address() {
            resolved.address = Some(address.into());
            resolved.port = request.server_port();
        } else {
            HostAddressPortExtractor.extract(&mut resolved, request);
        }
        resolved
    }
}

/// Resolves and writes the client address, `client.address` / `http.client_ip`.
#[derive(Debug, Clone)]
pub(crate) struct ClientAttributesExtractor {
    stability: SemconvStability,
}

impl ClientAttributesExtractor {
    pub(crate) fn new(stability: SemconvStability) -> Self {
        Self { stability }
    }

    pub(crate) fn write<R: RequestView + ?Sized>(&self, sink: &mut AttributeSink, request: &R) {
        let mut resolved = AddressPort::default();
        ForwardedClientAddressExtractor.extract(&mut resolved, request);
        let Some(address) = resolved.address else {
            return;
        };

        if self.stability.emit_stable() {
            sink.set(CLIENT_ADDRESS, address.to_string());
        }
        if self.stability.emit_old() {
            sink.set(HTTP_CLIENT_IP, address.to_string());
        }
    }
}

/// Old-generation socket-level peer attributes, taken straight from the
/// library's peer accessor.
#[derive(Debug, Clone)]
pub(crate) struct PeerSocketExtractor {
    stability: SemconvStability,
}

impl PeerSocketExtractor {
    pub(crate) fn new(stability: SemconvStability) -> Self {
        Self { stability }
    }

    pub(crate) fn on_start<R: RequestView + ?Sized>(&self, sink: &mut AttributeSink, request: &R) {
        if !self.stability.emit_old() {
            return;
        }
        let Some(address) = request.peer_address() else {
            return;
        };
        sink.set(NET_SOCK_PEER_ADDR, address.to_string());
        sink.set_opt(NET_SOCK_PEER_PORT, request.peer_port().map(i64::from));
    }
}
