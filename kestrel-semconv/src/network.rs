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
    attributes::{NETWORK_TRANSPORT, NET_TRANSPORT},
    sink::AttributeSink,
    view::RequestView,
};
use kestrel_configuration::SemconvStability;

/// OSI transport layer under the HTTP exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Tcp,
    Udp,
    /// Named or unix domain pipe.
    Pipe,
}

impl Transport {
    pub const fn stable_value(self) -> &'static str {
        match self {
            Transport::Tcp => "tcp",
            Transport::Udp => "udp",
            Transport::Pipe => "pipe",
        }
    }

    pub const fn old_value(self) -> &'static str {
        match self {
            Transport::Tcp => "ip_tcp",
            Transport::Udp => "ip_udp",
            Transport::Pipe => "pipe",
        }
    }

    /// TCP is implied by HTTP and is not worth an attribute.
    pub(crate) const fn is_default(self) -> bool {
        matches!(self, Transport::Tcp)
    }
}

/// Emits the transport attribute at span end, skipping the default transport
/// to keep spans lean.
#[derive(Debug, Clone)]
pub(crate) struct NetworkTransportExtractor {
    stability: SemconvStability,
}

impl NetworkTransportExtractor {
    pub(crate) fn new(stability: SemconvStability) -> Self {
        Self { stability }
    }

    pub(crate) fn on_end<R: RequestView + ?Sized>(&self, sink: &mut AttributeSink, request: &R) {
        let Some(transport) = request.transport() else {
            return;
        };
        if transport.is_default() {
            return;
        }
        if self.stability.emit_stable() {
            sink.set(NETWORK_TRANSPORT, transport.stable_value());
        }
        if self.stability.emit_old() {
            sink.set(NET_TRANSPORT, transport.old_value());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UdpRequest;
    struct TcpRequest;

    impl RequestView for UdpRequest {
        fn method(&self) -> Option<&str> {
            Some("GET")
        }
        fn header_values(&self, _name: &str) -> Vec<&str> {
            Vec::new()
        }
        fn transport(&self) -> Option<Transport> {
            Some(Transport::Udp)
        }
    }

    impl RequestView for TcpRequest {
        fn method(&self) -> Option<&str> {
            Some("GET")
        }
        fn header_values(&self, _name: &str) -> Vec<&str> {
            Vec::new()
        }
        fn transport(&self) -> Option<Transport> {
            Some(Transport::Tcp)
        }
    }

    #[test]
    fn default_transport_is_suppressed() {
        let mut sink = AttributeSink::new();
        NetworkTransportExtractor::new(SemconvStability::Both).on_end(&mut sink, &TcpRequest);
        assert!(sink.is_empty());
    }

    #[test]
    fn non_default_transport_is_emitted_per_generation() {
        let mut sink = AttributeSink::new();
        NetworkTransportExtractor::new(SemconvStability::Both).on_end(&mut sink, &UdpRequest);
        assert_eq!(sink.get(NETWORK_TRANSPORT), Some(&"udp".into()));
        assert_eq!(sink.get(NET_TRANSPORT), Some(&"ip_udp".into()));

        let mut sink = AttributeSink::new();
        NetworkTransportExtractor::new(SemconvStability::Old).on_end(&mut sink, &UdpRequest);
        assert_eq!(sink.get(NETWORK_TRANSPORT), None);
        assert_eq!(sink.get(NET_TRANSPORT), Some(&"ip_udp".into()));
    }
}
