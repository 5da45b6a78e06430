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

use crate::network::Transport;

/// Read-only view of an in-flight request, implemented once per adapted HTTP
/// library. The extraction pipeline is generic over these views and never
/// touches a concrete request type.
///
/// Every accessor may legitimately return nothing; an absent value means the
/// library does not know it, and the pipeline falls back or skips the
/// attribute. Accessors must not panic on malformed data.
pub trait RequestView {
    /// Raw request method token, exactly as the library reports it.
    fn method(&self) -> Option<&str>;

    /// The matched route template (e.g. `/users/{id}`), if routing has
    /// already happened. Often still unknown at span start.
    fn route_template(&self) -> Option<&str> {
        None
    }

    fn url_scheme(&self) -> Option<&str> {
        None
    }

    fn url_path(&self) -> Option<&str> {
        None
    }

    /// Query string without the leading `?`.
    fn url_query(&self) -> Option<&str> {
        None
    }

    /// The local address the request was received on, as the library knows it.
    fn server_address(&self) -> Option<&str> {
        None
    }

    fn server_port(&self) -> Option<u16> {
        None
    }

    /// All values of the named header, in wire order. Name matching is
    /// case-insensitive; an unknown header yields an empty vector.
    fn header_values(&self, name: &str) -> Vec<&str>;

    /// Remote socket address of the immediate peer.
    fn peer_address(&self) -> Option<&str> {
        None
    }

    fn peer_port(&self) -> Option<u16> {
        None
    }

    fn transport(&self) -> Option<Transport> {
        None
    }
}

/// Read-only view of a completed response.
pub trait ResponseView {
    fn status_code(&self) -> Option<u16>;

    /// Same contract as [`RequestView::header_values`].
    fn header_values(&self, name: &str) -> Vec<&str>;
}

/// Only the first value of a repeated header is authoritative for the
/// forwarded-header chain.
pub(crate) fn first_header_value<'a>(request: &'a (impl RequestView + ?Sized), name: &str) -> Option<&'a str> {
    request.header_values(name).first().copied()
}
