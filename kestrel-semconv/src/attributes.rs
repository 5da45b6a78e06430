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

//! Attribute names as fixed by the OpenTelemetry semantic conventions.
//! Both naming generations are listed; which one is written depends on the
//! configured [`SemconvStability`](kestrel_configuration::SemconvStability).

// stable names
pub const HTTP_REQUEST_METHOD: &str = "http.request.method";
pub const HTTP_REQUEST_METHOD_ORIGINAL: &str = "http.request.method_original";
pub const HTTP_RESPONSE_STATUS_CODE: &str = "http.response.status_code";
pub const HTTP_ROUTE: &str = "http.route";
pub const URL_PATH: &str = "url.path";
pub const URL_QUERY: &str = "url.query";
pub const URL_SCHEME: &str = "url.scheme";
pub const SERVER_ADDRESS: &str = "server.address";
pub const SERVER_PORT: &str = "server.port";
pub const CLIENT_ADDRESS: &str = "client.address";
pub const NETWORK_TRANSPORT: &str = "network.transport";
pub const ERROR_TYPE: &str = "error.type";

// old (experimental) names, kept for the dual-emission migration period
pub const HTTP_METHOD: &str = "http.method";
pub const HTTP_STATUS_CODE: &str = "http.status_code";
pub const HTTP_SCHEME: &str = "http.scheme";
pub const HTTP_TARGET: &str = "http.target";
pub const HTTP_CLIENT_IP: &str = "http.client_ip";
pub const NET_HOST_NAME: &str = "net.host.name";
pub const NET_HOST_PORT: &str = "net.host.port";
pub const NET_SOCK_PEER_ADDR: &str = "net.sock.peer.addr";
pub const NET_SOCK_PEER_PORT: &str = "net.sock.peer.port";
pub const NET_TRANSPORT: &str = "net.transport";

/// Cardinality guard sentinel, used for methods outside the configured known
/// set and for unclassified error types.
pub const OTHER: &str = "_OTHER";

/// Prefixes for allow-listed captured headers; the header name is appended
/// lowercased with dashes replaced by underscores.
pub const HTTP_REQUEST_HEADER_PREFIX: &str = "http.request.header.";
pub const HTTP_RESPONSE_HEADER_PREFIX: &str = "http.response.header.";
