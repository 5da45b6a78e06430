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

//! Extraction and normalization of HTTP server span attributes following the
//! OpenTelemetry semantic conventions.
//!
//! Library adapters implement [`RequestView`]/[`ResponseView`] over their
//! request and response types; [`HttpServerAttributesExtractor`] turns one
//! request/response pair into a flat set of attributes, reconciling
//! URL-derived values with proxy-forwarded headers and honouring the
//! configured naming-stability generation.

pub mod address;
pub mod attributes;
pub mod forwarded;
pub mod network;
pub mod route;
pub mod server;
pub mod sink;
pub mod url;

mod common;
mod view;

pub use crate::network::Transport;
pub use crate::route::HttpRouteHolder;
pub use crate::server::HttpServerAttributesExtractor;
pub use crate::sink::AttributeSink;
pub use crate::view::{RequestView, ResponseView};

pub use kestrel_configuration::{ConfigError, HttpExtractionConfig, SemconvStability};
