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

use compact_str::CompactString;
use parking_lot::Mutex;

/// Per-request slot for the matched route template.
///
/// Routing frameworks usually match the path pattern somewhere inside the
/// handler chain, after the span has already started. Middleware writes the
/// final template here and the server extractor reads it back at span end.
///
/// One holder belongs to exactly one request context. If the host forks a
/// context, [`HttpRouteHolder::fork`] snapshots the slot instead of aliasing
/// it across requests.
#[derive(Debug, Default)]
pub struct HttpRouteHolder {
    route: Mutex<Option<CompactString>>,
}

impl HttpRouteHolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the matched route, replacing any earlier value. The last write
    /// before span end wins.
    pub fn update_route(&self, route: impl Into<CompactString>) {
        *self.route.lock() = Some(route.into());
    }

    /// The route as currently known; absent if no middleware reported one.
    pub fn route(&self) -> Option<CompactString> {
        self.route.lock().clone()
    }

    /// Snapshot for context forking; later writes to either copy stay local.
    pub fn fork(&self) -> Self {
        Self { route: Mutex::new(self.route.lock().clone()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritten_holder_reads_absent() {
        assert_eq!(HttpRouteHolder::new().route(), None);
    }

    #[test]
    fn last_write_wins() {
        let holder = HttpRouteHolder::new();
        holder.update_route("/users");
        holder.update_route("/users/{id}");
        assert_eq!(holder.route().as_deref(), Some("/users/{id}"));
    }

    #[test]
    fn fork_detaches_the_slot() {
        let holder = HttpRouteHolder::new();
        holder.update_route("/a");
        let forked = holder.fork();
        forked.update_route("/b");
        assert_eq!(holder.route().as_deref(), Some("/a"));
        assert_eq!(forked.route().as_deref(), Some("/b"));
    }
}
