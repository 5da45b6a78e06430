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

use opentelemetry::{Key, KeyValue, Value};

/// Ordered, key-unique collection of attributes for one request.
///
/// Writes are first-write-wins: once a key holds a value it is not replaced,
/// so resolvers can run in priority order and later resolvers only fill gaps.
/// The single exception is [`AttributeSink::replace`], used for the route
/// attribute which may only become final during request processing.
#[derive(Debug, Default)]
pub struct AttributeSink {
    entries: Vec<KeyValue>,
}

impl AttributeSink {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Inserts `value` under `key` unless the key is already present.
    pub fn set(&mut self, key: impl Into<Key>, value: impl Into<Value>) {
        let key = key.into();
        if self.entries.iter().any(|kv| kv.key == key) {
            return;
        }
        self.entries.push(KeyValue::new(key, value));
    }

    /// [`AttributeSink::set`] lifted over `Option`; `None` writes nothing.
    pub fn set_opt<V: Into<Value>>(&mut self, key: impl Into<Key>, value: Option<V>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    /// Overwrites the value under `key`, appending if absent. Insertion order
    /// of an existing key is preserved.
    pub fn replace(&mut self, key: impl Into<Key>, value: impl Into<Value>) {
        let key = key.into();
        if let Some(kv) = self.entries.iter_mut().find(|kv| kv.key == key) {
            kv.value = value.into();
        } else {
            self.entries.push(KeyValue::new(key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|kv| kv.key.as_str() == key).map(|kv| &kv.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyValue> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hands the collected attributes over to the span/metric recorder.
    pub fn into_key_values(self) -> Vec<KeyValue> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_write_wins() {
        let mut sink = AttributeSink::new();
        sink.set("http.route", "/users/{id}");
        sink.set("http.route", "/shadowed");
        assert_eq!(sink.get("http.route"), Some(&Value::from("/users/{id}")));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn replace_overwrites_in_place() {
        let mut sink = AttributeSink::new();
        sink.set("url.path", "/users/42");
        sink.set("http.route", "/");
        sink.replace("http.route", "/users/{id}");
        assert_eq!(sink.get("http.route"), Some(&Value::from("/users/{id}")));

        let keys: Vec<_> = sink.iter().map(|kv| kv.key.as_str()).collect();
        assert_eq!(keys, vec!["url.path", "http.route"]);
    }

    #[test]
    fn set_opt_skips_none() {
        let mut sink = AttributeSink::new();
        sink.set_opt("url.query", None::<String>);
        assert!(sink.is_empty());
        sink.set_opt("url.query", Some("q=1"));
        assert_eq!(sink.get("url.query"), Some(&Value::from("q=1")));
    }
}
