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

//! Parsing of the `Forwarded` (RFC 7239) and legacy `X-Forwarded-*` headers.
//!
//! Only the first proxy hop is authoritative, so extraction stops at the
//! first matching token. Malformed input never fails; it yields `None` and
//! the caller falls through to the next source.

/// Extracts the `proto` value from a `Forwarded` header value.
pub fn proto_from_forwarded(forwarded: &str) -> Option<&str> {
    let start = find_token(forwarded, b"proto=")?;
    extract_proto(forwarded, start)
}

/// Extracts the scheme from an `X-Forwarded-Proto` header value.
pub fn proto_from_forwarded_proto(forwarded_proto: &str) -> Option<&str> {
    extract_proto(forwarded_proto, 0)
}

/// Extracts the client IP from the `for` value of a `Forwarded` header value.
pub fn client_ip_from_forwarded(forwarded: &str) -> Option<&str> {
    let start = find_token(forwarded, b"for=")?;
    extract_ip_address(forwarded, start)
}

/// Extracts the original client IP (the first list entry) from an
/// `X-Forwarded-For` header value.
pub fn client_ip_from_forwarded_for(forwarded_for: &str) -> Option<&str> {
    extract_ip_address(forwarded_for, 0)
}

/// Byte offset just past the first case-insensitive occurrence of `token`.
fn find_token(header: &str, token: &[u8]) -> Option<usize> {
    header.as_bytes().windows(token.len()).position(|w| w.eq_ignore_ascii_case(token)).map(|pos| pos + token.len())
}

fn extract_proto(header: &str, start: usize) -> Option<&str> {
    let bytes = header.as_bytes();
    if start >= bytes.len() {
        return None;
    }
    if bytes[start] == b'"' {
        return extract_proto(header, start + 1);
    }
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if matches!(b, b',' | b';' | b'"') {
            return (i > start).then(|| &header[start..i]);
        }
    }
    Some(&header[start..])
}

// Per RFC 7239, IPv6 addresses in `Forwarded` are quoted and bracketed, while
// in `X-Forwarded-For` they appear bare. A `:port` suffix is only cut off when
// the address is recognizably IPv4 or bracketed, since a bare IPv6 address
// contains colons of its own.
fn extract_ip_address(header: &str, start: usize) -> Option<&str> {
    let bytes = header.as_bytes();
    if start >= bytes.len() {
        return None;
    }
    if bytes[start] == b'"' {
        return extract_ip_address(header, start + 1);
    }
    if bytes[start] == b'[' {
        let end = header[start + 1..].find(']')?;
        return (end > 0).then(|| &header[start + 1..start + 1 + end]);
    }
    let mut in_ipv4 = false;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        match b {
            b'.' => in_ipv4 = true,
            b',' | b';' | b'"' => return (i > start).then(|| &header[start..i]),
            b':' if in_ipv4 => return (i > start).then(|| &header[start..i]),
            _ => {},
        }
    }
    Some(&header[start..])
}
