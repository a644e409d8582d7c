//! Multi-valued query-string parameters with strict parsing and canonical encoding.
//!
//! Names and values are kept as the decoded bytes, so escapes that are not
//! UTF-8 (`%FF`) encode back to exactly what the caller wrote.

use std::borrow::Cow;
use std::collections::BTreeMap;

use url::form_urlencoded::byte_serialize;
use url::Url;

use super::error::QueryUrlError;

/// Query-string parameters: name to ordered values, names kept sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<Vec<u8>, Vec<Vec<u8>>>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a query string (without the leading `?`).
    ///
    /// Empty pieces are skipped and a piece without `=` gets the empty value.
    /// Fails on a `;` inside a piece or a `%` that is not followed by two hex
    /// digits. `+` decodes to a space.
    pub fn parse(raw: &str) -> Result<Self, QueryUrlError> {
        let mut params = Self::new();
        for piece in pieces(raw) {
            if piece.contains(';') {
                return Err(QueryUrlError::params(
                    raw,
                    format!("invalid semicolon separator in {piece:?}"),
                ));
            }
            let (key, value) =
                decode_piece(piece).map_err(|reason| QueryUrlError::params(raw, reason))?;
            params.add(key, value);
        }
        Ok(params)
    }

    /// Reads the parameters already present on `url`. Never fails: pieces
    /// containing `;` or a malformed escape are dropped.
    pub fn from_url(url: &Url) -> Self {
        let mut params = Self::new();
        for piece in pieces(url.query().unwrap_or_default()) {
            if piece.contains(';') {
                tracing::debug!(piece, "dropping base url query piece with ';'");
                continue;
            }
            match decode_piece(piece) {
                Ok((key, value)) => params.add(key, value),
                Err(reason) => tracing::debug!(piece, %reason, "dropping base url query piece"),
            }
        }
        params
    }

    /// Appends `value` after any existing values for `key`.
    pub fn add(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    /// Replaces all values for `key` with `value`.
    pub fn set(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.0.insert(key.into(), vec![value.into()]);
    }

    /// Appends every value of `other`, keeping per-key order.
    pub fn merge(&mut self, other: QueryParams) {
        for (key, values) in other.0 {
            self.0.entry(key).or_default().extend(values);
        }
    }

    /// First value for `key`, if it is UTF-8.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_bytes(key)
            .and_then(|v| std::str::from_utf8(v).ok())
    }

    /// First value for `key` as raw bytes.
    pub fn get_bytes(&self, key: &str) -> Option<&[u8]> {
        self.0
            .get(key.as_bytes())
            .and_then(|v| v.first())
            .map(Vec::as_slice)
    }

    /// All values for `key`; bytes that are not UTF-8 show as U+FFFD.
    pub fn get_all(&self, key: &str) -> Vec<Cow<'_, str>> {
        self.0
            .get(key.as_bytes())
            .map(|vs| vs.iter().map(|v| String::from_utf8_lossy(v)).collect())
            .unwrap_or_default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `(name, value)` pairs in encoding order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.0
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_slice(), v.as_slice())))
    }

    /// Canonical encoding: names sorted, values in insertion order, both
    /// form-urlencoded.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for (key, value) in self.iter() {
            if !out.is_empty() {
                out.push('&');
            }
            out.extend(byte_serialize(key));
            out.push('=');
            out.extend(byte_serialize(value));
        }
        out
    }
}

fn pieces(raw: &str) -> impl Iterator<Item = &str> {
    raw.split('&').filter(|piece| !piece.is_empty())
}

/// Splits a piece at the first `=` and decodes both halves.
fn decode_piece(piece: &str) -> Result<(Vec<u8>, Vec<u8>), String> {
    let (key, value) = piece.split_once('=').unwrap_or((piece, ""));
    Ok((decode_component(key)?, decode_component(value)?))
}

/// `+` to space and `%XX` to its byte; a `%` not followed by two hex digits is an error.
fn decode_component(raw: &str) -> Result<Vec<u8>, String> {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => {
                let hi = bytes.get(i + 1).and_then(|b| hex_value(*b));
                let lo = bytes.get(i + 2).and_then(|b| hex_value(*b));
                match (hi, lo) {
                    (Some(hi), Some(lo)) => out.push(hi << 4 | lo),
                    _ => {
                        let end = (i + 3).min(bytes.len());
                        return Err(format!(
                            "invalid URL escape {:?}",
                            String::from_utf8_lossy(&bytes[i..end])
                        ));
                    }
                }
                i += 3;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    Ok(out)
}

fn hex_value(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}
