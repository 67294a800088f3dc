// crates/caresync-gateway/src/view.rs
// ============================================================================
// Module: View Query Parameters
// Description: Typed view query parameters and their query-string encoding.
// Purpose: Reproduce the store's view parameter grammar exactly.
// Dependencies: none
// ============================================================================

//! ## Overview
//! View parameters follow the store's grammar rather than ordinary form
//! encoding: a string `key` is force-quoted, key arrays are emitted as JSON
//! array literals, and an `endkey` array gets the `,{}` open-range suffix so
//! prefix scans include every compound key under the prefix. `endkey_exact`
//! is the escape hatch that sends an `endkey` without the suffix. `stale`
//! defaults to `false` so views index before answering.

// ============================================================================
// SECTION: View Keys
// ============================================================================

/// A view key: a bare string or a compound (array) key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewKey {
    /// Single scalar key, passed through verbatim.
    Single(String),
    /// Compound key emitted as a JSON array literal.
    Compound(Vec<String>),
}

impl ViewKey {
    /// Encodes the key as a query-string value.
    ///
    /// Compound keys become `["a","b"]`; with `open_ended` the terminator is
    /// `,{}]` so the range covers all longer keys sharing the prefix.
    #[must_use]
    fn encode(&self, open_ended: bool) -> String {
        match self {
            Self::Single(value) => value.clone(),
            Self::Compound(values) => stringify_string_array(values, open_ended),
        }
    }
}

/// Emits `["a","b"]`, or `["a","b",{}]` when `open_ended`.
fn stringify_string_array(values: &[String], open_ended: bool) -> String {
    let joined = values.join("\",\"");
    if open_ended {
        format!("[\"{joined}\",{{}}]")
    } else {
        format!("[\"{joined}\"]")
    }
}

// ============================================================================
// SECTION: Query Parameters
// ============================================================================

/// Parameters for a design-document view query.
///
/// # Invariants
/// - Absent fields are omitted from the query string entirely.
/// - `stale` is emitted as `false` when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    /// Exact key match; strings are force-quoted on the wire.
    pub key: Option<ViewKey>,
    /// Multi-key fetch; the split threshold halves this set.
    pub keys: Option<Vec<ViewKey>>,
    /// Inclusive range start.
    pub startkey: Option<ViewKey>,
    /// Range end, open-ended for compound keys.
    pub endkey: Option<ViewKey>,
    /// Range end sent verbatim, without the open-range suffix.
    pub endkey_exact: Option<ViewKey>,
    /// Staleness setting; defaults to `false`.
    pub stale: Option<String>,
    /// Maximum number of rows returned.
    pub limit: Option<u64>,
    /// Enables grouped reduction.
    pub group: Option<bool>,
    /// Grouping depth for compound keys.
    pub group_level: Option<u32>,
    /// Enables or disables the reduce function.
    pub reduce: Option<bool>,
    /// Whether the end of the range is included.
    pub inclusive_end: Option<bool>,
}

impl ViewQuery {
    /// Builds a query selecting the given scalar key.
    #[must_use]
    pub fn for_key(key: impl Into<String>) -> Self {
        Self {
            key: Some(ViewKey::Single(key.into())),
            ..Self::default()
        }
    }

    /// Builds a query fetching the given scalar keys.
    #[must_use]
    pub fn for_keys(keys: Vec<String>) -> Self {
        Self {
            keys: Some(keys.into_iter().map(ViewKey::Single).collect()),
            ..Self::default()
        }
    }

    /// Renders the parameters as an unencoded query string.
    #[must_use]
    pub(crate) fn to_query_string(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        parts.push(format!("stale={}", self.stale.as_deref().unwrap_or("false")));
        if let Some(key) = &self.key {
            parts.push(format!("key={}", encode_single_key(key)));
        }
        if let Some(keys) = &self.keys {
            parts.push(format!("keys={}", encode_key_list(keys)));
        }
        if let Some(startkey) = &self.startkey {
            parts.push(format!("startkey={}", startkey.encode(false)));
        }
        if let Some(endkey) = &self.endkey {
            parts.push(format!("endkey={}", endkey.encode(true)));
        }
        if let Some(endkey) = &self.endkey_exact {
            parts.push(format!("endkey={}", endkey.encode(false)));
        }
        if let Some(limit) = self.limit {
            parts.push(format!("limit={limit}"));
        }
        if let Some(group) = self.group {
            parts.push(format!("group={group}"));
        }
        if let Some(group_level) = self.group_level {
            parts.push(format!("group_level={group_level}"));
        }
        if let Some(reduce) = self.reduce {
            parts.push(format!("reduce={reduce}"));
        }
        if let Some(inclusive_end) = self.inclusive_end {
            parts.push(format!("inclusive_end={inclusive_end}"));
        }
        format!("?{}", parts.join("&"))
    }

    /// Number of entries in `keys`, zero when absent.
    #[must_use]
    pub(crate) fn keys_len(&self) -> usize {
        self.keys.as_ref().map_or(0, Vec::len)
    }

    /// Splits `keys` in half, returning the two half queries.
    ///
    /// # Invariants
    /// - Callers only split when `keys_len() >= 2`.
    #[must_use]
    pub(crate) fn split_keys(&self) -> (Self, Self) {
        let keys = self.keys.clone().unwrap_or_default();
        let mid = keys.len() / 2;
        let mut first = self.clone();
        let mut second = self.clone();
        first.keys = Some(keys[.. mid].to_vec());
        second.keys = Some(keys[mid ..].to_vec());
        (first, second)
    }
}

// ============================================================================
// SECTION: Encoding Helpers
// ============================================================================

/// Encodes the `key` parameter; bare strings are force-quoted.
fn encode_single_key(key: &ViewKey) -> String {
    match key {
        ViewKey::Single(value) => {
            let mut quoted = value.clone();
            if !quoted.starts_with('"') {
                quoted.insert(0, '"');
            }
            if quoted.len() < 2 || !quoted.ends_with('"') {
                quoted.push('"');
            }
            quoted
        }
        ViewKey::Compound(values) => stringify_string_array(values, false),
    }
}

/// Encodes the `keys` parameter.
///
/// Compound entries each render as an array literal inside an outer array;
/// scalar entries render together as one string-array literal.
fn encode_key_list(keys: &[ViewKey]) -> String {
    let compound = matches!(keys.first(), Some(ViewKey::Compound(_)));
    if compound {
        let rendered: Vec<String> = keys.iter().map(|key| key.encode(false)).collect();
        format!("[{}]", rendered.join(","))
    } else {
        let scalars: Vec<String> = keys
            .iter()
            .map(|key| match key {
                ViewKey::Single(value) => value.clone(),
                ViewKey::Compound(values) => values.join("\",\""),
            })
            .collect();
        stringify_string_array(&scalars, false)
    }
}

#[cfg(test)]
mod tests;
