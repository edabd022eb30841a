use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use chrono::{DateTime, SecondsFormat, Utc};
use events_queries::SearchEventsQuery;
use sha2::{Digest, Sha256};

const DATE_PARAMS: [&str; 2] = ["start_date", "end_date"];
/// Matched case-insensitively by the store, so case is folded.
const FREE_TEXT_PARAM: &str = "query";

/// Order-independent SHA-256 digest of a normalized search request.
///
/// Identical across processes, which matters because result sets live in
/// the shared tier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchFingerprint(String);

impl SearchFingerprint {
    pub fn from_query(query: &SearchEventsQuery) -> Self {
        Self::from_params(query.as_params())
    }

    /// Parameter names are trimmed and lowercased, blank values dropped.
    /// Unknown parameters are kept and still distinguish requests.
    pub fn from_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut canonical: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (name, value) in params {
            let name = name.as_ref().trim().to_lowercase();
            if name.is_empty() {
                continue;
            }
            if let Some(value) = normalize_value(&name, value.as_ref()) {
                canonical.entry(name).or_default().insert(value);
            }
        }

        let encoded = canonical
            .iter()
            .flat_map(|(name, values)| {
                values.iter().map(move |v| format!("{}={}", escape(name), escape(v)))
            })
            .collect::<Vec<_>>()
            .join("&");

        Self(hex::encode(Sha256::digest(encoded.as_bytes())))
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

fn normalize_value(name: &str, value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if name == FREE_TEXT_PARAM {
        return Some(value.to_lowercase());
    }
    if DATE_PARAMS.contains(&name) {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
            return Some(
                parsed
                    .with_timezone(&Utc)
                    .to_rfc3339_opts(SecondsFormat::AutoSi, true),
            );
        }
    }
    Some(value.to_owned())
}

fn escape(raw: &str) -> String {
    raw.replace('%', "%25").replace('&', "%26").replace('=', "%3D")
}

impl fmt::Display for SearchFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
