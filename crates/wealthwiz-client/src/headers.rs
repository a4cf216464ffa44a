//! Outgoing header construction
//!
//! Callers may pass headers as a `HeaderMap`, a list of pairs, or a plain
//! name → value map. All three are normalized into one case-insensitive
//! `HeaderMap` on top of the JSON content-type default. `Authorization` is
//! owned by the pipeline: it is derived from the held access token and any
//! caller-supplied value is dropped.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tracing::warn;

/// Caller-supplied headers in any of the accepted shapes.
#[derive(Debug, Clone, Default)]
pub enum HeaderInput {
    #[default]
    None,
    Map(HeaderMap),
    Pairs(Vec<(String, String)>),
    Plain(BTreeMap<String, String>),
}

impl From<HeaderMap> for HeaderInput {
    fn from(map: HeaderMap) -> Self {
        HeaderInput::Map(map)
    }
}

impl From<Vec<(String, String)>> for HeaderInput {
    fn from(pairs: Vec<(String, String)>) -> Self {
        HeaderInput::Pairs(pairs)
    }
}

impl From<Vec<(&str, &str)>> for HeaderInput {
    fn from(pairs: Vec<(&str, &str)>) -> Self {
        HeaderInput::Pairs(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, String>> for HeaderInput {
    fn from(map: BTreeMap<String, String>) -> Self {
        HeaderInput::Plain(map)
    }
}

impl From<HashMap<String, String>> for HeaderInput {
    fn from(map: HashMap<String, String>) -> Self {
        HeaderInput::Plain(map.into_iter().collect())
    }
}

/// Build the header set for one outgoing request.
///
/// Order of precedence, lowest first: `Content-Type: application/json`,
/// caller headers, `Authorization: Bearer <access_token>`.
pub fn build_headers(input: &HeaderInput, access_token: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    match input {
        HeaderInput::None => {}
        HeaderInput::Map(map) => {
            // Replace defaults for every name present, keep multi-valued entries
            for name in map.keys() {
                headers.remove(name);
            }
            for (name, value) in map {
                if *name == AUTHORIZATION {
                    warn!("dropping caller-supplied authorization header");
                    continue;
                }
                headers.append(name.clone(), value.clone());
            }
        }
        HeaderInput::Pairs(pairs) => {
            for (name, value) in pairs {
                insert_str(&mut headers, name, value);
            }
        }
        HeaderInput::Plain(map) => {
            for (name, value) in map {
                insert_str(&mut headers, name, value);
            }
        }
    }

    if let Some(token) = access_token {
        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            Err(e) => warn!(error = %e, "held access token is not a valid header value"),
        }
    }

    headers
}

/// Insert a string pair, skipping invalid names/values and Authorization.
fn insert_str(headers: &mut HeaderMap, name: &str, value: &str) {
    let name = match HeaderName::from_str(name) {
        Ok(n) => n,
        Err(e) => {
            warn!(header = %name, error = %e, "skipping invalid header name");
            return;
        }
    };
    if name == AUTHORIZATION {
        warn!("dropping caller-supplied authorization header");
        return;
    }
    let value = match HeaderValue::from_str(value) {
        Ok(v) => v,
        Err(e) => {
            warn!(header = %name, error = %e, "skipping invalid header value");
            return;
        }
    };
    headers.insert(name, value);
}
