//! `perPage` query-string handling
//!
//! Page size is the only grid state that survives a reload. It travels as a
//! `perPage=<n>` pair in a URL-style query string.

use tracing::warn;

use crate::GridError;

/// Query parameter carrying the page size
pub const PER_PAGE_PARAM: &str = "perPage";

/// Read `perPage` from a query string (with or without a leading `?`).
///
/// Returns `Ok(None)` when the parameter is absent and an error when it is
/// present but not a positive integer.
pub fn parse_per_page(query: &str) -> Result<Option<usize>, GridError> {
    let query = query.trim_start_matches('?');

    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key != PER_PAGE_PARAM {
            continue;
        }
        return match value.trim().parse::<usize>() {
            Ok(size) if size > 0 => Ok(Some(size)),
            _ => Err(GridError::InvalidQueryValue {
                param: PER_PAGE_PARAM.to_string(),
                value: value.to_string(),
            }),
        };
    }

    Ok(None)
}

/// Rewrite `query` with `perPage` set to `size`, keeping other pairs in order
pub fn with_per_page(query: &str, size: usize) -> String {
    let query = query.trim_start_matches('?');
    let mut pairs: Vec<String> = Vec::new();
    let mut replaced = false;

    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let key = pair.split_once('=').map_or(pair, |(key, _)| key);
        if key == PER_PAGE_PARAM {
            if !replaced {
                pairs.push(format!("{PER_PAGE_PARAM}={size}"));
                replaced = true;
            }
        } else {
            pairs.push(pair.to_string());
        }
    }

    if !replaced {
        pairs.push(format!("{PER_PAGE_PARAM}={size}"));
    }

    pairs.join("&")
}

/// Page size to start with: the query's `perPage`, else `default`.
/// Invalid values are logged and ignored.
pub fn initial_page_size(query: Option<&str>, default: usize) -> usize {
    match query.map(parse_per_page) {
        Some(Ok(Some(size))) => size,
        Some(Err(e)) => {
            warn!("Ignoring page size from query: {}", e);
            default
        }
        _ => default,
    }
}
