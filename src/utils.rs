use std::cmp::Ordering;

use crate::types::{Resource, ResourceResponse, ResourceTableRow};

/// Joins path segments onto a base url with single slashes and no trailing slash.
///
/// ```text
/// join_url("https://api.music.apple.com/v1/", &["catalog", "us", "albums", "123"])
///   == "https://api.music.apple.com/v1/catalog/us/albums/123"
/// ```
pub fn join_url<S: AsRef<str>>(base: &str, segments: &[S]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for segment in segments {
        let segment = segment.as_ref().trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        url.push('/');
        url.push_str(segment);
    }
    url
}

/// Parses a `key=value` command line argument into a query parameter.
pub fn parse_query_param(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("invalid parameter `{}`, expected key=value", s)),
    }
}

/// Flattens every resource of a response (including search result groups) into table rows.
pub fn resource_rows(response: &ResourceResponse) -> Vec<ResourceTableRow> {
    let mut resources: Vec<Resource> = response.data.clone();

    // search responses nest their data in results.<type>.data
    if let Some(results) = response.results.as_ref().and_then(|r| r.as_object()) {
        for group in results.values() {
            if let Some(data) = group.get("data") {
                if let Ok(mut found) = serde_json::from_value::<Vec<Resource>>(data.clone()) {
                    resources.append(&mut found);
                }
            }
        }
    }

    let mut rows: Vec<ResourceTableRow> = resources
        .iter()
        .map(|r| ResourceTableRow {
            id: r.id.clone().unwrap_or_default(),
            kind: r.kind.clone().unwrap_or_default(),
            name: r.name().unwrap_or_default().to_string(),
        })
        .collect();

    sort_resource_rows(&mut rows);
    rows
}

pub fn sort_resource_rows(rows: &mut [ResourceTableRow]) {
    rows.sort_by(|a, b| match a.kind.cmp(&b.kind) {
        Ordering::Equal => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        other => other,
    });
}
