use amkit::types::{ResourceResponse, ResourceTableRow};
use amkit::utils::*;
use serde_json::json;

// Helper function to create a test table row
fn create_test_row(id: &str, kind: &str, name: &str) -> ResourceTableRow {
    ResourceTableRow {
        id: id.to_string(),
        kind: kind.to_string(),
        name: name.to_string(),
    }
}

#[test]
fn test_join_url_catalog_album() {
    let url = join_url(
        "https://api.music.apple.com/v1/",
        &["catalog", "us", "albums", "123"],
    );
    assert_eq!(url, "https://api.music.apple.com/v1/catalog/us/albums/123");
}

#[test]
fn test_join_url_normalizes_slashes() {
    // Leading, trailing and doubled slashes collapse into single separators
    let url = join_url("https://api.music.apple.com/v1", &["/catalog/", "//us/", "albums/"]);
    assert_eq!(url, "https://api.music.apple.com/v1/catalog/us/albums");

    // Multi segment paths are kept as they are
    let url = join_url("https://api.music.apple.com/v1/", &["me/library/albums"]);
    assert_eq!(url, "https://api.music.apple.com/v1/me/library/albums");
}

#[test]
fn test_join_url_skips_empty_segments() {
    let url = join_url("http://127.0.0.1:9000/", &["", "catalog", "/", "us"]);
    assert_eq!(url, "http://127.0.0.1:9000/catalog/us");

    let no_segments: [&str; 0] = [];
    assert_eq!(join_url("http://127.0.0.1:9000/", &no_segments), "http://127.0.0.1:9000");
}

#[test]
fn test_parse_query_param() {
    assert_eq!(
        parse_query_param("limit=5"),
        Ok(("limit".to_string(), "5".to_string()))
    );

    // Only the first '=' separates key and value
    assert_eq!(
        parse_query_param("filter[isrc]=a=b"),
        Ok(("filter[isrc]".to_string(), "a=b".to_string()))
    );

    // Empty values are allowed
    assert_eq!(
        parse_query_param("include="),
        Ok(("include".to_string(), String::new()))
    );
}

#[test]
fn test_parse_query_param_invalid() {
    assert!(parse_query_param("limit").is_err());
    assert!(parse_query_param("=5").is_err());
    assert!(parse_query_param("").is_err());
}

#[test]
fn test_resource_rows_from_data() {
    let response: ResourceResponse = serde_json::from_value(json!({
        "data": [
            { "id": "2", "type": "albums", "attributes": { "name": "zebra" } },
            { "id": "1", "type": "albums", "attributes": { "name": "Alpha" } },
            { "id": "3", "type": "artists", "attributes": { "name": "Beta" } }
        ]
    }))
    .unwrap();

    let rows = resource_rows(&response);

    assert_eq!(
        rows,
        vec![
            create_test_row("1", "albums", "Alpha"),
            create_test_row("2", "albums", "zebra"),
            create_test_row("3", "artists", "Beta"),
        ]
    );
}

#[test]
fn test_resource_rows_from_search_results() {
    let response: ResourceResponse = serde_json::from_value(json!({
        "results": {
            "songs": {
                "href": "/v1/catalog/us/search?term=x&types=songs",
                "data": [{ "id": "s1", "type": "songs", "attributes": { "name": "Song" } }]
            },
            "albums": {
                "data": [{ "id": "a1", "type": "albums", "attributes": { "name": "Album" } }]
            }
        }
    }))
    .unwrap();

    let rows = resource_rows(&response);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], create_test_row("a1", "albums", "Album"));
    assert_eq!(rows[1], create_test_row("s1", "songs", "Song"));
}

#[test]
fn test_resource_rows_without_attributes() {
    let response: ResourceResponse = serde_json::from_value(json!({
        "data": [{ "id": "pl.1", "type": "playlists" }]
    }))
    .unwrap();

    let rows = resource_rows(&response);
    assert_eq!(rows, vec![create_test_row("pl.1", "playlists", "")]);
}

#[test]
fn test_sort_resource_rows_case_insensitive() {
    let mut rows = vec![
        create_test_row("1", "songs", "beta"),
        create_test_row("2", "songs", "Alpha"),
        create_test_row("3", "albums", "Gamma"),
    ];

    sort_resource_rows(&mut rows);

    assert_eq!(rows[0].id, "3");
    assert_eq!(rows[1].id, "2");
    assert_eq!(rows[2].id, "1");
}
