use amkit::{Endpoint, Error, PathArgs, ResourceType, applemusic::endpoints::rating_body};
use clap::ValueEnum;
use reqwest::Method;

#[test]
fn test_catalog_album_path() {
    let args = PathArgs::new().storefront("us").id("123");
    let path = Endpoint::Album.path(ResourceType::Catalog, &args).unwrap();
    assert_eq!(path, "catalog/us/albums/123");
}

#[test]
fn test_library_album_path_ignores_storefront() {
    let args = PathArgs::new().storefront("us").id("l.abc");
    let path = Endpoint::Album.path(ResourceType::Library, &args).unwrap();
    assert_eq!(path, "me/library/albums/l.abc");
}

#[test]
fn test_relationship_and_view_paths() {
    let args = PathArgs::new()
        .storefront("gb")
        .id("42")
        .relationship("tracks")
        .view("related-albums");

    assert_eq!(
        Endpoint::AlbumRelationship
            .path(ResourceType::Catalog, &args)
            .unwrap(),
        "catalog/gb/albums/42/tracks"
    );
    assert_eq!(
        Endpoint::AlbumView.path(ResourceType::Catalog, &args).unwrap(),
        "catalog/gb/albums/42/view/related-albums"
    );
}

#[test]
fn test_rating_path() {
    let args = PathArgs::new().kind("songs").id("900");
    assert_eq!(
        Endpoint::SetRating.path(ResourceType::Library, &args).unwrap(),
        "me/ratings/songs/900"
    );
    assert_eq!(Endpoint::SetRating.route().method, Method::PUT);
    assert_eq!(Endpoint::DeleteRating.route().method, Method::DELETE);
}

#[test]
fn test_unsupported_resource_type() {
    let args = PathArgs::new().storefront("us");

    // catalog-only endpoint asked for library
    let err = Endpoint::Charts.path(ResourceType::Library, &args).unwrap_err();
    assert!(matches!(
        err,
        Error::ResourceType {
            endpoint: "charts",
            resource: ResourceType::Library
        }
    ));

    // library-only endpoint asked for catalog
    let err = Endpoint::RecentlyPlayed
        .path(ResourceType::Catalog, &args)
        .unwrap_err();
    assert!(matches!(err, Error::ResourceType { .. }));
}

#[test]
fn test_missing_path_argument() {
    let err = Endpoint::Album
        .path(ResourceType::Catalog, &PathArgs::new().storefront("us"))
        .unwrap_err();

    match err {
        Error::MissingPathArgument { endpoint, argument } => {
            assert_eq!(endpoint, "album");
            assert_eq!(argument, "id");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_empty_argument_counts_as_missing() {
    let args = PathArgs::new().storefront("us").id("/");
    let err = Endpoint::Album.path(ResourceType::Catalog, &args).unwrap_err();
    assert!(matches!(err, Error::MissingPathArgument { .. }));
}

#[test]
fn test_or_storefront_keeps_explicit_value() {
    let args = PathArgs::new().storefront("jp").or_storefront("us");
    assert_eq!(args.storefront.as_deref(), Some("jp"));

    let args = PathArgs::new().or_storefront("us");
    assert_eq!(args.storefront.as_deref(), Some("us"));
}

#[test]
fn test_default_resource() {
    assert_eq!(Endpoint::Album.default_resource(), ResourceType::Catalog);
    assert_eq!(Endpoint::Search.default_resource(), ResourceType::Catalog);
    assert_eq!(
        Endpoint::RecentlyPlayed.default_resource(),
        ResourceType::Library
    );
    assert_eq!(
        Endpoint::CreatePlaylist.default_resource(),
        ResourceType::Library
    );
}

#[test]
fn test_every_endpoint_has_a_route() {
    let args = PathArgs::new()
        .storefront("us")
        .id("1")
        .relationship("tracks")
        .view("top-songs")
        .kind("songs");

    for endpoint in Endpoint::value_variants() {
        let route = endpoint.route();
        assert!(
            route.catalog.is_some() || route.library.is_some(),
            "{} has no route",
            route.name
        );

        // every declared template renders with a full argument set
        for resource in [ResourceType::Catalog, ResourceType::Library] {
            if route.template(resource).is_some() {
                let path = endpoint.path(resource, &args).unwrap();
                assert!(!path.contains('{'), "{} left a placeholder", route.name);
                assert!(!path.starts_with('/'));
            }
        }
    }
}

#[test]
fn test_endpoint_names_match_cli_values() {
    for endpoint in Endpoint::value_variants() {
        let value = endpoint.to_possible_value().unwrap();
        assert_eq!(value.get_name(), endpoint.name());
    }
}

#[test]
fn test_rating_body() {
    let body = rating_body(-1);
    assert_eq!(body["type"], "rating");
    assert_eq!(body["attributes"]["value"], -1);
}
