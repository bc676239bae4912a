use clap::ValueEnum;
use reqwest::Method;
use serde_json::{Value, json};

use crate::{
    error::{Error, Result},
    types::ResourceType,
};

/// Method and path templates of one endpoint, relative to the API root.
///
/// A `None` template means the endpoint does not exist for that resource class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub method: Method,
    pub catalog: Option<&'static str>,
    pub library: Option<&'static str>,
}

impl Route {
    fn new(
        name: &'static str,
        method: Method,
        catalog: Option<&'static str>,
        library: Option<&'static str>,
    ) -> Self {
        Route {
            name,
            method,
            catalog,
            library,
        }
    }

    fn both(name: &'static str, catalog: &'static str, library: &'static str) -> Self {
        Self::new(name, Method::GET, Some(catalog), Some(library))
    }

    fn catalog(name: &'static str, catalog: &'static str) -> Self {
        Self::new(name, Method::GET, Some(catalog), None)
    }

    fn library(name: &'static str, method: Method, library: &'static str) -> Self {
        Self::new(name, method, None, Some(library))
    }

    pub fn template(&self, resource: ResourceType) -> Option<&'static str> {
        match resource {
            ResourceType::Catalog => self.catalog,
            ResourceType::Library => self.library,
        }
    }
}

/// Every endpoint the client knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Endpoint {
    Album,
    AlbumRelationship,
    AlbumView,
    Albums,
    AddToLibrary,
    Artist,
    Artists,
    ArtistRelationship,
    ArtistView,
    Song,
    Songs,
    SongRelationship,
    MusicVideo,
    MusicVideos,
    MusicVideoRelationship,
    Playlist,
    Playlists,
    PlaylistRelationship,
    CreatePlaylist,
    AddPlaylistTracks,
    Station,
    Stations,
    Genre,
    Genres,
    Curator,
    Activity,
    RecordLabel,
    Storefront,
    Storefronts,
    Search,
    SearchHints,
    LibrarySearch,
    Charts,
    Recommendations,
    RecentlyPlayed,
    RecentlyAdded,
    HeavyRotation,
    Rating,
    SetRating,
    DeleteRating,
}

impl Endpoint {
    pub fn route(self) -> Route {
        match self {
            Endpoint::Album => Route::both(
                "album",
                "catalog/{storefront}/albums/{id}",
                "me/library/albums/{id}",
            ),
            Endpoint::AlbumRelationship => Route::both(
                "album-relationship",
                "catalog/{storefront}/albums/{id}/{relationship}",
                "me/library/albums/{id}/{relationship}",
            ),
            Endpoint::AlbumView => Route::catalog(
                "album-view",
                "catalog/{storefront}/albums/{id}/view/{view}",
            ),
            Endpoint::Albums => {
                Route::both("albums", "catalog/{storefront}/albums", "me/library/albums")
            }
            Endpoint::AddToLibrary => Route::library("add-to-library", Method::POST, "me/library"),
            Endpoint::Artist => Route::both(
                "artist",
                "catalog/{storefront}/artists/{id}",
                "me/library/artists/{id}",
            ),
            Endpoint::Artists => Route::both(
                "artists",
                "catalog/{storefront}/artists",
                "me/library/artists",
            ),
            Endpoint::ArtistRelationship => Route::both(
                "artist-relationship",
                "catalog/{storefront}/artists/{id}/{relationship}",
                "me/library/artists/{id}/{relationship}",
            ),
            Endpoint::ArtistView => Route::catalog(
                "artist-view",
                "catalog/{storefront}/artists/{id}/view/{view}",
            ),
            Endpoint::Song => Route::both(
                "song",
                "catalog/{storefront}/songs/{id}",
                "me/library/songs/{id}",
            ),
            Endpoint::Songs => {
                Route::both("songs", "catalog/{storefront}/songs", "me/library/songs")
            }
            Endpoint::SongRelationship => Route::both(
                "song-relationship",
                "catalog/{storefront}/songs/{id}/{relationship}",
                "me/library/songs/{id}/{relationship}",
            ),
            Endpoint::MusicVideo => Route::both(
                "music-video",
                "catalog/{storefront}/music-videos/{id}",
                "me/library/music-videos/{id}",
            ),
            Endpoint::MusicVideos => Route::both(
                "music-videos",
                "catalog/{storefront}/music-videos",
                "me/library/music-videos",
            ),
            Endpoint::MusicVideoRelationship => Route::both(
                "music-video-relationship",
                "catalog/{storefront}/music-videos/{id}/{relationship}",
                "me/library/music-videos/{id}/{relationship}",
            ),
            Endpoint::Playlist => Route::both(
                "playlist",
                "catalog/{storefront}/playlists/{id}",
                "me/library/playlists/{id}",
            ),
            Endpoint::Playlists => Route::both(
                "playlists",
                "catalog/{storefront}/playlists",
                "me/library/playlists",
            ),
            Endpoint::PlaylistRelationship => Route::both(
                "playlist-relationship",
                "catalog/{storefront}/playlists/{id}/{relationship}",
                "me/library/playlists/{id}/{relationship}",
            ),
            Endpoint::CreatePlaylist => {
                Route::library("create-playlist", Method::POST, "me/library/playlists")
            }
            Endpoint::AddPlaylistTracks => Route::library(
                "add-playlist-tracks",
                Method::POST,
                "me/library/playlists/{id}/tracks",
            ),
            Endpoint::Station => Route::catalog("station", "catalog/{storefront}/stations/{id}"),
            Endpoint::Stations => Route::catalog("stations", "catalog/{storefront}/stations"),
            Endpoint::Genre => Route::catalog("genre", "catalog/{storefront}/genres/{id}"),
            Endpoint::Genres => Route::catalog("genres", "catalog/{storefront}/genres"),
            Endpoint::Curator => Route::catalog("curator", "catalog/{storefront}/curators/{id}"),
            Endpoint::Activity => {
                Route::catalog("activity", "catalog/{storefront}/activities/{id}")
            }
            Endpoint::RecordLabel => Route::catalog(
                "record-label",
                "catalog/{storefront}/record-labels/{id}",
            ),
            Endpoint::Storefront => Route::catalog("storefront", "storefronts/{id}"),
            Endpoint::Storefronts => Route::catalog("storefronts", "storefronts"),
            Endpoint::Search => Route::catalog("search", "catalog/{storefront}/search"),
            Endpoint::SearchHints => {
                Route::catalog("search-hints", "catalog/{storefront}/search/hints")
            }
            Endpoint::LibrarySearch => {
                Route::library("library-search", Method::GET, "me/library/search")
            }
            Endpoint::Charts => Route::catalog("charts", "catalog/{storefront}/charts"),
            Endpoint::Recommendations => {
                Route::library("recommendations", Method::GET, "me/recommendations")
            }
            Endpoint::RecentlyPlayed => {
                Route::library("recently-played", Method::GET, "me/recent/played")
            }
            Endpoint::RecentlyAdded => {
                Route::library("recently-added", Method::GET, "me/library/recently-added")
            }
            Endpoint::HeavyRotation => {
                Route::library("heavy-rotation", Method::GET, "me/history/heavy-rotation")
            }
            Endpoint::Rating => Route::library("rating", Method::GET, "me/ratings/{kind}/{id}"),
            Endpoint::SetRating => {
                Route::library("set-rating", Method::PUT, "me/ratings/{kind}/{id}")
            }
            Endpoint::DeleteRating => {
                Route::library("delete-rating", Method::DELETE, "me/ratings/{kind}/{id}")
            }
        }
    }

    pub fn name(self) -> &'static str {
        self.route().name
    }

    /// Catalog when the endpoint has a catalog route, library otherwise.
    pub fn default_resource(self) -> ResourceType {
        if self.route().catalog.is_some() {
            ResourceType::Catalog
        } else {
            ResourceType::Library
        }
    }

    /// Renders the path of this endpoint for `resource`.
    ///
    /// # Errors
    ///
    /// - [`Error::ResourceType`] when there is no route for `resource`
    /// - [`Error::MissingPathArgument`] when `args` lacks a placeholder value
    pub fn path(self, resource: ResourceType, args: &PathArgs) -> Result<String> {
        let route = self.route();
        let template = route.template(resource).ok_or(Error::ResourceType {
            endpoint: route.name,
            resource,
        })?;
        render_template(route.name, template, args)
    }
}

/// Values for the `{placeholder}` segments of a path template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathArgs {
    pub storefront: Option<String>,
    pub id: Option<String>,
    pub relationship: Option<String>,
    pub view: Option<String>,
    pub kind: Option<String>,
}

impl PathArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn storefront(mut self, storefront: impl Into<String>) -> Self {
        self.storefront = Some(storefront.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn relationship(mut self, relationship: impl Into<String>) -> Self {
        self.relationship = Some(relationship.into());
        self
    }

    pub fn view(mut self, view: impl Into<String>) -> Self {
        self.view = Some(view.into());
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Fills the storefront only when none was given.
    pub fn or_storefront(mut self, storefront: &str) -> Self {
        if self.storefront.is_none() {
            self.storefront = Some(storefront.to_string());
        }
        self
    }

    fn get(&self, name: &str) -> Option<&str> {
        let value = match name {
            "storefront" => self.storefront.as_deref(),
            "id" => self.id.as_deref(),
            "relationship" => self.relationship.as_deref(),
            "view" => self.view.as_deref(),
            "kind" => self.kind.as_deref(),
            _ => None,
        };
        value.map(|v| v.trim_matches('/')).filter(|v| !v.is_empty())
    }
}

fn render_template(endpoint: &'static str, template: &str, args: &PathArgs) -> Result<String> {
    let mut path = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        path.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find('}').ok_or_else(|| Error::MissingPathArgument {
            endpoint,
            argument: after.to_string(),
        })?;
        let name = &after[..end];
        let value = args.get(name).ok_or_else(|| Error::MissingPathArgument {
            endpoint,
            argument: name.to_string(),
        })?;
        path.push_str(value);
        rest = &after[end + 1..];
    }
    path.push_str(rest);

    Ok(path)
}

/// Request body for [`Endpoint::SetRating`]: `1` likes, `-1` dislikes.
pub fn rating_body(value: i8) -> Value {
    json!({
        "type": "rating",
        "attributes": { "value": value }
    })
}
