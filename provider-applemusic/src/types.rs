//! Wire types for Apple Music catalog responses

use serde::Deserialize;

use core_catalog::{
    ArtworkRef, CatalogItem, CollectionSummary, ItemId, PersonSummary, TrackSummary,
};

/// Top-level search response: `results` holds one page per requested type.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub results: SearchResults,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchResults {
    pub songs: Option<ResourcePage<SongAttributes>>,
    pub artists: Option<ResourcePage<ArtistAttributes>>,
    pub albums: Option<ResourcePage<AlbumAttributes>>,
}

/// One page of resources of a single type.
#[derive(Debug, Deserialize)]
pub(crate) struct ResourcePage<T> {
    #[serde(default)]
    pub data: Vec<Resource<T>>,
}

/// Lookup responses carry the resources directly under `data`.
#[derive(Debug, Deserialize)]
pub(crate) struct LookupResponse<T> {
    #[serde(default)]
    pub data: Vec<Resource<T>>,
}

/// Resource envelope; `attributes` can be absent for restricted content.
#[derive(Debug, Deserialize)]
pub(crate) struct Resource<T> {
    pub id: String,
    pub attributes: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SongAttributes {
    pub name: String,
    #[serde(default)]
    pub artist_name: String,
    pub artwork: Option<ArtworkPayload>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ArtistAttributes {
    pub name: String,
    pub artwork: Option<ArtworkPayload>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AlbumAttributes {
    pub name: String,
    #[serde(default)]
    pub artist_name: String,
    pub artwork: Option<ArtworkPayload>,
}

/// Artwork template; `url` contains `{w}`/`{h}` placeholders.
#[derive(Debug, Deserialize)]
pub(crate) struct ArtworkPayload {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ArtworkPayload {
    fn into_ref(self) -> ArtworkRef {
        let mut artwork = ArtworkRef::new(self.url);
        if let (Some(width), Some(height)) = (self.width, self.height) {
            artwork = artwork.with_dimensions(width, height);
        }
        artwork
    }
}

impl Resource<SongAttributes> {
    /// Convert to the core item model; resources without attributes are
    /// unusable and dropped.
    pub(crate) fn into_item(self) -> Option<CatalogItem> {
        let attributes = self.attributes?;
        Some(CatalogItem::Track(TrackSummary {
            id: ItemId::new(self.id),
            title: attributes.name,
            artist_name: attributes.artist_name,
            artwork: attributes.artwork.map(ArtworkPayload::into_ref),
        }))
    }
}

impl Resource<ArtistAttributes> {
    pub(crate) fn into_item(self) -> Option<CatalogItem> {
        let attributes = self.attributes?;
        Some(CatalogItem::Person(PersonSummary {
            id: ItemId::new(self.id),
            name: attributes.name,
            artwork: attributes.artwork.map(ArtworkPayload::into_ref),
        }))
    }
}

impl Resource<AlbumAttributes> {
    pub(crate) fn into_item(self) -> Option<CatalogItem> {
        let attributes = self.attributes?;
        Some(CatalogItem::Collection(CollectionSummary {
            id: ItemId::new(self.id),
            title: attributes.name,
            artist_name: attributes.artist_name,
            artwork: attributes.artwork.map(ArtworkPayload::into_ref),
        }))
    }
}
