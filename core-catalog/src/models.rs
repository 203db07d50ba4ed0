//! Domain models for catalog items
//!
//! The item model is a closed tagged union over the three catalog categories;
//! dispatch is exhaustive matching, never runtime type tests.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// ID and Kind Types
// =============================================================================

/// Catalog item category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// A playable track
    Track,
    /// A person (artist)
    Person,
    /// A collection (album)
    Collection,
}

impl ItemKind {
    /// All kinds, in display order
    pub const ALL: [ItemKind; 3] = [ItemKind::Track, ItemKind::Person, ItemKind::Collection];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Track => "track",
            ItemKind::Person => "person",
            ItemKind::Collection => "collection",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Catalog-assigned identifier for an item
///
/// This is the identity used for de-duplication; display fields never are.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// =============================================================================
// Artwork
// =============================================================================

/// Artwork reference with a size-parameterized URL template
///
/// The catalog hands out templates containing `{w}` and `{h}` placeholders;
/// [`ArtworkRef::url`] resolves them for a square pixel size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkRef {
    /// URL template containing `{w}` and `{h}` placeholders
    pub url_template: String,
    /// Intrinsic width in pixels, when the catalog reports it
    pub width: Option<u32>,
    /// Intrinsic height in pixels, when the catalog reports it
    pub height: Option<u32>,
}

impl ArtworkRef {
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            width: None,
            height: None,
        }
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Resolve the template for a square pixel size
    pub fn url(&self, size: u32) -> String {
        let size = size.to_string();
        self.url_template.replace("{w}", &size).replace("{h}", &size)
    }
}

// =============================================================================
// Item Variants
// =============================================================================

/// Display summary of a playable track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub id: ItemId,
    pub title: String,
    pub artist_name: String,
    pub artwork: Option<ArtworkRef>,
}

/// Display summary of a person (artist)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonSummary {
    pub id: ItemId,
    pub name: String,
    pub artwork: Option<ArtworkRef>,
}

/// Display summary of a collection (album)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub id: ItemId,
    pub title: String,
    pub artist_name: String,
    pub artwork: Option<ArtworkRef>,
}

/// A catalog item of any kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogItem {
    Track(TrackSummary),
    Person(PersonSummary),
    Collection(CollectionSummary),
}

impl CatalogItem {
    /// Stable catalog-assigned identifier
    pub fn id(&self) -> &ItemId {
        match self {
            CatalogItem::Track(track) => &track.id,
            CatalogItem::Person(person) => &person.id,
            CatalogItem::Collection(collection) => &collection.id,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            CatalogItem::Track(_) => ItemKind::Track,
            CatalogItem::Person(_) => ItemKind::Person,
            CatalogItem::Collection(_) => ItemKind::Collection,
        }
    }

    /// Display title
    pub fn title(&self) -> &str {
        match self {
            CatalogItem::Track(track) => &track.title,
            CatalogItem::Person(person) => &person.name,
            CatalogItem::Collection(collection) => &collection.title,
        }
    }

    /// Display subtitle (artist line; a person's subtitle is their name)
    pub fn subtitle(&self) -> &str {
        match self {
            CatalogItem::Track(track) => &track.artist_name,
            CatalogItem::Person(person) => &person.name,
            CatalogItem::Collection(collection) => &collection.artist_name,
        }
    }

    pub fn artwork(&self) -> Option<&ArtworkRef> {
        match self {
            CatalogItem::Track(track) => track.artwork.as_ref(),
            CatalogItem::Person(person) => person.artwork.as_ref(),
            CatalogItem::Collection(collection) => collection.artwork.as_ref(),
        }
    }
}
