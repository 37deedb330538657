use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::catalog::{Catalog, ItemIdGen};

pub const MAX_NAME_LENGTH: usize = 120;
pub const MAX_DESCRIPTION_LENGTH: usize = 4096;
pub const MAX_ITEM_IMAGES: usize = 3;
pub const MAX_IMAGE_REF_LENGTH: usize = 2048;

/// Item identifier. Positive ids come from the remote store; items created
/// while the store is unreachable carry a local surrogate derived from
/// wall-clock milliseconds. Stable once assigned, never reused in a session.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ItemId(pub i64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Price in minor units (cents). Non-negative by construction.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Price(pub u64);

impl Price {
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn display(self) -> String {
        format!("${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Decor,
    #[default]
    Crochet,
    Random,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name too long ({len} > {max})")]
    NameTooLong { len: usize, max: usize },
    #[error("description too long ({len} > {max})")]
    DescriptionTooLong { len: usize, max: usize },
    #[error("too many images ({count} > {max})")]
    TooManyImages { count: usize, max: usize },
    #[error("image reference cannot be empty")]
    EmptyImageRef,
    #[error("image reference too long ({len} > {max})")]
    ImageRefTooLong { len: usize, max: usize },
}

/// A catalog entry. `images` is the one canonical representation: an
/// ordered sequence of references, first entry is the cover image. The
/// legacy single-image column is normalized away at the gateway boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftItem {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub images: Vec<String>,
    pub category: Category,
    pub model_url: Option<String>,
}

/// Everything but the identifier; input to item creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub images: Vec<String>,
    pub category: Category,
    pub model_url: Option<String>,
}

impl ItemDraft {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Price,
        images: Vec<String>,
        category: Category,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let description = description.into();

        if name.len() > MAX_NAME_LENGTH {
            return Err(ValidationError::NameTooLong {
                len: name.len(),
                max: MAX_NAME_LENGTH,
            });
        }
        if description.len() > MAX_DESCRIPTION_LENGTH {
            return Err(ValidationError::DescriptionTooLong {
                len: description.len(),
                max: MAX_DESCRIPTION_LENGTH,
            });
        }
        if images.len() > MAX_ITEM_IMAGES {
            return Err(ValidationError::TooManyImages {
                count: images.len(),
                max: MAX_ITEM_IMAGES,
            });
        }
        for image in &images {
            if image.trim().is_empty() {
                return Err(ValidationError::EmptyImageRef);
            }
            if image.len() > MAX_IMAGE_REF_LENGTH {
                return Err(ValidationError::ImageRefTooLong {
                    len: image.len(),
                    max: MAX_IMAGE_REF_LENGTH,
                });
            }
        }

        Ok(Self {
            name,
            description,
            price,
            images,
            category,
            model_url: None,
        })
    }

    #[must_use]
    pub fn with_model_url(mut self, url: impl Into<String>) -> Self {
        self.model_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn into_item(self, id: ItemId) -> CraftItem {
        CraftItem {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            images: self.images,
            category: self.category,
            model_url: self.model_url,
        }
    }
}

/// How the core currently relates to the remote store.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionMode {
    /// Remote store reachable and schema-valid; mutations are mirrored.
    #[default]
    Live,
    /// Remote store erroring transiently; mutations apply locally only.
    /// Sticky: only a fresh load can return the core to Live.
    Offline,
    /// Unrecoverable configuration or schema error. The catalog is not
    /// usable; only the diagnostic is presented.
    Fatal,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    #[default]
    Catalog,
    Cart,
    Wishlist,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogLayout {
    #[default]
    Grid,
    Swipe,
}

impl CatalogLayout {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Grid => Self::Swipe,
            Self::Swipe => Self::Grid,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Pastel,
    Forest,
    Ocean,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modal {
    Settings,
    AddItem,
    EditItem(ItemId),
}

/// Action bound to the single pending-confirmation slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingAction {
    DeleteItem(ItemId),
}

impl PendingAction {
    #[must_use]
    pub fn prompt(self) -> String {
        match self {
            Self::DeleteItem(_) => {
                "Are you sure you want to permanently delete this item?".into()
            }
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Model {
    // Catalog data
    pub catalog: Catalog,
    pub id_gen: ItemIdGen,
    pub mode: ConnectionMode,
    pub diagnostic: Option<crate::Diagnostic>,
    pub is_loading: bool,

    // User-scoped sets
    pub cart: BTreeSet<ItemId>,
    pub wishlist: BTreeSet<ItemId>,

    // View state
    pub current_view: View,
    pub layout: CatalogLayout,
    pub theme: Theme,
    pub modal: Option<Modal>,
    pub admin: bool,
    pub confirmation: Option<PendingAction>,
    pub notice: Option<String>,
}

impl Model {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
