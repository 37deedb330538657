use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Category, CraftItem, ItemId, Price};

/// Machine-readable failure codes surfaced by the remote table service.
/// The classifier in the crate root consumes these.
pub const CODE_INVALID_CREDENTIALS: &str = "PGRST301";
pub const CODE_MISSING_TABLE: &str = "42P01";
pub const CODE_SCHEMA_MISMATCH: &str = "42703";
pub const CODE_TIMEOUT: &str = "57014";

/// Field values for an insert or update; everything but the identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFields {
    pub name: String,
    pub description: String,
    pub price_cents: u64,
    pub images: Vec<String>,
    pub category: Category,
    pub model_url: Option<String>,
}

impl From<&CraftItem> for ItemFields {
    fn from(item: &CraftItem) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone(),
            price_cents: item.price.cents(),
            images: item.images.clone(),
            category: item.category,
            model_url: item.model_url.clone(),
        }
    }
}

/// One row of the remote collection, as the shell hands it over.
///
/// Older deployments stored a single `image_url` column instead of the
/// ordered `images` list; both shapes are accepted here and collapse to
/// the canonical list in [`ItemRow::into_item`]. The two never coexist
/// past this boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRow {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: u64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub category: Category,
    #[serde(default)]
    pub model_url: Option<String>,
}

impl ItemRow {
    #[must_use]
    pub fn into_item(self) -> CraftItem {
        let images = if self.images.is_empty() {
            self.image_url.into_iter().collect()
        } else {
            self.images
        };
        CraftItem {
            id: ItemId(self.id),
            name: self.name,
            description: self.description,
            price: Price::from_cents(self.price_cents),
            images,
            category: self.category,
            model_url: self.model_url,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatewayOperation {
    /// Full listing, ordered by identifier descending.
    List,
    Insert { fields: ItemFields },
    Update { id: ItemId, fields: ItemFields },
    Delete { id: ItemId },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatewayOutput {
    Rows(Vec<ItemRow>),
    Row(ItemRow),
    Done,
}

#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("gateway failure {code}: {message}")]
pub struct GatewayError {
    pub code: String,
    pub message: String,
}

impl GatewayError {
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

pub type GatewayResult = Result<GatewayOutput, GatewayError>;

impl Operation for GatewayOperation {
    type Output = GatewayResult;
}

/// Capability for the remote store collaborator. The shell owns the real
/// client and its credentials; the core only issues typed requests.
pub struct Gateway<Ev> {
    context: CapabilityContext<GatewayOperation, Ev>,
}

impl<Ev> Capability<Ev> for Gateway<Ev> {
    type Operation = GatewayOperation;
    type MappedSelf<MappedEv> = Gateway<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Gateway::new(self.context.map_event(f))
    }
}

impl<Ev> Gateway<Ev>
where
    Ev: 'static,
{
    #[must_use]
    pub fn new(context: CapabilityContext<GatewayOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn list<F>(&self, make_event: F)
    where
        F: FnOnce(GatewayResult) -> Ev + Send + 'static,
    {
        self.request(GatewayOperation::List, make_event);
    }

    pub fn insert<F>(&self, fields: ItemFields, make_event: F)
    where
        F: FnOnce(GatewayResult) -> Ev + Send + 'static,
    {
        self.request(GatewayOperation::Insert { fields }, make_event);
    }

    pub fn update<F>(&self, id: ItemId, fields: ItemFields, make_event: F)
    where
        F: FnOnce(GatewayResult) -> Ev + Send + 'static,
    {
        self.request(GatewayOperation::Update { id, fields }, make_event);
    }

    pub fn delete<F>(&self, id: ItemId, make_event: F)
    where
        F: FnOnce(GatewayResult) -> Ev + Send + 'static,
    {
        self.request(GatewayOperation::Delete { id }, make_event);
    }

    fn request<F>(&self, operation: GatewayOperation, make_event: F)
    where
        F: FnOnce(GatewayResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context.request_from_shell(operation).await;
            context.update_app(make_event(result));
        });
    }
}
