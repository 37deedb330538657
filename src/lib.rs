#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod capabilities;
pub mod catalog;
pub mod event;
pub mod model;
pub mod prefs;

use serde::{Deserialize, Serialize};

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use event::Event;
pub use model::{ConnectionMode, Model};

use capabilities::{
    GatewayError, CODE_INVALID_CREDENTIALS, CODE_MISSING_TABLE, CODE_SCHEMA_MISMATCH, CODE_TIMEOUT,
};

/// Static shared secret unlocking the admin surface. There is no account
/// system; this mirrors the shop's single-operator setup.
pub const ADMIN_PASSCODE: &str = "23568";

pub const REMEDIATION_SQL: &str = r#"-- Run this against the shop database:
CREATE TABLE craft_items (
  id bigint generated by default as identity primary key,
  name text not null,
  description text,
  price_cents bigint not null,
  images text[],
  category text,
  model_url text
);"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaultSeverity {
    /// Operator intervention required; the catalog is blocked behind a
    /// diagnostic.
    Fatal,
    /// The store may come back; degrade to Offline, keep the catalog
    /// usable.
    Transient,
}

/// Classified remote-store failure. Produced from the raw machine-readable
/// code a [`GatewayError`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GatewayFault {
    InvalidCredentials,
    MissingTable,
    SchemaMismatch,
    Timeout,
    Unknown,
}

impl GatewayFault {
    #[must_use]
    pub fn classify(error: &GatewayError) -> Self {
        if error.code == CODE_INVALID_CREDENTIALS || error.message.contains("Invalid API key") {
            return Self::InvalidCredentials;
        }
        match error.code.as_str() {
            CODE_MISSING_TABLE => Self::MissingTable,
            CODE_SCHEMA_MISMATCH => Self::SchemaMismatch,
            CODE_TIMEOUT => Self::Timeout,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn severity(self) -> FaultSeverity {
        match self {
            Self::InvalidCredentials | Self::MissingTable | Self::SchemaMismatch => {
                FaultSeverity::Fatal
            }
            Self::Timeout | Self::Unknown => FaultSeverity::Transient,
        }
    }

    #[must_use]
    pub const fn is_fatal(self) -> bool {
        matches!(self.severity(), FaultSeverity::Fatal)
    }

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::MissingTable => "MISSING_TABLE",
            Self::SchemaMismatch => "SCHEMA_MISMATCH",
            Self::Timeout => "TIMEOUT",
            Self::Unknown => "UNKNOWN",
        }
    }

    #[must_use]
    pub fn diagnostic(self) -> Diagnostic {
        match self {
            Self::InvalidCredentials => Diagnostic {
                headline: "Setup Required".into(),
                detail: "Invalid API key. Check the gateway credentials configured in the shell."
                    .into(),
                remediation: None,
            },
            Self::MissingTable => Diagnostic {
                headline: "Setup Required".into(),
                detail: "The 'craft_items' table is missing from the shop database.".into(),
                remediation: Some(REMEDIATION_SQL.into()),
            },
            Self::SchemaMismatch => Diagnostic {
                headline: "Setup Required".into(),
                detail: "Database schema mismatch: expected columns are missing from 'craft_items'."
                    .into(),
                remediation: Some(REMEDIATION_SQL.into()),
            },
            Self::Timeout | Self::Unknown => Diagnostic {
                headline: "Connection Trouble".into(),
                detail: "The shop database is not responding.".into(),
                remediation: None,
            },
        }
    }
}

/// Blocking operator-facing diagnostic shown instead of the catalog when
/// the core is in [`ConnectionMode::Fatal`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub headline: String,
    pub detail: String,
    pub remediation: Option<String>,
}

/// Presentation projection of one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCard {
    pub id: model::ItemId,
    pub name: String,
    pub description: String,
    pub price_text: String,
    pub images: Vec<String>,
    pub category: model::Category,
    pub model_url: Option<String>,
    pub in_cart: bool,
    pub in_wishlist: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationPrompt {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewModel {
    pub mode: ConnectionMode,
    pub is_loading: bool,
    pub current_view: model::View,
    pub layout: model::CatalogLayout,
    pub theme: model::Theme,
    pub catalog: Vec<ItemCard>,
    pub cart: Vec<ItemCard>,
    pub wishlist: Vec<ItemCard>,
    pub cart_count: usize,
    pub wishlist_count: usize,
    pub admin: bool,
    pub modal: Option<model::Modal>,
    pub confirmation: Option<ConfirmationPrompt>,
    pub notice: Option<String>,
    /// Present exactly when `mode` is Fatal; the catalog is empty then.
    pub diagnostic: Option<Diagnostic>,
}

pub mod app {
    use tracing::{debug, warn};

    use super::{ConfirmationPrompt, GatewayFault, ItemCard, ViewModel};
    use crate::capabilities::{
        Capabilities, GatewayError, GatewayOutput, ItemFields, ItemRow, StorageOutput,
    };
    use crate::catalog::{seed_items, unix_time_ms};
    use crate::event::Event;
    use crate::model::{ConnectionMode, CraftItem, ItemId, Modal, Model, PendingAction};
    use crate::prefs;

    #[derive(Default)]
    pub struct App;

    impl App {
        fn request_load(model: &mut Model, caps: &Capabilities) {
            model.is_loading = true;
            model.diagnostic = None;
            model.mode = ConnectionMode::Live;
            caps.gateway
                .list(|result| Event::ListLoaded(Box::new(result)));
        }

        fn persist_wishlist(model: &Model, caps: &Capabilities) {
            caps.storage.write(
                prefs::WISHLIST_KEY,
                prefs::encode(&model.wishlist),
                |result| Event::PrefsWritten(Box::new(result)),
            );
        }

        /// A failed remote mirror never rolls the optimistic change back;
        /// it only demotes the session to Offline. Offline is sticky until
        /// the next full load.
        fn demote(model: &mut Model, error: &GatewayError, kept: &str) {
            let fault = GatewayFault::classify(error);
            warn!(
                code = %error.code,
                fault = fault.code(),
                "remote mirror failed, keeping local change"
            );
            model.mode = ConnectionMode::Offline;
            model.notice = Some(format!(
                "Connection to the shop database lost. {kept} (Offline Mode)."
            ));
        }

        fn require_admin(model: &mut Model) -> bool {
            if model.admin {
                true
            } else {
                model.notice = Some("Admin mode is required for that.".into());
                false
            }
        }

        fn apply_delete(id: ItemId, model: &mut Model, caps: &Capabilities) {
            if !model.catalog.remove(id) {
                warn!(%id, "delete requested for unknown item");
                return;
            }
            model.cart.remove(&id);
            if model.wishlist.remove(&id) {
                Self::persist_wishlist(model, caps);
            }

            match model.mode {
                ConnectionMode::Live => {
                    caps.gateway.delete(id, move |result| Event::DeleteCompleted {
                        id,
                        result: Box::new(result),
                    });
                }
                ConnectionMode::Offline | ConnectionMode::Fatal => {
                    model.notice = Some("Offline Mode: item deleted locally.".into());
                }
            }
        }

        fn card(model: &Model, item: &CraftItem) -> ItemCard {
            ItemCard {
                id: item.id,
                name: item.name.clone(),
                description: item.description.clone(),
                price_text: item.price.display(),
                images: item.images.clone(),
                category: item.category,
                model_url: item.model_url.clone(),
                in_cart: model.cart.contains(&item.id),
                in_wishlist: model.wishlist.contains(&item.id),
            }
        }
    }

    impl crux_core::App for App {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            debug!(event = event.name(), "update");

            match event {
                Event::StartupRequested => {
                    Self::request_load(model, caps);
                    caps.storage
                        .read(prefs::WISHLIST_KEY, |result| {
                            Event::PrefsLoaded(Box::new(result))
                        });
                    caps.render.render();
                }

                Event::ReloadRequested => {
                    Self::request_load(model, caps);
                    caps.render.render();
                }

                Event::ListLoaded(result) => {
                    model.is_loading = false;
                    match *result {
                        Ok(GatewayOutput::Rows(rows)) => {
                            model
                                .catalog
                                .replace_all(rows.into_iter().map(ItemRow::into_item).collect());
                            model.mode = ConnectionMode::Live;
                            model.diagnostic = None;
                        }
                        Ok(other) => {
                            warn!(?other, "unexpected gateway output for a listing");
                            model.mode = ConnectionMode::Offline;
                            model.catalog.replace_all(seed_items());
                        }
                        Err(e) => {
                            let fault = GatewayFault::classify(&e);
                            warn!(code = %e.code, fault = fault.code(), "initial load failed");
                            if fault.is_fatal() {
                                model.mode = ConnectionMode::Fatal;
                                model.diagnostic = Some(fault.diagnostic());
                                model.catalog.clear();
                            } else {
                                model.mode = ConnectionMode::Offline;
                                model.catalog.replace_all(seed_items());
                                model.notice = Some(
                                    "Shop database unreachable, showing the built-in collection (Offline Mode)."
                                        .into(),
                                );
                            }
                        }
                    }
                    caps.render.render();
                }

                Event::CreateItemRequested(draft) => {
                    if !Self::require_admin(model) {
                        caps.render.render();
                        return;
                    }

                    let id = model.id_gen.next(unix_time_ms());
                    let item = draft.into_item(id);
                    let fields = ItemFields::from(&item);
                    model.catalog.insert_front(item);
                    model.modal = None;

                    match model.mode {
                        ConnectionMode::Live => {
                            caps.gateway.insert(fields, move |result| {
                                Event::InsertCompleted {
                                    local_id: id,
                                    result: Box::new(result),
                                }
                            });
                        }
                        ConnectionMode::Offline | ConnectionMode::Fatal => {
                            model.notice = Some("Offline Mode: item added locally.".into());
                        }
                    }
                    caps.render.render();
                }

                Event::InsertCompleted { local_id, result } => {
                    match *result {
                        Ok(GatewayOutput::Row(row)) => {
                            if model.catalog.adopt(local_id, row.into_item()) {
                                debug!(%local_id, "temporary record adopted the stored row");
                            } else {
                                debug!(%local_id, "insert confirmed after local delete, dropped");
                            }
                        }
                        Ok(other) => {
                            warn!(?other, "unexpected gateway output for an insert");
                        }
                        Err(e) => {
                            Self::demote(model, &e, "Item kept locally");
                        }
                    }
                    caps.render.render();
                }

                Event::SaveItemRequested(item) => {
                    if !Self::require_admin(model) {
                        caps.render.render();
                        return;
                    }

                    let id = item.id;
                    let fields = ItemFields::from(&*item);
                    model.modal = None;

                    if !model.catalog.replace(*item) {
                        warn!(%id, "edit targeted a record that no longer exists");
                        caps.render.render();
                        return;
                    }

                    if model.mode == ConnectionMode::Live {
                        caps.gateway.update(id, fields, move |result| {
                            Event::UpdateCompleted {
                                id,
                                result: Box::new(result),
                            }
                        });
                    } else {
                        model.notice = Some("Offline Mode: change saved locally.".into());
                    }
                    caps.render.render();
                }

                Event::UpdateCompleted { id, result } => {
                    match *result {
                        Ok(GatewayOutput::Done) => debug!(%id, "update mirrored"),
                        Ok(other) => warn!(?other, "unexpected gateway output for an update"),
                        Err(e) => Self::demote(model, &e, "Change saved locally"),
                    }
                    caps.render.render();
                }

                Event::DeleteItemRequested { id } => {
                    if !Self::require_admin(model) {
                        caps.render.render();
                        return;
                    }
                    // Single slot: a newer request replaces a pending one.
                    model.confirmation = Some(PendingAction::DeleteItem(id));
                    caps.render.render();
                }

                Event::ConfirmationAccepted => {
                    if let Some(action) = model.confirmation.take() {
                        match action {
                            PendingAction::DeleteItem(id) => {
                                Self::apply_delete(id, model, caps);
                            }
                        }
                    }
                    caps.render.render();
                }

                Event::ConfirmationDismissed => {
                    model.confirmation = None;
                    caps.render.render();
                }

                Event::DeleteCompleted { id, result } => {
                    match *result {
                        Ok(GatewayOutput::Done) => debug!(%id, "delete mirrored"),
                        Ok(other) => warn!(?other, "unexpected gateway output for a delete"),
                        Err(e) => Self::demote(model, &e, "Item deleted locally"),
                    }
                    caps.render.render();
                }

                Event::AddToCart { id } => {
                    if model.catalog.contains(id) {
                        model.cart.insert(id);
                    } else {
                        warn!(%id, "cart add for unknown item ignored");
                    }
                    caps.render.render();
                }

                Event::RemoveFromCart { id } => {
                    model.cart.remove(&id);
                    caps.render.render();
                }

                Event::InquirySubmitted => {
                    model.cart.clear();
                    model.current_view = crate::model::View::Catalog;
                    model.notice = Some("Inquiry sent! We'll be in touch soon.".into());
                    caps.render.render();
                }

                Event::WishlistToggled { id } => {
                    let added = prefs::toggle(&mut model.wishlist, id);
                    debug!(%id, added, "wishlist toggled");
                    Self::persist_wishlist(model, caps);
                    caps.render.render();
                }

                Event::PrefsLoaded(result) => {
                    match *result {
                        Ok(StorageOutput::Value(stored)) => {
                            model.wishlist = prefs::decode_lenient(stored.as_deref());
                        }
                        Ok(other) => {
                            warn!(?other, "unexpected storage output for a read");
                        }
                        Err(e) => {
                            warn!(error = %e, "wishlist load failed, starting empty");
                        }
                    }
                    caps.render.render();
                }

                Event::PrefsWritten(result) => match *result {
                    Ok(_) => debug!("wishlist persisted"),
                    Err(e) => warn!(error = %e, "wishlist persist failed"),
                },

                Event::ViewSelected(view) => {
                    model.current_view = view;
                    caps.render.render();
                }

                Event::LayoutToggled => {
                    model.layout = model.layout.toggled();
                    caps.render.render();
                }

                Event::ThemeSelected(theme) => {
                    model.theme = theme;
                    caps.render.render();
                }

                Event::SettingsOpened => {
                    model.modal = Some(Modal::Settings);
                    caps.render.render();
                }

                Event::AddItemOpened => {
                    if Self::require_admin(model) {
                        model.modal = Some(Modal::AddItem);
                    }
                    caps.render.render();
                }

                Event::EditItemOpened { id } => {
                    if Self::require_admin(model) {
                        if model.catalog.contains(id) {
                            model.modal = Some(Modal::EditItem(id));
                        } else {
                            warn!(%id, "edit requested for unknown item");
                        }
                    }
                    caps.render.render();
                }

                Event::ModalDismissed => {
                    model.modal = None;
                    caps.render.render();
                }

                Event::NoticeDismissed => {
                    model.notice = None;
                    caps.render.render();
                }

                Event::AdminLoginSubmitted { passcode } => {
                    if passcode == crate::ADMIN_PASSCODE {
                        model.admin = true;
                        model.modal = None;
                        model.notice = Some("Admin mode enabled.".into());
                    } else {
                        model.notice = Some("Incorrect passcode.".into());
                    }
                    caps.render.render();
                }

                Event::AdminLogoutRequested => {
                    model.admin = false;
                    model.modal = None;
                    model.notice = Some("Admin mode disabled.".into());
                    caps.render.render();
                }
            }
        }

        fn view(&self, model: &Model) -> ViewModel {
            let blocked = model.mode == ConnectionMode::Fatal;

            let catalog: Vec<ItemCard> = if blocked {
                Vec::new()
            } else {
                model
                    .catalog
                    .items()
                    .iter()
                    .map(|item| Self::card(model, item))
                    .collect()
            };

            let cart: Vec<ItemCard> = catalog
                .iter()
                .filter(|card| card.in_cart)
                .cloned()
                .collect();

            // Dangling wishlist ids stay in the persisted set but are
            // filtered from the projection.
            let wishlist: Vec<ItemCard> = catalog
                .iter()
                .filter(|card| card.in_wishlist)
                .cloned()
                .collect();

            ViewModel {
                mode: model.mode,
                is_loading: model.is_loading,
                current_view: model.current_view,
                layout: model.layout,
                theme: model.theme,
                cart_count: cart.len(),
                wishlist_count: wishlist.len(),
                catalog,
                cart,
                wishlist,
                admin: model.admin,
                modal: model.modal,
                confirmation: model.confirmation.map(|action| ConfirmationPrompt {
                    message: action.prompt(),
                }),
                notice: model.notice.clone(),
                diagnostic: if blocked { model.diagnostic.clone() } else { None },
            }
        }
    }

}
