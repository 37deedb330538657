use serde::{Deserialize, Serialize};

use crate::capabilities::{GatewayResult, StorageResult};
use crate::model::{CraftItem, ItemDraft, ItemId, Theme, View};

/// Everything that can happen to the core: user intents dispatched by the
/// shell, and capability responses re-entering the reducer. Large payloads
/// are boxed to keep the enum small.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Lifecycle
    StartupRequested,
    ReloadRequested,

    // Catalog mutations (admin only)
    CreateItemRequested(Box<ItemDraft>),
    SaveItemRequested(Box<CraftItem>),
    DeleteItemRequested { id: ItemId },

    // Confirmation gate
    ConfirmationAccepted,
    ConfirmationDismissed,

    // Cart
    AddToCart { id: ItemId },
    RemoveFromCart { id: ItemId },
    InquirySubmitted,

    // Wishlist
    WishlistToggled { id: ItemId },

    // View state
    ViewSelected(View),
    LayoutToggled,
    ThemeSelected(Theme),
    SettingsOpened,
    AddItemOpened,
    EditItemOpened { id: ItemId },
    ModalDismissed,
    NoticeDismissed,

    // Admin session
    AdminLoginSubmitted { passcode: String },
    AdminLogoutRequested,

    // Capability responses
    ListLoaded(Box<GatewayResult>),
    InsertCompleted {
        local_id: ItemId,
        result: Box<GatewayResult>,
    },
    UpdateCompleted {
        id: ItemId,
        result: Box<GatewayResult>,
    },
    DeleteCompleted {
        id: ItemId,
        result: Box<GatewayResult>,
    },
    PrefsLoaded(Box<StorageResult>),
    PrefsWritten(Box<StorageResult>),
}

impl Event {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::StartupRequested => "startup_requested",
            Self::ReloadRequested => "reload_requested",
            Self::CreateItemRequested(_) => "create_item_requested",
            Self::SaveItemRequested(_) => "save_item_requested",
            Self::DeleteItemRequested { .. } => "delete_item_requested",
            Self::ConfirmationAccepted => "confirmation_accepted",
            Self::ConfirmationDismissed => "confirmation_dismissed",
            Self::AddToCart { .. } => "add_to_cart",
            Self::RemoveFromCart { .. } => "remove_from_cart",
            Self::InquirySubmitted => "inquiry_submitted",
            Self::WishlistToggled { .. } => "wishlist_toggled",
            Self::ViewSelected(_) => "view_selected",
            Self::LayoutToggled => "layout_toggled",
            Self::ThemeSelected(_) => "theme_selected",
            Self::SettingsOpened => "settings_opened",
            Self::AddItemOpened => "add_item_opened",
            Self::EditItemOpened { .. } => "edit_item_opened",
            Self::ModalDismissed => "modal_dismissed",
            Self::NoticeDismissed => "notice_dismissed",
            Self::AdminLoginSubmitted { .. } => "admin_login_submitted",
            Self::AdminLogoutRequested => "admin_logout_requested",
            Self::ListLoaded(_) => "list_loaded",
            Self::InsertCompleted { .. } => "insert_completed",
            Self::UpdateCompleted { .. } => "update_completed",
            Self::DeleteCompleted { .. } => "delete_completed",
            Self::PrefsLoaded(_) => "prefs_loaded",
            Self::PrefsWritten(_) => "prefs_written",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_size_is_reasonable() {
        let size = std::mem::size_of::<Event>();
        assert!(
            size <= 64,
            "Event enum is {size} bytes, box more variants"
        );
    }

    #[test]
    fn response_events_round_trip_through_serde() {
        let event = Event::DeleteCompleted {
            id: ItemId(42),
            result: Box::new(Ok(crate::capabilities::GatewayOutput::Done)),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
