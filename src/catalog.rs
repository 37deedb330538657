use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::{Category, CraftItem, ItemId, Price};

/// Milliseconds since the Unix epoch, or 0 if the clock is unusable.
/// A zero reading is still safe: `ItemIdGen` enforces monotonicity.
#[must_use]
pub fn unix_time_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Generator for local surrogate identifiers, used when an item is created
/// without remote confirmation. Derived from the wall clock but strictly
/// monotonic within a session, so two rapid creations never collide.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ItemIdGen {
    last: i64,
}

impl ItemIdGen {
    pub fn next(&mut self, now_ms: i64) -> ItemId {
        let id = if now_ms > self.last { now_ms } else { self.last + 1 };
        self.last = id;
        ItemId(id)
    }
}

/// The authoritative in-memory item collection, newest first.
///
/// Invariant: no two records share an identifier. Every operation below
/// preserves it for arbitrary call sequences.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Catalog {
    items: Vec<CraftItem>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[CraftItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&CraftItem> {
        self.items.iter().find(|i| i.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    /// Replaces the whole collection atomically. Rows are ordered by
    /// identifier descending (most recently created first); a duplicate
    /// identifier in the input keeps the first occurrence.
    pub fn replace_all(&mut self, items: Vec<CraftItem>) {
        let mut items = items;
        items.sort_by(|a, b| b.id.cmp(&a.id));
        items.dedup_by(|a, b| a.id == b.id);
        self.items = items;
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Inserts a new record at the front. A record with the same id is
    /// replaced in place instead, keeping the invariant.
    pub fn insert_front(&mut self, item: CraftItem) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            *existing = item;
        } else {
            self.items.insert(0, item);
        }
    }

    /// In-place replacement by identifier. Returns false when no record
    /// with that identifier exists.
    pub fn replace(&mut self, item: CraftItem) -> bool {
        match self.items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => {
                *existing = item;
                true
            }
            None => false,
        }
    }

    /// Swaps a temporary record for the row the remote store returned,
    /// keeping the record's position. Returns false when the temporary
    /// record is gone (superseded by a local delete).
    pub fn adopt(&mut self, local_id: ItemId, item: CraftItem) -> bool {
        let Some(pos) = self.items.iter().position(|i| i.id == local_id) else {
            return false;
        };
        // The confirmed id must not collide with another record.
        if item.id != local_id && self.contains(item.id) {
            self.items.remove(pos);
            return self.replace(item);
        }
        self.items[pos] = item;
        true
    }

    /// Removes by identifier. Returns false when absent.
    pub fn remove(&mut self, id: ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() != before
    }
}

fn seed(id: i64, name: &str, description: &str, cents: u64, images: &[&str], category: Category) -> CraftItem {
    CraftItem {
        id: ItemId(id),
        name: name.into(),
        description: description.into(),
        price: Price::from_cents(cents),
        images: images.iter().map(|s| (*s).into()).collect(),
        category,
        model_url: None,
    }
}

/// Built-in fallback collection, shown whenever the remote store cannot be
/// reached during the initial load. Ids descend from 1006 so they sort the
/// same way a live listing would.
#[must_use]
pub fn seed_items() -> Vec<CraftItem> {
    vec![
        seed(
            1006,
            "Mellow the Bunny",
            "Hand-crocheted bunny in soft cotton yarn, floppy ears and all.",
            2_800,
            &["/images/mellow-1.jpg", "/images/mellow-2.jpg"],
            Category::Crochet,
        ),
        seed(
            1005,
            "Tidepool Coaster Set",
            "Four spiral coasters in ocean blues, mercerized cotton.",
            1_650,
            &["/images/tidepool.jpg"],
            Category::Decor,
        ),
        seed(
            1004,
            "Sir Reginald Octopus",
            "A distinguished octopus with a tiny top hat. Eight legs, one mood.",
            3_400,
            &["/images/reginald-1.jpg", "/images/reginald-2.jpg", "/images/reginald-3.jpg"],
            Category::Crochet,
        ),
        seed(
            1003,
            "Felt Star Garland",
            "Two metres of hand-stitched felt stars on jute cord.",
            1_200,
            &["/images/garland.jpg"],
            Category::Decor,
        ),
        seed(
            1002,
            "Pocket Cactus",
            "Un-killable crochet cactus in a terracotta pot.",
            1_450,
            &["/images/cactus.jpg"],
            Category::Random,
        ),
        seed(
            1001,
            "Granny Square Tote",
            "Roomy tote stitched from vintage-style granny squares.",
            3_900,
            &["/images/tote-1.jpg", "/images/tote-2.jpg"],
            Category::Crochet,
        ),
    ]
}
