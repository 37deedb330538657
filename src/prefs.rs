//! Wishlist persistence. The wishlist is the only user preference that
//! survives a restart; it lives under a single storage key as a JSON array
//! of item identifiers and is rewritten whole after every change.

use std::collections::BTreeSet;

use tracing::warn;

use crate::model::ItemId;

/// The one storage key this crate owns. No other keys are part of the
/// contract with the shell.
pub const WISHLIST_KEY: &str = "wishlistItems";

/// Flips membership of `id`. Returns true when the id is now present.
pub fn toggle(wishlist: &mut BTreeSet<ItemId>, id: ItemId) -> bool {
    if wishlist.remove(&id) {
        false
    } else {
        wishlist.insert(id);
        true
    }
}

/// Serializes the set as an ordered JSON array of identifiers.
#[must_use]
pub fn encode(wishlist: &BTreeSet<ItemId>) -> Vec<u8> {
    let ids: Vec<i64> = wishlist.iter().map(|id| id.0).collect();
    // A Vec<i64> cannot fail to serialize.
    serde_json::to_vec(&ids).unwrap_or_default()
}

/// Deserializes a stored wishlist. Absent or unreadable data yields an
/// empty set; corruption is logged, never surfaced to the caller.
#[must_use]
pub fn decode_lenient(stored: Option<&[u8]>) -> BTreeSet<ItemId> {
    let Some(bytes) = stored else {
        return BTreeSet::new();
    };
    match serde_json::from_slice::<Vec<i64>>(bytes) {
        Ok(ids) => ids.into_iter().map(ItemId).collect(),
        Err(e) => {
            warn!(error = %e, "stored wishlist unreadable, starting empty");
            BTreeSet::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_restores_membership() {
        let mut wishlist = BTreeSet::from([ItemId(1), ItemId(3)]);
        let original = wishlist.clone();

        assert!(toggle(&mut wishlist, ItemId(2)));
        assert!(!toggle(&mut wishlist, ItemId(2)));
        assert_eq!(wishlist, original);

        assert!(!toggle(&mut wishlist, ItemId(1)));
        assert!(toggle(&mut wishlist, ItemId(1)));
        assert_eq!(wishlist, original);
    }

    #[test]
    fn encode_is_ordered_ascending() {
        let wishlist = BTreeSet::from([ItemId(30), ItemId(2), ItemId(17)]);
        assert_eq!(encode(&wishlist), b"[2,17,30]".to_vec());
    }

    #[test]
    fn decode_round_trips() {
        let wishlist = BTreeSet::from([ItemId(5), ItemId(9)]);
        let bytes = encode(&wishlist);
        assert_eq!(decode_lenient(Some(&bytes)), wishlist);
    }

    #[test]
    fn decode_of_nothing_is_empty() {
        assert!(decode_lenient(None).is_empty());
    }

    #[test]
    fn decode_of_garbage_is_empty() {
        assert!(decode_lenient(Some(b"not json at all")).is_empty());
        assert!(decode_lenient(Some(b"{\"a\":1}")).is_empty());
    }
}
