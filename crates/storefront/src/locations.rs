//! Shop directory.
//!
//! The shops where frames can be tried on and where eye exams take place.
//! Product pages list them; the booking form's preferred store is matched
//! against them.

use serde::Serialize;

/// A physical shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreLocation {
    pub id: &'static str,
    pub name: &'static str,
    pub address: &'static str,
    pub phone: &'static str,
    pub hours: &'static str,
    /// Whether the shop currently has stock and takes bookings.
    pub is_available: bool,
}

/// Shops in display order.
pub const STORE_LOCATIONS: &[StoreLocation] = &[
    StoreLocation {
        id: "1",
        name: "Prime Optic - City Center",
        address: "Rruga Dëshmorët e Kombit, Tirana 1001, Albania",
        phone: "+355 4 123 4567",
        hours: "Mon-Sat: 9:00 AM - 8:00 PM, Sun: 10:00 AM - 6:00 PM",
        is_available: true,
    },
    StoreLocation {
        id: "2",
        name: "Prime Optic - Blloku",
        address: "Rruga Ismail Qemali, Blloku, Tirana 1001, Albania",
        phone: "+355 4 234 5678",
        hours: "Mon-Sat: 9:00 AM - 8:00 PM, Sun: 10:00 AM - 6:00 PM",
        is_available: true,
    },
    StoreLocation {
        id: "3",
        name: "Prime Optic - TEG",
        address: "Tirana East Gate, Rruga e Elbasanit, Tirana 1001, Albania",
        phone: "+355 4 345 6789",
        hours: "Mon-Sat: 10:00 AM - 9:00 PM, Sun: 11:00 AM - 7:00 PM",
        is_available: true,
    },
    StoreLocation {
        id: "4",
        name: "Prime Optic - Qendra Tregtare",
        address: "Qendra Tregtare Univers, Rruga Kavajës, Tirana 1001, Albania",
        phone: "+355 4 456 7890",
        hours: "Mon-Sat: 9:00 AM - 8:00 PM, Sun: Closed",
        is_available: true,
    },
    StoreLocation {
        id: "5",
        name: "Prime Optic - Airport Road",
        address: "Rruga e Aeroportit, Lapraka, Tirana 1001, Albania",
        phone: "+355 4 567 8901",
        hours: "Mon-Sat: 9:00 AM - 7:00 PM, Sun: 10:00 AM - 5:00 PM",
        is_available: false,
    },
];

/// Find a shop by id or by name, ignoring case and surrounding whitespace.
#[must_use]
pub fn find_location(id_or_name: &str) -> Option<&'static StoreLocation> {
    let needle = id_or_name.trim();
    STORE_LOCATIONS
        .iter()
        .find(|store| store.id == needle || store.name.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_location_by_id_or_name() {
        assert_eq!(find_location("2").map(|s| s.name), Some("Prime Optic - Blloku"));
        assert_eq!(
            find_location(" prime optic - teg ").map(|s| s.id),
            Some("3")
        );
        assert!(find_location("City Center branch").is_none());
    }

    #[test]
    fn test_location_ids_are_unique() {
        for (i, store) in STORE_LOCATIONS.iter().enumerate() {
            assert!(STORE_LOCATIONS[i + 1..].iter().all(|other| other.id != store.id));
        }
    }
}
