//! Room grid screen.

use crate::db::{Database, DbResult, SETTING_ROOMS};

/// Room numbers skipped in the built-in sequence.
const EXCLUDED_DEFAULT_ROOMS: [u32; 5] = [4, 9, 14, 19, 24];

/// The built-in room list: 1 through 33 minus the skipped numbers.
pub fn default_rooms() -> Vec<String> {
    (1..=33)
        .filter(|n| !EXCLUDED_DEFAULT_ROOMS.contains(n))
        .map(|n| n.to_string())
        .collect()
}

/// Split a saved room setting into individual room numbers.
pub fn parse_room_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve the configured room list.
///
/// A saved, non-empty "rooms" setting wins; otherwise the built-in sequence.
pub fn room_list(db: &Database) -> DbResult<Vec<String>> {
    let saved: Option<String> = db.get_setting(SETTING_ROOMS)?;
    Ok(match saved {
        Some(raw) if !raw.is_empty() => parse_room_list(&raw),
        _ => default_rooms(),
    })
}

/// One tile on the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomTile {
    pub room_number: String,
    /// Name of the admitted patient, `None` for a vacant room
    pub occupant: Option<String>,
}

/// The room overview screen.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomGrid {
    pub tiles: Vec<RoomTile>,
}

impl RoomGrid {
    /// Read the configured rooms and their occupancy.
    pub fn load(db: &Database) -> DbResult<Self> {
        let mut tiles = Vec::new();
        for room_number in room_list(db)? {
            let occupant = db.get_patient_by_room(&room_number)?.map(|p| p.name);
            tiles.push(RoomTile {
                room_number,
                occupant,
            });
        }
        Ok(Self { tiles })
    }
}
