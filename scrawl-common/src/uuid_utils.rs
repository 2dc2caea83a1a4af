//! UUID utilities

use uuid::Uuid;

/// Generate a new UUIDv4
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// Parse UUID from string
pub fn parse(s: &str) -> Result<Uuid, uuid::Error> {
    Uuid::parse_str(s)
}

/// Carry over a legacy identifier when it parses as a UUID, minting a
/// fresh one otherwise. Returns the identifier and whether it was minted.
pub fn carry_over(legacy_id: &str) -> (Uuid, bool) {
    match Uuid::parse_str(legacy_id.trim()) {
        Ok(id) => (id, false),
        Err(_) => (Uuid::new_v4(), true),
    }
}
