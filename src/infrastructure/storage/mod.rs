pub mod db;
pub mod memory;

use crate::domain::error::WashboardError;

/// Key characters accepted by the device keystore.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
}

fn check_item(key: &str, value: &str, max_item_bytes: usize) -> Result<(), WashboardError> {
    if !is_valid_key(key) {
        return Err(WashboardError::Store(format!("invalid key '{}'", key)));
    }
    if value.len() > max_item_bytes {
        return Err(WashboardError::ItemTooLarge {
            key: key.to_string(),
            size: value.len(),
            limit: max_item_bytes,
        });
    }
    Ok(())
}
