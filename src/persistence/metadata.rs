use super::storage::Storage;
use crate::domain::Filter;

/// Storage key holding the filter preference
pub const FILTER_KEY: &str = "ticklist-filter";

/// Load the saved filter; anything missing or unrecognised means `All`
pub fn load_filter(storage: &dyn Storage) -> Filter {
    match storage.get(FILTER_KEY) {
        Ok(Some(value)) => Filter::from_tag(&value).unwrap_or_else(|| {
            tracing::warn!(value = %value, "unknown stored filter, using all");
            Filter::All
        }),
        Ok(None) => Filter::All,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read filter preference");
            Filter::All
        }
    }
}

/// Save the filter as a plain string. Returns false (after logging) on failure.
pub fn save_filter(storage: &dyn Storage, filter: Filter) -> bool {
    match storage.set(FILTER_KEY, filter.to_tag()) {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "failed to save filter preference");
            false
        }
    }
}
