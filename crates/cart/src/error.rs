//! Cart error handling with Sentry integration.
//!
//! Only persistence failures are errors. Unknown ids, empty candidates and
//! malformed persisted data are recovered from locally and never reach the
//! caller.

use thiserror::Error;

use crate::store::StoreError;

/// Errors returned by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The store rejected or failed the write. The cart was rolled back.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The cart could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

/// Report a failed cart write to Sentry and the log.
///
/// Sentry calls are no-ops when no client is bound.
pub fn capture_write_failure(err: &CartError, operation: &str) {
    let event_id = sentry::capture_error(err);
    tracing::error!(
        error = %err,
        operation,
        sentry_event_id = %event_id,
        "Cart write failed"
    );
}

/// Add a breadcrumb for a cart action.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of cart
/// actions leading up to an error.
pub fn add_breadcrumb(message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some("cart".to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        let err = CartError::from(StoreError::Unavailable("offline".to_string()));
        assert_eq!(err.to_string(), "Store error: storage unavailable: offline");
    }

    #[test]
    fn test_capture_without_client_is_noop() {
        let err = CartError::from(StoreError::QuotaExceeded {
            needed: 2,
            limit: 1,
        });
        capture_write_failure(&err, "add");
        add_breadcrumb("Item added", Some(&[("id", "w1")]));
    }
}
