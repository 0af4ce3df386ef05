//! Result of a single delivery attempt.

use serde::{Deserialize, Serialize};

use super::OrderId;

/// Order annotation holding the last transport error.
pub const ANNOTATION_ERROR: &str = "bluelena_connect_error";
/// Order annotation holding the last HTTP status code.
pub const ANNOTATION_RESPONSE_CODE: &str = "bluelena_connect_response_code";
/// Order annotation holding the last HTTP response body.
pub const ANNOTATION_RESPONSE_BODY: &str = "bluelena_connect_response_body";

/// Outcome of one delivery attempt for one order.
///
/// `success` reports the transport level only: any completed HTTP exchange is
/// a success, whatever its status. Inspect `status_code` for stricter checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    /// Order the attempt was made for.
    pub order_id: OrderId,
    /// Whether a response was received.
    pub success: bool,
    /// HTTP status code, when a response was received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Raw response body, when a response was received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
    /// Why no response was received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl DeliveryOutcome {
    /// A completed HTTP exchange.
    pub fn completed(order_id: OrderId, status_code: u16, response_body: impl Into<String>) -> Self {
        Self {
            order_id,
            success: true,
            status_code: Some(status_code),
            response_body: Some(response_body.into()),
            error_message: None,
        }
    }

    /// A request that could not be completed.
    pub fn transport_failure(order_id: OrderId, error_message: impl Into<String>) -> Self {
        Self {
            order_id,
            success: false,
            status_code: None,
            response_body: None,
            error_message: Some(error_message.into()),
        }
    }

    /// The order could not be resolved by the order store.
    pub fn not_found(order_id: OrderId) -> Self {
        let message = format!("order {order_id} not found");
        Self::transport_failure(order_id, message)
    }

    /// Returns true when the receiver answered with a 2xx status.
    pub fn is_accepted(&self) -> bool {
        self.status_code.is_some_and(|code| (200..300).contains(&code))
    }

    /// Annotations to persist on the order.
    pub fn annotations(&self) -> Vec<(&'static str, String)> {
        if self.success {
            vec![
                (
                    ANNOTATION_RESPONSE_CODE,
                    self.status_code.map(|c| c.to_string()).unwrap_or_default(),
                ),
                (
                    ANNOTATION_RESPONSE_BODY,
                    self.response_body.clone().unwrap_or_default(),
                ),
            ]
        } else {
            vec![(
                ANNOTATION_ERROR,
                self.error_message.clone().unwrap_or_default(),
            )]
        }
    }

    /// Annotations left over from an earlier outcome of the other kind.
    pub fn stale_annotations(&self) -> &'static [&'static str] {
        if self.success {
            &[ANNOTATION_ERROR]
        } else {
            &[ANNOTATION_RESPONSE_CODE, ANNOTATION_RESPONSE_BODY]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_annotations() {
        let outcome = DeliveryOutcome::completed(1001.into(), 200, r#"{"ok":true}"#);
        let annotations = outcome.annotations();

        assert!(outcome.success);
        assert!(outcome.is_accepted());
        assert_eq!(
            annotations,
            vec![
                (ANNOTATION_RESPONSE_CODE, "200".to_string()),
                (ANNOTATION_RESPONSE_BODY, r#"{"ok":true}"#.to_string()),
            ]
        );
        assert_eq!(outcome.stale_annotations(), &[ANNOTATION_ERROR]);
    }

    #[test]
    fn test_rejected_exchange_is_still_success() {
        let outcome = DeliveryOutcome::completed(7.into(), 503, "unavailable");
        assert!(outcome.success);
        assert!(!outcome.is_accepted());
    }

    #[test]
    fn test_failure_annotations() {
        let outcome = DeliveryOutcome::transport_failure(1002.into(), "Request timed out");

        assert!(!outcome.success);
        assert!(outcome.status_code.is_none());
        assert_eq!(
            outcome.annotations(),
            vec![(ANNOTATION_ERROR, "Request timed out".to_string())]
        );
    }

    #[test]
    fn test_not_found_message() {
        let outcome = DeliveryOutcome::not_found(404.into());
        assert_eq!(outcome.error_message.as_deref(), Some("order 404 not found"));
    }
}
