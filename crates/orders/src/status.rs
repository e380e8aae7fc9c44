//! Order status values.
//!
//! Status is free text. These are the values the service itself writes or reacts
//! to; anything else is stored as given.

pub const PENDING: &str = "PENDING";
pub const SHIPPED: &str = "SHIPPED";
pub const DELIVERED: &str = "DELIVERED";
pub const CANCELLED: &str = "CANCELLED";

/// Lifecycle event implied by a status change, beyond `OrderStatusUpdated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleTransition {
    Shipped,
    Delivered,
    Cancelled,
    /// No dedicated event.
    Other,
}

impl LifecycleTransition {
    /// Classify a new status, ignoring ASCII case. Surrounding whitespace is significant.
    pub fn classify(status: &str) -> Self {
        if status.eq_ignore_ascii_case(SHIPPED) {
            Self::Shipped
        } else if status.eq_ignore_ascii_case(DELIVERED) {
            Self::Delivered
        } else if status.eq_ignore_ascii_case(CANCELLED) {
            Self::Cancelled
        } else {
            Self::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_ignores_case() {
        assert_eq!(LifecycleTransition::classify("shipped"), LifecycleTransition::Shipped);
        assert_eq!(LifecycleTransition::classify("Delivered"), LifecycleTransition::Delivered);
        assert_eq!(LifecycleTransition::classify("CANCELLED"), LifecycleTransition::Cancelled);
    }

    #[test]
    fn unknown_statuses_are_other() {
        assert_eq!(LifecycleTransition::classify(PENDING), LifecycleTransition::Other);
        assert_eq!(LifecycleTransition::classify("PROCESSING"), LifecycleTransition::Other);
        assert_eq!(LifecycleTransition::classify(" shipped"), LifecycleTransition::Other);
        assert_eq!(LifecycleTransition::classify("canceled"), LifecycleTransition::Other);
    }
}
