//! Failure classification.
//!
//! # Responsibilities
//! - Map a raw driver error number to Transient or Fatal
//!
//! # Design Decisions
//! - The whole MySQL client error range [2000, 2999] is transient: those
//!   codes (host unreachable, timeout, TLS failure, connection reset) are
//!   plausibly caused by the server being briefly unavailable during a
//!   failover or a network blip
//! - Everything else is fatal: authentication, permission, unknown
//!   database and similar operator-configuration errors must never feed
//!   the retry counter or trigger a failover storm

/// Lowest MySQL client error number.
const CLIENT_ERROR_MIN: u16 = 2000;
/// Highest MySQL client error number.
const CLIENT_ERROR_MAX: u16 = 2999;

/// How a failed probe should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Retryable, counts toward the escalation bound.
    Transient,
    /// Never retried; aborts the tick without touching health state.
    Fatal,
}

/// Classify a driver error number.
pub fn classify(code: u16) -> FailureClass {
    if (CLIENT_ERROR_MIN..=CLIENT_ERROR_MAX).contains(&code) {
        FailureClass::Transient
    } else {
        FailureClass::Fatal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_range_is_transient() {
        assert_eq!(classify(2000), FailureClass::Transient);
        assert_eq!(classify(2003), FailureClass::Transient);
        assert_eq!(classify(2999), FailureClass::Transient);
    }

    #[test]
    fn band_edges_are_exclusive() {
        assert_eq!(classify(1999), FailureClass::Fatal);
        assert_eq!(classify(3000), FailureClass::Fatal);
    }

    #[test]
    fn server_errors_are_fatal() {
        // ER_ACCESS_DENIED_ERROR
        assert_eq!(classify(1045), FailureClass::Fatal);
        // ER_BAD_DB_ERROR
        assert_eq!(classify(1049), FailureClass::Fatal);
        // ER_DBACCESS_DENIED_ERROR
        assert_eq!(classify(1044), FailureClass::Fatal);
    }
}
