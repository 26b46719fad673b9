//! Port for the append-only reservation log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::{Platform, Reservation, ReservationToken};

use super::define_port_error;

define_port_error! {
    /// Errors raised by reservation log adapters.
    pub enum ReservationLogError {
        /// Log store connection could not be established.
        Connection { message: String } =>
            "reservation log connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "reservation log query failed: {message}",
    }
}

/// Parameters of a single confirmation attempt.
///
/// `now` is injected by the service so the expiry comparison uses the same
/// clock as the rest of the domain.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationConfirmation {
    /// Token presented by the caller.
    pub token: ReservationToken,
    /// Platform the caller claims the reservation was issued for.
    pub platform: Platform,
    /// Contact number the caller claims was handed out.
    pub contact_number: String,
    /// Opaque lead data stored verbatim on success.
    pub lead_payload: Option<Value>,
    /// Attempt timestamp; confirmation fails past the stored expiry.
    pub now: DateTime<Utc>,
}

/// Port for persisting selection events and their single confirmation.
///
/// The log is append-only from this core's perspective: one insert per
/// issuance and at most one successful conditional update per token.
/// Retention of old rows belongs to external housekeeping.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReservationLog: Send + Sync {
    /// Append a freshly issued reservation.
    async fn append(&self, reservation: &Reservation) -> Result<(), ReservationLogError>;

    /// Load a reservation by token, regardless of state.
    async fn find_by_token(
        &self,
        token: &ReservationToken,
    ) -> Result<Option<Reservation>, ReservationLogError>;

    /// Atomically confirm the reservation if it is still confirmable.
    ///
    /// The adapter must express this as ONE conditional write: transition to
    /// confirmed only where the token, platform, and contact number match,
    /// the status is still issued, and the expiry lies in the future.
    /// Returns the confirmed reservation when this attempt won, or `None`
    /// when no row qualified; the caller classifies the `None` case.
    async fn confirm_if_issued(
        &self,
        request: ReservationConfirmation,
    ) -> Result<Option<Reservation>, ReservationLogError>;
}

/// Fixture implementation for tests that never touch the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureReservationLog;

#[async_trait]
impl ReservationLog for FixtureReservationLog {
    async fn append(&self, _reservation: &Reservation) -> Result<(), ReservationLogError> {
        Ok(())
    }

    async fn find_by_token(
        &self,
        _token: &ReservationToken,
    ) -> Result<Option<Reservation>, ReservationLogError> {
        Ok(None)
    }

    async fn confirm_if_issued(
        &self,
        _request: ReservationConfirmation,
    ) -> Result<Option<Reservation>, ReservationLogError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::{Duration, Utc};
    use rstest::rstest;

    use super::*;
    use crate::domain::{ConsultantId, RequesterInfo, ReservationDraft, ReservationStatus};

    fn sample_reservation() -> Reservation {
        let issued_at = Utc::now();
        Reservation::new(ReservationDraft {
            token: ReservationToken::generate(),
            platform: Platform::new("whatsapp").expect("valid tag"),
            consultant_id: Some(ConsultantId::random()),
            contact_number: "+55 11 90000-0000".to_owned(),
            status: ReservationStatus::Issued,
            issued_at,
            expires_at: issued_at + Duration::minutes(10),
            requester: RequesterInfo::default(),
            confirmed_at: None,
            lead_payload: None,
        })
        .expect("valid reservation")
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_append_succeeds() {
        let log = FixtureReservationLog;
        log.append(&sample_reservation())
            .await
            .expect("fixture append succeeds");
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_find_returns_none() {
        let log = FixtureReservationLog;
        let found = log
            .find_by_token(&ReservationToken::generate())
            .await
            .expect("fixture lookup succeeds");
        assert!(found.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_confirm_never_wins() {
        let log = FixtureReservationLog;
        let reservation = sample_reservation();

        let outcome = log
            .confirm_if_issued(ReservationConfirmation {
                token: reservation.token().clone(),
                platform: reservation.platform().clone(),
                contact_number: reservation.contact_number().to_owned(),
                lead_payload: None,
                now: Utc::now(),
            })
            .await
            .expect("fixture confirm succeeds");
        assert!(outcome.is_none());
    }

    #[rstest]
    fn connection_error_formats_message() {
        let err = ReservationLogError::connection("pool exhausted");
        assert!(err.to_string().contains("pool exhausted"));
    }
}
