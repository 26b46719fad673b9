//! Driving port for reservation issuance and confirmation.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{Consultant, Error, Platform, RequesterInfo, ReservationToken};

/// Consultant identity surfaced to callers alongside a reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultantIdentityPayload {
    /// Stable consultant identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// E-mail address, when known.
    pub email: Option<String>,
}

impl From<&Consultant> for ConsultantIdentityPayload {
    fn from(value: &Consultant) -> Self {
        Self {
            id: *value.id().as_uuid(),
            name: value.display_name().to_owned(),
            email: value.email().map(str::to_owned),
        }
    }
}

/// Request to issue a reservation.
///
/// `platform` is already resolved: blank caller input is replaced by the
/// configured default before this port is reached.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueReservationRequest {
    /// Platform to select a consultant for.
    pub platform: Platform,
    /// Requester diagnostics logged with the reservation.
    pub requester: RequesterInfo,
}

/// Response from issuing a reservation.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueReservationResponse {
    /// Contact number to hand to the visitor.
    pub contact_number: String,
    /// Platform the reservation was issued for.
    pub platform: Platform,
    /// Chosen consultant, or `None` when the backup number was used.
    pub consultant: Option<ConsultantIdentityPayload>,
    /// Single-use confirmation token.
    pub token: ReservationToken,
    /// Instant the token stops being confirmable.
    pub expires_at: DateTime<Utc>,
    /// Time-to-live in whole minutes, echoed for link-building callers.
    pub expires_in_minutes: i64,
}

/// Request to confirm a previously issued reservation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmReservationRequest {
    /// Token returned at issuance.
    pub token: ReservationToken,
    /// Contact number the caller received; must match the stored one.
    pub contact_number: String,
    /// Platform the reservation was issued for.
    pub platform: Platform,
    /// Opaque lead data stored verbatim; shape is not validated.
    pub lead_payload: Option<Value>,
}

/// Response from a successful confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmReservationResponse {
    /// Contact number the reservation was issued with.
    pub contact_number: String,
    /// Platform the reservation was issued for.
    pub platform: Platform,
    /// Instant this confirmation was recorded.
    pub confirmed_at: DateTime<Utc>,
}

/// Driving port for the reservation write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RedirectCommand: Send + Sync {
    /// Select a consultant (or fall back to the backup number) and issue a
    /// single-use reservation token for the hand-off.
    ///
    /// Fails with [`crate::domain::ErrorCode::NoConsultantAvailable`] when
    /// the roster is empty for the platform and no backup number is
    /// configured.
    async fn issue_reservation(
        &self,
        request: IssueReservationRequest,
    ) -> Result<IssueReservationResponse, Error>;

    /// Confirm a reservation exactly once.
    ///
    /// Fails with [`crate::domain::ErrorCode::InvalidToken`],
    /// [`crate::domain::ErrorCode::TokenAlreadyUsed`], or
    /// [`crate::domain::ErrorCode::TokenExpired`] depending on the stored
    /// state of the presented token.
    async fn confirm_reservation(
        &self,
        request: ConfirmReservationRequest,
    ) -> Result<ConfirmReservationResponse, Error>;
}

/// Fixture command handing out a canned backup-style reservation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRedirectCommand;

/// Contact number returned by [`FixtureRedirectCommand`].
pub const FIXTURE_CONTACT_NUMBER: &str = "+5500000000000";

#[async_trait]
impl RedirectCommand for FixtureRedirectCommand {
    async fn issue_reservation(
        &self,
        request: IssueReservationRequest,
    ) -> Result<IssueReservationResponse, Error> {
        let now = Utc::now();
        Ok(IssueReservationResponse {
            contact_number: FIXTURE_CONTACT_NUMBER.to_owned(),
            platform: request.platform,
            consultant: None,
            token: ReservationToken::generate(),
            expires_at: now + Duration::minutes(10),
            expires_in_minutes: 10,
        })
    }

    async fn confirm_reservation(
        &self,
        request: ConfirmReservationRequest,
    ) -> Result<ConfirmReservationResponse, Error> {
        Ok(ConfirmReservationResponse {
            contact_number: request.contact_number,
            platform: request.platform,
            confirmed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_issue_returns_backup_shape() {
        let command = FixtureRedirectCommand;
        let platform = Platform::new("whatsapp").expect("valid tag");

        let response = command
            .issue_reservation(IssueReservationRequest {
                platform: platform.clone(),
                requester: RequesterInfo::default(),
            })
            .await
            .expect("fixture issue succeeds");

        assert_eq!(response.platform, platform);
        assert!(response.consultant.is_none());
        assert_eq!(response.contact_number, FIXTURE_CONTACT_NUMBER);
        assert!(response.expires_at > Utc::now());
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_confirm_echoes_request() {
        let command = FixtureRedirectCommand;
        let platform = Platform::new("meta").expect("valid tag");

        let response = command
            .confirm_reservation(ConfirmReservationRequest {
                token: ReservationToken::generate(),
                contact_number: "+5511911112222".to_owned(),
                platform: platform.clone(),
                lead_payload: None,
            })
            .await
            .expect("fixture confirm succeeds");

        assert_eq!(response.platform, platform);
        assert_eq!(response.contact_number, "+5511911112222");
    }
}
