//! Reservation entities: one selection event and its chain of custody.
//!
//! A reservation is created when a consultant (or backup number) is handed
//! to a visitor and finalized exactly once when the visitor confirms the
//! hand-off by presenting the reservation token. Reservations are never
//! deleted here; retention is an external housekeeping concern.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ConsultantId, Platform};

/// Number of random bytes backing a freshly generated token (256 bits).
pub const TOKEN_BYTES: usize = 32;

/// Maximum accepted length for an inbound token string.
///
/// Generated tokens are exactly `2 * TOKEN_BYTES` hex characters; the cap
/// only guards lookups against abusive inputs.
pub const TOKEN_MAX_LEN: usize = 128;

/// Validation errors returned by [`ReservationToken::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenValidationError {
    /// The token was empty after trimming.
    Empty,
    /// The token exceeded [`TOKEN_MAX_LEN`] characters.
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

impl fmt::Display for TokenValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "token must not be empty"),
            Self::TooLong { max } => write!(f, "token must be at most {max} characters"),
        }
    }
}

impl std::error::Error for TokenValidationError {}

/// Opaque, unguessable reservation token.
///
/// Freshly issued tokens carry 256 bits of OS entropy, hex encoded. Inbound
/// tokens are accepted as opaque strings so lookups for historic formats
/// still resolve; unguessability is a property of generation, not parsing.
///
/// # Examples
/// ```
/// use backend::domain::ReservationToken;
///
/// let token = ReservationToken::generate();
/// assert_eq!(token.as_str().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationToken(String);

impl ReservationToken {
    /// Generate a fresh token from OS entropy.
    pub fn generate() -> Self {
        let mut bytes = [0_u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Accept an inbound token string for lookup.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, TokenValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TokenValidationError::Empty);
        }
        if trimmed.chars().count() > TOKEN_MAX_LEN {
            return Err(TokenValidationError::TooLong { max: TOKEN_MAX_LEN });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Access the token string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ReservationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Created and waiting for confirmation.
    Issued,
    /// Confirmed exactly once by the token holder.
    Confirmed,
    /// Marked expired by external housekeeping. Expiry is enforced by
    /// timestamp comparison regardless of whether this state was written.
    Expired,
}

impl ReservationStatus {
    /// Stable storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Issued => "issued",
            Self::Confirmed => "confirmed",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored status string is unknown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reservation status: {value}")]
pub struct UnknownReservationStatus {
    /// The unrecognized stored value.
    pub value: String,
}

impl FromStr for ReservationStatus {
    type Err = UnknownReservationStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "issued" => Ok(Self::Issued),
            "confirmed" => Ok(Self::Confirmed),
            "expired" => Ok(Self::Expired),
            other => Err(UnknownReservationStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// Requester diagnostics captured at issuance. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequesterInfo {
    /// Remote address as reported by the connection or proxy headers.
    pub ip: Option<String>,
    /// Raw `User-Agent` header value.
    pub user_agent: Option<String>,
}

/// Validation errors returned by [`Reservation::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationValidationError {
    /// `expires_at` was not strictly after `issued_at`.
    ExpiryNotAfterIssuance,
    /// The handed-out contact number was empty.
    EmptyContactNumber,
}

impl fmt::Display for ReservationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExpiryNotAfterIssuance => {
                write!(f, "expires_at must be after issued_at")
            }
            Self::EmptyContactNumber => write!(f, "contact number must not be empty"),
        }
    }
}

impl std::error::Error for ReservationValidationError {}

/// Input payload for [`Reservation::new`].
#[derive(Debug, Clone)]
pub struct ReservationDraft {
    pub token: ReservationToken,
    pub platform: Platform,
    pub consultant_id: Option<ConsultantId>,
    pub contact_number: String,
    pub status: ReservationStatus,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub requester: RequesterInfo,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub lead_payload: Option<Value>,
}

/// One selection event, from issuance to confirmed use or expiry.
///
/// `consultant_id` is `None` when the backup-number fallback path issued
/// the reservation; confirmation then skips the usage-counter increment.
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    token: ReservationToken,
    platform: Platform,
    consultant_id: Option<ConsultantId>,
    contact_number: String,
    status: ReservationStatus,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    requester: RequesterInfo,
    confirmed_at: Option<DateTime<Utc>>,
    lead_payload: Option<Value>,
}

impl Reservation {
    /// Creates a validated reservation.
    pub fn new(draft: ReservationDraft) -> Result<Self, ReservationValidationError> {
        if draft.expires_at <= draft.issued_at {
            return Err(ReservationValidationError::ExpiryNotAfterIssuance);
        }
        let contact_number = draft.contact_number.trim().to_owned();
        if contact_number.is_empty() {
            return Err(ReservationValidationError::EmptyContactNumber);
        }
        Ok(Self {
            token: draft.token,
            platform: draft.platform,
            consultant_id: draft.consultant_id,
            contact_number,
            status: draft.status,
            issued_at: draft.issued_at,
            expires_at: draft.expires_at,
            requester: draft.requester,
            confirmed_at: draft.confirmed_at,
            lead_payload: draft.lead_payload,
        })
    }

    /// Returns the reservation token.
    pub fn token(&self) -> &ReservationToken {
        &self.token
    }

    /// Returns the platform this reservation was issued for.
    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Returns the chosen consultant, or `None` on the backup path.
    pub fn consultant_id(&self) -> Option<ConsultantId> {
        self.consultant_id
    }

    /// Returns the contact number handed to the visitor.
    pub fn contact_number(&self) -> &str {
        self.contact_number.as_str()
    }

    /// Returns the lifecycle status as stored.
    pub fn status(&self) -> ReservationStatus {
        self.status
    }

    /// Returns the issuance timestamp.
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Returns the expiry timestamp.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns requester diagnostics captured at issuance.
    pub fn requester(&self) -> &RequesterInfo {
        &self.requester
    }

    /// Returns the confirmation timestamp, when confirmed.
    pub fn confirmed_at(&self) -> Option<DateTime<Utc>> {
        self.confirmed_at
    }

    /// Returns the lead payload captured at confirmation, if any.
    pub fn lead_payload(&self) -> Option<&Value> {
        self.lead_payload.as_ref()
    }

    /// Whether the reservation is past its expiry at `now`.
    ///
    /// Expiry is a timestamp comparison; no stored state transition is
    /// required for a reservation to be dead.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    //! Token generation and reservation invariants.

    use chrono::{Duration, Utc};
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn draft() -> ReservationDraft {
        let issued_at = Utc::now();
        ReservationDraft {
            token: ReservationToken::generate(),
            platform: Platform::new("whatsapp").expect("valid tag"),
            consultant_id: Some(ConsultantId::random()),
            contact_number: "+55 11 91234-5678".to_owned(),
            status: ReservationStatus::Issued,
            issued_at,
            expires_at: issued_at + Duration::minutes(10),
            requester: RequesterInfo::default(),
            confirmed_at: None,
            lead_payload: None,
        }
    }

    #[test]
    fn generated_tokens_are_hex_and_unique() {
        let a = ReservationToken::generate();
        let b = ReservationToken::generate();

        assert_eq!(a.as_str().len(), TOKEN_BYTES * 2);
        assert!(a.as_str().chars().all(|ch| ch.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[rstest]
    #[case("  abc123  ", "abc123")]
    fn parse_trims_input(#[case] input: &str, #[case] expected: &str) {
        let token = ReservationToken::parse(input).expect("valid token");
        assert_eq!(token.as_str(), expected);
    }

    #[test]
    fn parse_rejects_blank() {
        assert_eq!(
            ReservationToken::parse("   "),
            Err(TokenValidationError::Empty)
        );
    }

    #[test]
    fn parse_rejects_overlong() {
        let raw = "a".repeat(TOKEN_MAX_LEN + 1);
        assert_eq!(
            ReservationToken::parse(raw),
            Err(TokenValidationError::TooLong { max: TOKEN_MAX_LEN })
        );
    }

    #[rstest]
    fn accepts_valid_draft(draft: ReservationDraft) {
        let reservation = Reservation::new(draft).expect("valid reservation");
        assert_eq!(reservation.status(), ReservationStatus::Issued);
        assert!(reservation.confirmed_at().is_none());
    }

    #[rstest]
    fn rejects_expiry_before_issuance(mut draft: ReservationDraft) {
        draft.expires_at = draft.issued_at - Duration::seconds(1);
        assert_eq!(
            Reservation::new(draft),
            Err(ReservationValidationError::ExpiryNotAfterIssuance)
        );
    }

    #[rstest]
    fn rejects_blank_contact_number(mut draft: ReservationDraft) {
        draft.contact_number = "  ".to_owned();
        assert_eq!(
            Reservation::new(draft),
            Err(ReservationValidationError::EmptyContactNumber)
        );
    }

    #[rstest]
    fn expiry_is_a_timestamp_comparison(draft: ReservationDraft) {
        let reservation = Reservation::new(draft).expect("valid reservation");

        assert!(!reservation.is_expired_at(reservation.expires_at()));
        assert!(reservation.is_expired_at(reservation.expires_at() + Duration::seconds(1)));
    }

    #[test]
    fn status_round_trips_through_storage_form() {
        for status in [
            ReservationStatus::Issued,
            ReservationStatus::Confirmed,
            ReservationStatus::Expired,
        ] {
            let parsed: ReservationStatus = status.as_str().parse().expect("known status");
            assert_eq!(parsed, status);
        }
        assert!("pending".parse::<ReservationStatus>().is_err());
    }
}
