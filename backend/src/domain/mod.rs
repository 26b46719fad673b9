//! Domain primitives, entities, and services for consultant redirection.
//!
//! Purpose: hold everything transport- and storage-agnostic — the roster
//! and reservation entities with their construction invariants, the
//! selection policy, and the services implementing the driving ports. All
//! I/O happens behind the ports in [`ports`].
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`] — transport-agnostic failure payload.
//! - [`Platform`] — normalized traffic-channel tag.
//! - [`Consultant`] / [`MatchKey`] — roster entry and attribution key.
//! - [`Reservation`] / [`ReservationToken`] — one selection event.
//! - [`RedirectService`] — the command/query service over the ports.

pub mod consultant;
pub mod error;
pub mod platform;
pub mod ports;
pub mod redirect_service;
pub mod reservation;
pub mod selection;

pub use self::consultant::{
    Consultant, ConsultantDraft, ConsultantId, ConsultantValidationError, MatchKey,
};
pub use self::error::{Error, ErrorCode};
pub use self::platform::{PLATFORM_TAG_MAX, Platform, PlatformValidationError};
pub use self::redirect_service::{BackupNumbers, RedirectService, RedirectSettings};
pub use self::reservation::{
    RequesterInfo, Reservation, ReservationDraft, ReservationStatus, ReservationToken,
    ReservationValidationError, TOKEN_BYTES, TOKEN_MAX_LEN, TokenValidationError,
    UnknownReservationStatus,
};
pub use self::selection::{
    BalanceSnapshot, ConsultantLoad, attach_today_counts, balance_snapshot, pick_least_loaded,
};

/// Convenient domain result alias.
///
/// # Examples
/// ```
/// use backend::domain::{ApiResult, Error};
///
/// fn validate(tag: &str) -> ApiResult<()> {
///     if tag.is_empty() {
///         return Err(Error::invalid_request("platform tag must not be empty"));
///     }
///     Ok(())
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
