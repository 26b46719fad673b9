//! Redirect domain services.
//!
//! These services implement the redirect driving ports: issuing
//! reservations through the selection policy, confirming them exactly once,
//! and reporting today's balance for operational dashboards. All
//! coordination state lives behind the driven ports; the services hold no
//! mutable state of their own, so concurrent requests need no in-process
//! locking.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use tracing::{debug, warn};

use crate::domain::ports::{
    ConfirmReservationRequest, ConfirmReservationResponse, ConsultantBalancePayload,
    ConsultantIdentityPayload, ConsultantRoster, ConsultantRosterError, DailyActivityCounter,
    DailyActivityError, IssueReservationRequest, IssueReservationResponse, RedirectCommand,
    RedirectQuery, ReservationConfirmation, ReservationLog, ReservationLogError,
    TodayBalanceRequest, TodayBalanceResponse,
};
use crate::domain::selection::{attach_today_counts, balance_snapshot, pick_least_loaded};
use crate::domain::{
    Consultant, Error, MatchKey, Platform, Reservation, ReservationDraft, ReservationStatus,
    ReservationToken,
};

/// Fallback contact numbers used when a platform has no active consultant.
///
/// Lookup prefers the platform-specific entry and falls back to the global
/// default. Both are optional; with neither configured, issuance fails with
/// a no-consultant error instead of inventing a number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackupNumbers {
    default: Option<String>,
    per_platform: HashMap<Platform, String>,
}

impl BackupNumbers {
    /// Build the lookup table from configuration.
    pub fn new(default: Option<String>, per_platform: HashMap<Platform, String>) -> Self {
        Self {
            default,
            per_platform,
        }
    }

    /// Resolve the backup number for a platform, if any is configured.
    pub fn for_platform(&self, platform: &Platform) -> Option<&str> {
        self.per_platform
            .get(platform)
            .or(self.default.as_ref())
            .map(String::as_str)
    }
}

/// Policy knobs for the redirect services.
#[derive(Debug, Clone, PartialEq)]
pub struct RedirectSettings {
    ttl_minutes: i64,
    backups: BackupNumbers,
}

impl RedirectSettings {
    /// Create settings with the reservation time-to-live in minutes.
    pub fn new(ttl_minutes: i64, backups: BackupNumbers) -> Self {
        Self {
            ttl_minutes,
            backups,
        }
    }

    /// Reservation time-to-live in whole minutes.
    pub fn ttl_minutes(&self) -> i64 {
        self.ttl_minutes
    }

    /// Reservation time-to-live as a duration.
    pub fn ttl(&self) -> Duration {
        Duration::minutes(self.ttl_minutes)
    }

    /// Configured backup numbers.
    pub fn backups(&self) -> &BackupNumbers {
        &self.backups
    }
}

fn map_roster_error(error: ConsultantRosterError) -> Error {
    match error {
        ConsultantRosterError::Connection { message } => {
            Error::service_unavailable(format!("consultant roster unavailable: {message}"))
        }
        ConsultantRosterError::Query { message } => {
            Error::internal(format!("consultant roster error: {message}"))
        }
    }
}

fn map_activity_error(error: DailyActivityError) -> Error {
    match error {
        DailyActivityError::Connection { message } => {
            Error::service_unavailable(format!("activity store unavailable: {message}"))
        }
        DailyActivityError::Query { message } => {
            Error::internal(format!("activity count error: {message}"))
        }
    }
}

fn map_log_error(error: ReservationLogError) -> Error {
    match error {
        ReservationLogError::Connection { message } => {
            Error::service_unavailable(format!("reservation log unavailable: {message}"))
        }
        ReservationLogError::Query { message } => {
            Error::internal(format!("reservation log error: {message}"))
        }
    }
}

/// Redirect service implementing the command and query driving ports.
#[derive(Clone)]
pub struct RedirectService<R, A, L> {
    roster: Arc<R>,
    activity: Arc<A>,
    log: Arc<L>,
    clock: Arc<dyn Clock>,
    settings: RedirectSettings,
}

impl<R, A, L> RedirectService<R, A, L> {
    /// Create a new service over the driven ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::domain::ports::{
    ///     FixtureConsultantRoster, FixtureDailyActivityCounter, FixtureReservationLog,
    /// };
    /// use backend::domain::{BackupNumbers, RedirectService, RedirectSettings};
    /// use mockable::DefaultClock;
    ///
    /// let service = RedirectService::new(
    ///     Arc::new(FixtureConsultantRoster),
    ///     Arc::new(FixtureDailyActivityCounter),
    ///     Arc::new(FixtureReservationLog),
    ///     Arc::new(DefaultClock),
    ///     RedirectSettings::new(10, BackupNumbers::default()),
    /// );
    /// let _ = service;
    /// ```
    pub fn new(
        roster: Arc<R>,
        activity: Arc<A>,
        log: Arc<L>,
        clock: Arc<dyn Clock>,
        settings: RedirectSettings,
    ) -> Self {
        Self {
            roster,
            activity,
            log,
            clock,
            settings,
        }
    }
}

impl<R, A, L> RedirectService<R, A, L>
where
    R: ConsultantRoster,
    A: DailyActivityCounter,
    L: ReservationLog,
{
    /// Load the active roster joined with today's attribution counts.
    async fn loaded_roster(
        &self,
        platform: &Platform,
    ) -> Result<Vec<crate::domain::selection::ConsultantLoad>, Error> {
        let consultants = self
            .roster
            .list_active(platform)
            .await
            .map_err(map_roster_error)?;

        let today = self.clock.utc().date_naive();
        let counts = self
            .activity
            .counts_for_day(today)
            .await
            .map_err(map_activity_error)?;

        let lookup: HashMap<MatchKey, u64> = counts
            .into_iter()
            .map(|count| (count.key, count.contacts))
            .collect();

        Ok(attach_today_counts(consultants, &lookup))
    }

    async fn issue_for_consultant(
        &self,
        request: &IssueReservationRequest,
        consultant: Consultant,
    ) -> Result<IssueReservationResponse, Error> {
        let now = self.clock.utc();
        let token = ReservationToken::generate();
        let expires_at = now + self.settings.ttl();

        let reservation = Reservation::new(ReservationDraft {
            token: token.clone(),
            platform: request.platform.clone(),
            consultant_id: Some(consultant.id()),
            contact_number: consultant.contact_number().to_owned(),
            status: ReservationStatus::Issued,
            issued_at: now,
            expires_at,
            requester: request.requester.clone(),
            confirmed_at: None,
            lead_payload: None,
        })
        .map_err(|err| Error::internal(format!("invalid reservation: {err}")))?;

        self.log.append(&reservation).await.map_err(map_log_error)?;
        self.roster
            .touch_last_used(consultant.id(), now)
            .await
            .map_err(map_roster_error)?;

        debug!(
            platform = %request.platform,
            consultant = %consultant.id(),
            "reservation issued"
        );

        Ok(IssueReservationResponse {
            contact_number: consultant.contact_number().to_owned(),
            platform: request.platform.clone(),
            consultant: Some(ConsultantIdentityPayload::from(&consultant)),
            token,
            expires_at,
            expires_in_minutes: self.settings.ttl_minutes(),
        })
    }

    async fn issue_for_backup(
        &self,
        request: &IssueReservationRequest,
        backup_number: &str,
    ) -> Result<IssueReservationResponse, Error> {
        let now = self.clock.utc();
        let token = ReservationToken::generate();
        let expires_at = now + self.settings.ttl();

        let reservation = Reservation::new(ReservationDraft {
            token: token.clone(),
            platform: request.platform.clone(),
            consultant_id: None,
            contact_number: backup_number.to_owned(),
            status: ReservationStatus::Issued,
            issued_at: now,
            expires_at,
            requester: request.requester.clone(),
            confirmed_at: None,
            lead_payload: None,
        })
        .map_err(|err| Error::internal(format!("invalid backup reservation: {err}")))?;

        self.log.append(&reservation).await.map_err(map_log_error)?;

        warn!(
            platform = %request.platform,
            "no active consultant; issued backup number"
        );

        Ok(IssueReservationResponse {
            contact_number: backup_number.to_owned(),
            platform: request.platform.clone(),
            consultant: None,
            token,
            expires_at,
            expires_in_minutes: self.settings.ttl_minutes(),
        })
    }

    /// Classify a confirmation attempt the conditional update rejected.
    async fn classify_rejected_confirmation(
        &self,
        request: &ConfirmReservationRequest,
    ) -> Result<Error, Error> {
        let stored = self
            .log
            .find_by_token(&request.token)
            .await
            .map_err(map_log_error)?;

        let Some(reservation) = stored else {
            return Ok(Error::invalid_token("token not found"));
        };

        if reservation.platform() != &request.platform
            || reservation.contact_number() != request.contact_number.trim()
        {
            return Ok(Error::invalid_token(
                "token does not match the given platform and number",
            ));
        }
        if reservation.status() == ReservationStatus::Confirmed {
            return Ok(Error::token_already_used("token was already confirmed"));
        }
        if reservation.status() == ReservationStatus::Expired
            || reservation.is_expired_at(self.clock.utc())
        {
            return Ok(Error::token_expired("token has expired"));
        }

        // The row was issued, unexpired, and matching, yet the conditional
        // update saw nothing: a concurrent confirmation won in between.
        Ok(Error::token_already_used("token was already confirmed"))
    }
}

#[async_trait]
impl<R, A, L> RedirectCommand for RedirectService<R, A, L>
where
    R: ConsultantRoster,
    A: DailyActivityCounter,
    L: ReservationLog,
{
    async fn issue_reservation(
        &self,
        request: IssueReservationRequest,
    ) -> Result<IssueReservationResponse, Error> {
        let loads = self.loaded_roster(&request.platform).await?;

        let chosen = {
            let mut rng = rand::thread_rng();
            pick_least_loaded(&loads, &mut rng).map(|load| load.consultant.clone())
        };

        match chosen {
            Some(consultant) => self.issue_for_consultant(&request, consultant).await,
            None => match self.settings.backups().for_platform(&request.platform) {
                Some(backup_number) => {
                    let backup_number = backup_number.to_owned();
                    self.issue_for_backup(&request, &backup_number).await
                }
                None => Err(Error::no_consultant_available(format!(
                    "no consultant available for platform {}",
                    request.platform
                ))),
            },
        }
    }

    async fn confirm_reservation(
        &self,
        request: ConfirmReservationRequest,
    ) -> Result<ConfirmReservationResponse, Error> {
        let now = self.clock.utc();
        let confirmed = self
            .log
            .confirm_if_issued(ReservationConfirmation {
                token: request.token.clone(),
                platform: request.platform.clone(),
                contact_number: request.contact_number.trim().to_owned(),
                lead_payload: request.lead_payload.clone(),
                now,
            })
            .await
            .map_err(map_log_error)?;

        let Some(reservation) = confirmed else {
            return Err(self.classify_rejected_confirmation(&request).await?);
        };

        if let Some(consultant_id) = reservation.consultant_id() {
            self.roster
                .record_confirmed_use(consultant_id)
                .await
                .map_err(map_roster_error)?;
        }

        debug!(
            platform = %request.platform,
            consultant = ?reservation.consultant_id(),
            "reservation confirmed"
        );

        Ok(ConfirmReservationResponse {
            contact_number: reservation.contact_number().to_owned(),
            platform: request.platform,
            confirmed_at: reservation.confirmed_at().unwrap_or(now),
        })
    }
}

#[async_trait]
impl<R, A, L> RedirectQuery for RedirectService<R, A, L>
where
    R: ConsultantRoster,
    A: DailyActivityCounter,
    L: ReservationLog,
{
    async fn today_balance(
        &self,
        request: TodayBalanceRequest,
    ) -> Result<TodayBalanceResponse, Error> {
        let loads = self.loaded_roster(&request.platform).await?;
        let snapshot = balance_snapshot(&loads);

        let consultants = loads
            .iter()
            .map(|load| ConsultantBalancePayload {
                id: *load.consultant.id().as_uuid(),
                name: load.consultant.display_name().to_owned(),
                contact_number: load.consultant.contact_number().to_owned(),
                today: load.today,
            })
            .collect();

        let (min, max, spread) = snapshot
            .map(|figures| (figures.min, figures.max, figures.spread))
            .unwrap_or((0, 0, 0));

        Ok(TodayBalanceResponse {
            platform: request.platform,
            consultants,
            min,
            max,
            spread,
        })
    }
}

#[cfg(test)]
#[path = "redirect_service_tests.rs"]
mod tests;
