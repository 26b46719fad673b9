//! Port for roster reads and the two counter side effects this core owns.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Consultant, ConsultantId, Platform};

use super::define_port_error;

define_port_error! {
    /// Errors raised by consultant roster adapters.
    pub enum ConsultantRosterError {
        /// Roster store connection could not be established.
        Connection { message: String } =>
            "consultant roster connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "consultant roster query failed: {message}",
    }
}

/// Port for reading the active roster and recording usage side effects.
///
/// The roster is administered externally; retired consultants are
/// deactivated, never deleted. Selection only ever sees active entries for
/// one platform at a time.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConsultantRoster: Send + Sync {
    /// List active consultants for one platform.
    async fn list_active(&self, platform: &Platform)
    -> Result<Vec<Consultant>, ConsultantRosterError>;

    /// Stamp the consultant's last-used timestamp at issuance.
    ///
    /// Informational only; ordering is driven by daily attribution counts.
    async fn touch_last_used(
        &self,
        id: ConsultantId,
        at: DateTime<Utc>,
    ) -> Result<(), ConsultantRosterError>;

    /// Increment the consultant's lifetime usage counter by one.
    ///
    /// Called exactly once per confirmed reservation, by the confirmation
    /// winner only.
    async fn record_confirmed_use(&self, id: ConsultantId) -> Result<(), ConsultantRosterError>;
}

/// Fixture implementation for tests that do not exercise the roster.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureConsultantRoster;

#[async_trait]
impl ConsultantRoster for FixtureConsultantRoster {
    async fn list_active(
        &self,
        _platform: &Platform,
    ) -> Result<Vec<Consultant>, ConsultantRosterError> {
        Ok(Vec::new())
    }

    async fn touch_last_used(
        &self,
        _id: ConsultantId,
        _at: DateTime<Utc>,
    ) -> Result<(), ConsultantRosterError> {
        Ok(())
    }

    async fn record_confirmed_use(&self, _id: ConsultantId) -> Result<(), ConsultantRosterError> {
        Ok(())
    }
}
