//! Port for the daily inbound-contact attribution aggregate.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::MatchKey;

use super::define_port_error;

define_port_error! {
    /// Errors raised by daily activity counter adapters.
    pub enum DailyActivityError {
        /// Attribution store connection could not be established.
        Connection { message: String } =>
            "activity store connection failed: {message}",
        /// Aggregate query failed during execution.
        Query { message: String } =>
            "activity count query failed: {message}",
    }
}

/// Attribution count for one normalized matching key on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyActivityCount {
    /// Normalized matching key the contacts were attributed to.
    pub key: MatchKey,
    /// Number of inbound contacts recorded for that key on the day.
    pub contacts: u64,
}

/// Port for counting inbound contacts per matching key on one day.
///
/// The underlying records are free-text keyed; adapters must normalize
/// (trim + lowercase) before aggregating so the counts join cleanly against
/// [`MatchKey`]s from the roster. The aggregate is derived, never cached:
/// it reflects the store's data at request time.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DailyActivityCounter: Send + Sync {
    /// Count contacts per normalized key for the given calendar day.
    async fn counts_for_day(
        &self,
        day: NaiveDate,
    ) -> Result<Vec<DailyActivityCount>, DailyActivityError>;
}

/// Fixture implementation reporting no activity.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDailyActivityCounter;

#[async_trait]
impl DailyActivityCounter for FixtureDailyActivityCounter {
    async fn counts_for_day(
        &self,
        _day: NaiveDate,
    ) -> Result<Vec<DailyActivityCount>, DailyActivityError> {
        Ok(Vec::new())
    }
}
