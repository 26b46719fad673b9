//! Driving port for fairness introspection.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Error, Platform};

/// Request for today's balance figures on one platform.
#[derive(Debug, Clone, PartialEq)]
pub struct TodayBalanceRequest {
    /// Platform whose roster should be reported.
    pub platform: Platform,
}

/// Per-consultant balance entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultantBalancePayload {
    /// Stable consultant identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Contact number handed out for this consultant.
    pub contact_number: String,
    /// Contacts attributed to this consultant today.
    pub today: u64,
}

/// Aggregated balance report for one platform.
///
/// Recomputes today's counts exactly as selection does, so operational
/// dashboards observe the same numbers the policy acts on.
#[derive(Debug, Clone, PartialEq)]
pub struct TodayBalanceResponse {
    /// Platform the report covers.
    pub platform: Platform,
    /// Active consultants with their counts, roster order.
    pub consultants: Vec<ConsultantBalancePayload>,
    /// Lowest per-consultant count today (zero for an empty roster).
    pub min: u64,
    /// Highest per-consultant count today (zero for an empty roster).
    pub max: u64,
    /// `max - min`; the fairness policy keeps this at most one.
    pub spread: u64,
}

/// Driving port for the read-only balance report.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RedirectQuery: Send + Sync {
    /// Report today's per-consultant counts and their spread.
    ///
    /// Read-only: no side effects, and no failure modes beyond platform
    /// validation and store errors.
    async fn today_balance(
        &self,
        request: TodayBalanceRequest,
    ) -> Result<TodayBalanceResponse, Error>;
}

/// Fixture query reporting an empty roster.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRedirectQuery;

#[async_trait]
impl RedirectQuery for FixtureRedirectQuery {
    async fn today_balance(
        &self,
        request: TodayBalanceRequest,
    ) -> Result<TodayBalanceResponse, Error> {
        Ok(TodayBalanceResponse {
            platform: request.platform,
            consultants: Vec::new(),
            min: 0,
            max: 0,
            spread: 0,
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
    async fn fixture_reports_empty_roster() {
        let query = FixtureRedirectQuery;
        let platform = Platform::new("google").expect("valid tag");

        let response = query
            .today_balance(TodayBalanceRequest {
                platform: platform.clone(),
            })
            .await
            .expect("fixture balance succeeds");

        assert_eq!(response.platform, platform);
        assert!(response.consultants.is_empty());
        assert_eq!((response.min, response.max, response.spread), (0, 0, 0));
    }
}
