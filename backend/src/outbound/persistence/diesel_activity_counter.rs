//! PostgreSQL-backed `DailyActivityCounter` implementation using Diesel ORM.
//!
//! Aggregates inbound contact events per attribution key for one calendar
//! day. The stored keys are free text; normalization happens here, after
//! the grouped load, so two raw spellings of the same key fold into one
//! count.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::MatchKey;
use crate::domain::ports::{DailyActivityCount, DailyActivityCounter, DailyActivityError};

use super::diesel_error_mapping::{map_shared_diesel_error, map_shared_pool_error};
use super::pool::{DbPool, PoolError};
use super::schema::inbound_contacts;

/// Diesel-backed implementation of the daily activity counter port.
#[derive(Clone)]
pub struct DieselDailyActivityCounter {
    pool: DbPool,
}

impl DieselDailyActivityCounter {
    /// Create a new counter adapter with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DailyActivityError {
    map_shared_pool_error(error, DailyActivityError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> DailyActivityError {
    map_shared_diesel_error(
        error,
        DailyActivityError::query,
        DailyActivityError::connection,
    )
}

/// Fold grouped raw-key counts into normalized per-key counts.
///
/// Raw keys that normalize to the same [`MatchKey`] are summed; keys that
/// normalize to nothing (all whitespace) are dropped.
fn fold_counts(rows: Vec<(String, i64)>) -> Vec<DailyActivityCount> {
    let mut merged: HashMap<MatchKey, u64> = HashMap::new();
    for (raw_key, count) in rows {
        let key = MatchKey::new(raw_key);
        if key.is_empty() {
            continue;
        }
        let contacts = u64::try_from(count).unwrap_or_default();
        *merged.entry(key).or_insert(0) += contacts;
    }
    merged
        .into_iter()
        .map(|(key, contacts)| DailyActivityCount { key, contacts })
        .collect()
}

#[async_trait]
impl DailyActivityCounter for DieselDailyActivityCounter {
    async fn counts_for_day(
        &self,
        day: NaiveDate,
    ) -> Result<Vec<DailyActivityCount>, DailyActivityError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let window_start = day.and_time(NaiveTime::MIN).and_utc();
        let window_end = window_start + Duration::days(1);

        let rows: Vec<(String, i64)> = inbound_contacts::table
            .filter(
                inbound_contacts::created_at
                    .ge(window_start)
                    .and(inbound_contacts::created_at.lt(window_end)),
            )
            .group_by(inbound_contacts::contact_key)
            .select((inbound_contacts::contact_key, count_star()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(fold_counts(rows))
    }
}

#[cfg(test)]
mod tests {
    //! Normalization folding and error mapping.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(err, DailyActivityError::Connection { .. }));
    }

    #[rstest]
    fn diesel_error_maps_to_query_error() {
        let err = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(err, DailyActivityError::Query { .. }));
    }

    #[test]
    fn folding_merges_keys_that_normalize_together() {
        let rows = vec![
            ("Ana Souza".to_owned(), 2),
            ("  ana souza ".to_owned(), 3),
            ("Bruno".to_owned(), 1),
        ];

        let mut counts = fold_counts(rows);
        counts.sort_by(|a, b| a.key.as_str().cmp(b.key.as_str()));

        assert_eq!(
            counts,
            vec![
                DailyActivityCount {
                    key: MatchKey::new("ana souza"),
                    contacts: 5,
                },
                DailyActivityCount {
                    key: MatchKey::new("bruno"),
                    contacts: 1,
                },
            ]
        );
    }

    #[test]
    fn folding_drops_blank_keys() {
        let rows = vec![("   ".to_owned(), 9), ("carla".to_owned(), 1)];
        let counts = fold_counts(rows);

        assert_eq!(counts.len(), 1);
        assert_eq!(
            counts.as_slice().first().map(|count| count.key.as_str()),
            Some("carla")
        );
    }
}
