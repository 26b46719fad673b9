//! PostgreSQL-backed `ConsultantRoster` implementation using Diesel ORM.
//!
//! Reads the active roster through validated domain constructors and
//! performs the two single-row counter writes this core owns.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ConsultantRoster, ConsultantRosterError};
use crate::domain::{Consultant, ConsultantDraft, ConsultantId, MatchKey, Platform};

use super::diesel_error_mapping::{map_shared_diesel_error, map_shared_pool_error};
use super::models::ConsultantRow;
use super::pool::{DbPool, PoolError};
use super::schema::consultants;

/// Diesel-backed implementation of the consultant roster port.
#[derive(Clone)]
pub struct DieselConsultantRoster {
    pool: DbPool,
}

impl DieselConsultantRoster {
    /// Create a new roster adapter with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ConsultantRosterError {
    map_shared_pool_error(error, ConsultantRosterError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ConsultantRosterError {
    map_shared_diesel_error(
        error,
        ConsultantRosterError::query,
        ConsultantRosterError::connection,
    )
}

/// Convert a database row into a validated domain consultant.
fn row_to_consultant(row: ConsultantRow) -> Result<Consultant, ConsultantRosterError> {
    let ConsultantRow {
        id,
        platform,
        display_name,
        email,
        contact_number,
        match_key,
        active,
        lifetime_uses,
        last_used_at,
        created_at: _,
        updated_at: _,
    } = row;

    let platform = Platform::new(platform)
        .map_err(|err| ConsultantRosterError::query(format!("decode platform: {err}")))?;

    Consultant::new(ConsultantDraft {
        id: ConsultantId::from_uuid(id),
        platform,
        display_name,
        email,
        contact_number,
        match_key: MatchKey::new(match_key),
        active,
        lifetime_uses,
        last_used_at,
    })
    .map_err(|err| ConsultantRosterError::query(err.to_string()))
}

#[async_trait]
impl ConsultantRoster for DieselConsultantRoster {
    async fn list_active(
        &self,
        platform: &Platform,
    ) -> Result<Vec<Consultant>, ConsultantRosterError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ConsultantRow> = consultants::table
            .filter(
                consultants::platform
                    .eq(platform.as_str())
                    .and(consultants::active.eq(true)),
            )
            .order(consultants::display_name.asc())
            .select(ConsultantRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_consultant).collect()
    }

    async fn touch_last_used(
        &self,
        id: ConsultantId,
        at: DateTime<Utc>,
    ) -> Result<(), ConsultantRosterError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(consultants::table.filter(consultants::id.eq(id.as_uuid())))
            .set(consultants::last_used_at.eq(Some(at)))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn record_confirmed_use(&self, id: ConsultantId) -> Result<(), ConsultantRosterError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(consultants::table.filter(consultants::id.eq(id.as_uuid())))
            .set(consultants::lifetime_uses.eq(consultants::lifetime_uses + 1))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
