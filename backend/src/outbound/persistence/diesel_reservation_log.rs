//! PostgreSQL-backed `ReservationLog` implementation using Diesel ORM.
//!
//! Issuance appends one row; confirmation is a single conditional UPDATE
//! with a RETURNING clause, so the row transition, the expiry check, and
//! the winner decision happen in one statement.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ReservationConfirmation, ReservationLog, ReservationLogError};
use crate::domain::{
    ConsultantId, Platform, RequesterInfo, Reservation, ReservationDraft, ReservationStatus,
    ReservationToken,
};

use super::diesel_error_mapping::{map_shared_diesel_error, map_shared_pool_error};
use super::models::{NewReservationRow, ReservationRow};
use super::pool::{DbPool, PoolError};
use super::schema::redirect_reservations;

/// Diesel-backed implementation of the reservation log port.
#[derive(Clone)]
pub struct DieselReservationLog {
    pool: DbPool,
}

impl DieselReservationLog {
    /// Create a new log adapter with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReservationLogError {
    map_shared_pool_error(error, ReservationLogError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ReservationLogError {
    map_shared_diesel_error(
        error,
        ReservationLogError::query,
        ReservationLogError::connection,
    )
}

/// Convert a database row into a validated domain reservation.
fn row_to_reservation(row: ReservationRow) -> Result<Reservation, ReservationLogError> {
    let ReservationRow {
        token,
        platform,
        consultant_id,
        contact_number,
        status,
        issued_at,
        expires_at,
        requester_ip,
        requester_user_agent,
        confirmed_at,
        lead_payload,
    } = row;

    let token = ReservationToken::parse(token)
        .map_err(|err| ReservationLogError::query(format!("decode token: {err}")))?;
    let platform = Platform::new(platform)
        .map_err(|err| ReservationLogError::query(format!("decode platform: {err}")))?;
    let status: ReservationStatus = status
        .parse()
        .map_err(|err| ReservationLogError::query(format!("decode status: {err}")))?;

    Reservation::new(ReservationDraft {
        token,
        platform,
        consultant_id: consultant_id.map(ConsultantId::from_uuid),
        contact_number,
        status,
        issued_at,
        expires_at,
        requester: RequesterInfo {
            ip: requester_ip,
            user_agent: requester_user_agent,
        },
        confirmed_at,
        lead_payload,
    })
    .map_err(|err| ReservationLogError::query(err.to_string()))
}

#[async_trait]
impl ReservationLog for DieselReservationLog {
    async fn append(&self, reservation: &Reservation) -> Result<(), ReservationLogError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewReservationRow {
            token: reservation.token().as_str(),
            platform: reservation.platform().as_str(),
            consultant_id: reservation.consultant_id().map(|id| *id.as_uuid()),
            contact_number: reservation.contact_number(),
            status: reservation.status().as_str(),
            issued_at: reservation.issued_at(),
            expires_at: reservation.expires_at(),
            requester_ip: reservation.requester().ip.as_deref(),
            requester_user_agent: reservation.requester().user_agent.as_deref(),
        };

        diesel::insert_into(redirect_reservations::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_token(
        &self,
        token: &ReservationToken,
    ) -> Result<Option<Reservation>, ReservationLogError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = redirect_reservations::table
            .filter(redirect_reservations::token.eq(token.as_str()))
            .select(ReservationRow::as_select())
            .first::<ReservationRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_reservation).transpose()
    }

    async fn confirm_if_issued(
        &self,
        request: ReservationConfirmation,
    ) -> Result<Option<Reservation>, ReservationLogError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let target = redirect_reservations::table.filter(
            redirect_reservations::token
                .eq(request.token.as_str())
                .and(redirect_reservations::platform.eq(request.platform.as_str()))
                .and(redirect_reservations::contact_number.eq(request.contact_number.as_str()))
                .and(redirect_reservations::status.eq(ReservationStatus::Issued.as_str()))
                .and(redirect_reservations::expires_at.gt(request.now)),
        );

        let row = diesel::update(target)
            .set((
                redirect_reservations::status.eq(ReservationStatus::Confirmed.as_str()),
                redirect_reservations::confirmed_at.eq(Some(request.now)),
                redirect_reservations::lead_payload.eq(request.lead_payload),
            ))
            .returning(ReservationRow::as_returning())
            .get_result::<ReservationRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_reservation).transpose()
    }
}
