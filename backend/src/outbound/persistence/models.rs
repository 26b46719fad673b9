//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{consultants, redirect_reservations};

/// Row struct for reading from the consultants table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = consultants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ConsultantRow {
    pub id: Uuid,
    pub platform: String,
    pub display_name: String,
    pub email: Option<String>,
    pub contact_number: String,
    pub match_key: String,
    pub active: bool,
    pub lifetime_uses: i64,
    pub last_used_at: Option<DateTime<Utc>>,
    #[expect(dead_code, reason = "schema field owned by the admin system")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field owned by the admin system")]
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the redirect_reservations table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = redirect_reservations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReservationRow {
    pub token: String,
    pub platform: String,
    pub consultant_id: Option<Uuid>,
    pub contact_number: String,
    pub status: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub requester_ip: Option<String>,
    pub requester_user_agent: Option<String>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub lead_payload: Option<serde_json::Value>,
}

/// Insertable struct for appending reservation rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = redirect_reservations)]
pub(crate) struct NewReservationRow<'a> {
    pub token: &'a str,
    pub platform: &'a str,
    pub consultant_id: Option<Uuid>,
    pub contact_number: &'a str,
    pub status: &'a str,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub requester_ip: Option<&'a str>,
    pub requester_user_agent: Option<&'a str>,
}
