//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database exactly; the tables are owned
//! by the surrounding admin system and migrated there. They are used by
//! Diesel for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Consultant roster, administered by the back-office UI.
    ///
    /// A partial unique index on `(platform, contact_number) WHERE active`
    /// guarantees no two active consultants on one platform share a number.
    /// Retired consultants are deactivated, never deleted.
    consultants (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Channel tag the consultant serves ("whatsapp", "google", ...).
        platform -> Varchar,
        /// Human-readable display name.
        display_name -> Varchar,
        /// Contact e-mail, when known.
        email -> Nullable<Varchar>,
        /// Phone number handed to redirected visitors.
        contact_number -> Varchar,
        /// Free-text key correlating with inbound contact attribution.
        match_key -> Varchar,
        /// Whether the consultant currently receives traffic.
        active -> Bool,
        /// Confirmed hand-offs over the consultant's lifetime.
        lifetime_uses -> Int8,
        /// Most recent issuance touching this consultant.
        last_used_at -> Nullable<Timestamptz>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only log of selection events.
    ///
    /// Rows are inserted at issuance and conditionally updated exactly once
    /// at confirmation. Retention of old rows is external housekeeping.
    redirect_reservations (token) {
        /// Primary key: opaque hex token handed to the visitor.
        token -> Varchar,
        /// Channel tag the reservation was issued for.
        platform -> Varchar,
        /// Chosen consultant; null when the backup number was used.
        consultant_id -> Nullable<Uuid>,
        /// Phone number handed out with this reservation.
        contact_number -> Varchar,
        /// Lifecycle status: issued, confirmed, or expired.
        status -> Varchar,
        /// Issuance timestamp.
        issued_at -> Timestamptz,
        /// Expiry timestamp; confirmation past this instant fails.
        expires_at -> Timestamptz,
        /// Requester IP captured at issuance, diagnostic only.
        requester_ip -> Nullable<Varchar>,
        /// Requester user agent captured at issuance, diagnostic only.
        requester_user_agent -> Nullable<Varchar>,
        /// Confirmation timestamp, set by the single winning update.
        confirmed_at -> Nullable<Timestamptz>,
        /// Caller-supplied lead data stored verbatim at confirmation.
        lead_payload -> Nullable<Jsonb>,
    }
}

diesel::table! {
    /// Inbound contact events, written by the lead-ingestion system.
    ///
    /// This core only aggregates the table: contacts per normalized
    /// attribution key per calendar day.
    inbound_contacts (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Free-text attribution key, loosely matching `consultants.match_key`.
        contact_key -> Varchar,
        /// Instant the contact was recorded.
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(consultants, redirect_reservations, inbound_contacts);
