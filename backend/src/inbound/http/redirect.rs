//! Redirect HTTP handlers.
//!
//! ```text
//! GET  /next-redirect?platform=<tag>
//! POST /confirm-redirect
//! GET  /redirect-stats?platform=<tag>
//! ```
//!
//! Wire field names (`numero`, `plataforma`, `consultor`, ...) are the
//! external contract consumed by the landing pages and the admin dashboard;
//! they must not be renamed.

use actix_web::http::header;
use actix_web::{HttpRequest, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::RequesterInfo;
use crate::domain::ports::{
    ConfirmReservationRequest, ConfirmReservationResponse, ConsultantIdentityPayload,
    IssueReservationRequest, IssueReservationResponse, TodayBalanceRequest, TodayBalanceResponse,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_token, require_non_empty, resolve_platform,
};

/// Query parameters for the issue and stats endpoints.
#[derive(Debug, Deserialize)]
pub struct PlatformQuery {
    /// Platform tag; the configured default applies when absent or blank.
    pub platform: Option<String>,
}

/// Consultant identity returned alongside a reservation.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConsultorBody {
    /// Stable consultant identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// E-mail address, when known.
    pub email: Option<String>,
}

impl From<ConsultantIdentityPayload> for ConsultorBody {
    fn from(value: ConsultantIdentityPayload) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
        }
    }
}

/// Reservation data handed to the caller for link construction.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NextRedirectData {
    /// Contact number to route the visitor to.
    pub numero: String,
    /// Platform the reservation was issued for.
    pub plataforma: String,
    /// Chosen consultant, or `null` when the backup number was used.
    pub consultor: Option<ConsultorBody>,
    /// Single-use confirmation token.
    pub token: String,
    /// RFC 3339 instant the token stops being confirmable.
    #[schema(format = "date-time")]
    pub expires_at: String,
    /// Time-to-live in whole minutes.
    pub expires_in_minutes: i64,
}

/// Response payload for reservation issuance.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NextRedirectResponseBody {
    /// Always `true` on success.
    pub success: bool,
    /// Reservation data.
    pub data: NextRedirectData,
}

impl From<IssueReservationResponse> for NextRedirectResponseBody {
    fn from(value: IssueReservationResponse) -> Self {
        Self {
            success: true,
            data: NextRedirectData {
                numero: value.contact_number,
                plataforma: value.platform.to_string(),
                consultor: value.consultant.map(ConsultorBody::from),
                token: value.token.as_str().to_owned(),
                expires_at: value.expires_at.to_rfc3339(),
                expires_in_minutes: value.expires_in_minutes,
            },
        }
    }
}

/// Request payload for reservation confirmation.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ConfirmRedirectRequestBody {
    /// Token returned at issuance.
    pub token: Option<String>,
    /// Contact number the caller received.
    pub numero: Option<String>,
    /// Platform tag; the configured default applies when absent or blank.
    pub plataforma: Option<String>,
    /// Opaque lead data stored verbatim with the reservation.
    #[schema(value_type = Option<Object>)]
    pub lead_data: Option<Value>,
}

/// Confirmed hand-off data.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConfirmRedirectData {
    /// Contact number the reservation was issued with.
    pub numero: String,
    /// Platform the reservation was issued for.
    pub plataforma: String,
    /// RFC 3339 instant the confirmation was recorded.
    #[schema(format = "date-time")]
    pub confirmed_at: String,
}

/// Response payload for reservation confirmation.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConfirmRedirectResponseBody {
    /// Always `true` on success.
    pub success: bool,
    /// Human-readable confirmation notice.
    pub message: String,
    /// Confirmed hand-off data.
    pub data: ConfirmRedirectData,
}

impl From<ConfirmReservationResponse> for ConfirmRedirectResponseBody {
    fn from(value: ConfirmReservationResponse) -> Self {
        Self {
            success: true,
            message: "redirect confirmed".to_owned(),
            data: ConfirmRedirectData {
                numero: value.contact_number,
                plataforma: value.platform.to_string(),
                confirmed_at: value.confirmed_at.to_rfc3339(),
            },
        }
    }
}

/// Per-consultant entry in the fairness report.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConsultorBalanceBody {
    /// Stable consultant identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Contact number handed out for this consultant.
    pub numero: String,
    /// Contacts attributed to this consultant today.
    pub hoje: u64,
}

/// Fairness report data.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RedirectStatsData {
    /// Platform the report covers.
    pub plataforma: String,
    /// Active consultants with today's counts.
    pub consultores: Vec<ConsultorBalanceBody>,
    /// Lowest per-consultant count today.
    pub hoje_min: u64,
    /// Highest per-consultant count today.
    pub hoje_max: u64,
    /// Difference between highest and lowest count.
    pub diferenca: u64,
}

/// Response payload for the fairness report.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RedirectStatsResponseBody {
    /// Always `true` on success.
    pub success: bool,
    /// Fairness report data.
    pub data: RedirectStatsData,
}

impl From<TodayBalanceResponse> for RedirectStatsResponseBody {
    fn from(value: TodayBalanceResponse) -> Self {
        Self {
            success: true,
            data: RedirectStatsData {
                plataforma: value.platform.to_string(),
                consultores: value
                    .consultants
                    .into_iter()
                    .map(|entry| ConsultorBalanceBody {
                        id: entry.id,
                        name: entry.name,
                        numero: entry.contact_number,
                        hoje: entry.today,
                    })
                    .collect(),
                hoje_min: value.min,
                hoje_max: value.max,
                diferenca: value.spread,
            },
        }
    }
}

fn requester_info(req: &HttpRequest) -> RequesterInfo {
    RequesterInfo {
        ip: req
            .connection_info()
            .realip_remote_addr()
            .map(str::to_owned),
        user_agent: req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
    }
}

/// Issue a reservation: pick a consultant and hand out a single-use token.
#[utoipa::path(
    get,
    path = "/next-redirect",
    params(
        ("platform" = Option<String>, Query, description = "Platform tag; defaults when absent")
    ),
    responses(
        (status = 200, description = "Reservation issued", body = NextRedirectResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "No consultant or backup available", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["redirect"],
    operation_id = "nextRedirect"
)]
#[get("/next-redirect")]
pub async fn next_redirect(
    state: web::Data<HttpState>,
    query: web::Query<PlatformQuery>,
    req: HttpRequest,
) -> ApiResult<web::Json<NextRedirectResponseBody>> {
    let platform = resolve_platform(
        query.platform.as_deref(),
        &state.default_platform,
        FieldName::new("platform"),
    )?;

    let response = state
        .redirect
        .issue_reservation(IssueReservationRequest {
            platform,
            requester: requester_info(&req),
        })
        .await?;

    Ok(web::Json(NextRedirectResponseBody::from(response)))
}

/// Confirm a reservation exactly once, attaching optional lead data.
#[utoipa::path(
    post,
    path = "/confirm-redirect",
    request_body = ConfirmRedirectRequestBody,
    responses(
        (status = 200, description = "Reservation confirmed", body = ConfirmRedirectResponseBody),
        (status = 400, description = "Invalid request or expired token", body = ErrorSchema),
        (status = 404, description = "Unknown token", body = ErrorSchema),
        (status = 409, description = "Token already used", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["redirect"],
    operation_id = "confirmRedirect"
)]
#[post("/confirm-redirect")]
pub async fn confirm_redirect(
    state: web::Data<HttpState>,
    payload: web::Json<ConfirmRedirectRequestBody>,
) -> ApiResult<web::Json<ConfirmRedirectResponseBody>> {
    let body = payload.into_inner();

    let raw_token = body
        .token
        .ok_or_else(|| missing_field_error(FieldName::new("token")))?;
    let token = parse_token(&raw_token, FieldName::new("token"))?;

    let raw_numero = body
        .numero
        .ok_or_else(|| missing_field_error(FieldName::new("numero")))?;
    let contact_number = require_non_empty(&raw_numero, FieldName::new("numero"))?;

    let platform = resolve_platform(
        body.plataforma.as_deref(),
        &state.default_platform,
        FieldName::new("plataforma"),
    )?;

    let response = state
        .redirect
        .confirm_reservation(ConfirmReservationRequest {
            token,
            contact_number,
            platform,
            lead_payload: body.lead_data,
        })
        .await?;

    Ok(web::Json(ConfirmRedirectResponseBody::from(response)))
}

/// Report today's per-consultant counts and their spread.
#[utoipa::path(
    get,
    path = "/redirect-stats",
    params(
        ("platform" = Option<String>, Query, description = "Platform tag; defaults when absent")
    ),
    responses(
        (status = 200, description = "Fairness report", body = RedirectStatsResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["redirect"],
    operation_id = "redirectStats"
)]
#[get("/redirect-stats")]
pub async fn redirect_stats(
    state: web::Data<HttpState>,
    query: web::Query<PlatformQuery>,
) -> ApiResult<web::Json<RedirectStatsResponseBody>> {
    let platform = resolve_platform(
        query.platform.as_deref(),
        &state.default_platform,
        FieldName::new("platform"),
    )?;

    let response = state
        .balance
        .today_balance(TodayBalanceRequest { platform })
        .await?;

    Ok(web::Json(RedirectStatsResponseBody::from(response)))
}

#[cfg(test)]
#[path = "redirect_tests.rs"]
mod tests;
