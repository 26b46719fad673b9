//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: the redirect endpoints and the health probes
//! - **Schemas**: the success envelopes and the [`ErrorSchema`] failure
//!   envelope mirror
//!
//! The generated specification is served through Swagger UI in debug
//! builds.

use utoipa::OpenApi;

use crate::domain::ErrorCode;
use crate::inbound::http::redirect::{
    ConfirmRedirectData, ConfirmRedirectRequestBody, ConfirmRedirectResponseBody,
    ConsultorBalanceBody, ConsultorBody, NextRedirectData, NextRedirectResponseBody,
    RedirectStatsData, RedirectStatsResponseBody,
};
use crate::inbound::http::schemas::ErrorSchema;

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Consultant redirect API",
        description = "Fair consultant selection with single-use reservation tokens."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::redirect::next_redirect,
        crate::inbound::http::redirect::confirm_redirect,
        crate::inbound::http::redirect::redirect_stats,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        NextRedirectResponseBody,
        NextRedirectData,
        ConsultorBody,
        ConfirmRedirectRequestBody,
        ConfirmRedirectResponseBody,
        ConfirmRedirectData,
        RedirectStatsResponseBody,
        RedirectStatsData,
        ConsultorBalanceBody,
        ErrorSchema,
        ErrorCode,
    )),
    tags(
        (name = "redirect", description = "Consultant selection and reservation lifecycle"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Verify endpoint registration in the generated document.

    use utoipa::OpenApi;

    use super::*;

    #[test]
    fn document_registers_the_redirect_paths() {
        let doc = ApiDoc::openapi();
        let paths = doc.paths.paths;

        for path in [
            "/next-redirect",
            "/confirm-redirect",
            "/redirect-stats",
            "/health/ready",
            "/health/live",
        ] {
            assert!(paths.contains_key(path), "missing path: {path}");
        }
    }

    #[test]
    fn document_registers_the_error_schema() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components registered");
        assert!(components.schemas.contains_key("ErrorSchema"));
    }
}
