//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::Platform;
use crate::domain::ports::{RedirectCommand, RedirectQuery};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use backend::domain::Platform;
/// use backend::domain::ports::{FixtureRedirectCommand, FixtureRedirectQuery};
/// use backend::inbound::http::state::HttpState;
///
/// let state = HttpState::new(
///     Arc::new(FixtureRedirectCommand),
///     Arc::new(FixtureRedirectQuery),
///     Platform::new("whatsapp").expect("valid tag"),
/// );
/// let _redirect = state.redirect.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    /// Reservation issue/confirm use-cases.
    pub redirect: Arc<dyn RedirectCommand>,
    /// Fairness introspection use-case.
    pub balance: Arc<dyn RedirectQuery>,
    /// Platform applied when the caller omits the query parameter.
    pub default_platform: Platform,
}

impl HttpState {
    /// Construct state from the driving ports and the default platform.
    pub fn new(
        redirect: Arc<dyn RedirectCommand>,
        balance: Arc<dyn RedirectQuery>,
        default_platform: Platform,
    ) -> Self {
        Self {
            redirect,
            balance,
            default_platform,
        }
    }
}
