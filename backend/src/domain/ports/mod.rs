//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod activity_counter;
mod consultant_roster;
mod redirect_command;
mod redirect_query;
mod reservation_log;

#[cfg(test)]
pub use activity_counter::MockDailyActivityCounter;
pub use activity_counter::{
    DailyActivityCount, DailyActivityCounter, DailyActivityError, FixtureDailyActivityCounter,
};
#[cfg(test)]
pub use consultant_roster::MockConsultantRoster;
pub use consultant_roster::{ConsultantRoster, ConsultantRosterError, FixtureConsultantRoster};
#[cfg(test)]
pub use redirect_command::MockRedirectCommand;
pub use redirect_command::{
    ConfirmReservationRequest, ConfirmReservationResponse, ConsultantIdentityPayload,
    FIXTURE_CONTACT_NUMBER, FixtureRedirectCommand, IssueReservationRequest,
    IssueReservationResponse, RedirectCommand,
};
#[cfg(test)]
pub use redirect_query::MockRedirectQuery;
pub use redirect_query::{
    ConsultantBalancePayload, FixtureRedirectQuery, RedirectQuery, TodayBalanceRequest,
    TodayBalanceResponse,
};
#[cfg(test)]
pub use reservation_log::MockReservationLog;
pub use reservation_log::{
    FixtureReservationLog, ReservationConfirmation, ReservationLog, ReservationLogError,
};
