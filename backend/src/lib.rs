//! Consultant redirect backend.
//!
//! Routes inbound visitors to the least-loaded active sales consultant for
//! a platform, issues short-lived single-use reservation tokens, and
//! finalizes hand-offs on confirmation. Layout is hexagonal: [`domain`]
//! holds the policy and entities, [`inbound`] the HTTP adapter, and
//! [`outbound`] the PostgreSQL adapters behind the domain ports.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
