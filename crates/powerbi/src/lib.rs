//! Power BI embed-credential broker.
//!
//! Exchanges a service-principal identity for a short-lived, report-scoped
//! view token:
//!
//! 1. [`locator`] parses the report and workspace ids out of a stored URL.
//! 2. [`broker::EmbedBroker`] requests an Azure AD access token with the
//!    client-credentials grant, looks the report up in the workspace, and
//!    asks Power BI for a view-only embed token.
//!
//! Nothing is cached: every call performs both hops afresh.

pub mod broker;
pub mod config;
pub mod error;
pub mod locator;

pub use broker::{EmbedBroker, EmbedCredential};
pub use config::PowerBiConfig;
pub use error::{EmbedStage, PowerBiError};
pub use locator::ReportLocator;
