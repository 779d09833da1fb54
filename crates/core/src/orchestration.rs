//! Orchestration input validation and status state machine.
//!
//! Everything here runs before the database is touched: a request that
//! fails these checks never reaches a repository.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cron::normalize_cron;
use crate::error::CoreError;
use crate::types::DbId;

/// Zone used when a create request omits `timezone`.
pub const DEFAULT_TIMEZONE: &str = "America/Lima";

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Orchestration status. Two states, toggled by the owner only.
///
/// There is no terminal state; deleting an orchestration removes it
/// instead of transitioning it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrchestrationStatus {
    Active,
    Paused,
}

impl OrchestrationStatus {
    /// Status assigned on creation.
    pub const INITIAL: OrchestrationStatus = OrchestrationStatus::Active;

    /// The value stored in `orchestrations.status`.
    pub fn as_str(self) -> &'static str {
        match self {
            OrchestrationStatus::Active => "active",
            OrchestrationStatus::Paused => "paused",
        }
    }
}

impl FromStr for OrchestrationStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "active" => Ok(OrchestrationStatus::Active),
            "paused" => Ok(OrchestrationStatus::Paused),
            other => Err(CoreError::Validation(format!(
                "Invalid status '{other}'. Expected 'active' or 'paused'"
            ))),
        }
    }
}

impl fmt::Display for OrchestrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse an optional status from a request body.
pub fn parse_status(raw: Option<&str>) -> Result<OrchestrationStatus, CoreError> {
    raw.ok_or_else(|| CoreError::Validation("Missing status".into()))?
        .parse()
}

// ---------------------------------------------------------------------------
// Destinations
// ---------------------------------------------------------------------------

/// Destinations as posted by a client: free text, or a list of addresses.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DestinationsInput {
    Text(String),
    List(Vec<String>),
}

impl DestinationsInput {
    /// Collapse the input into the stored free-text form.
    ///
    /// List entries are trimmed, blanks dropped, and the rest joined with
    /// `", "`. Returns `None` when nothing is left.
    pub fn into_text(self) -> Option<String> {
        match self {
            DestinationsInput::Text(text) => non_blank(Some(text)),
            DestinationsInput::List(items) => {
                let joined = items
                    .iter()
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ");
                non_blank(Some(joined))
            }
        }
    }
}

/// Validate destinations for create or replace.
pub fn validate_destinations(input: Option<DestinationsInput>) -> Result<String, CoreError> {
    input
        .and_then(DestinationsInput::into_text)
        .ok_or_else(|| CoreError::Validation("Missing destinations".into()))
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Unvalidated create request. Every field is optional so that missing
/// fields surface as validation errors rather than deserialization failures.
#[derive(Debug, Clone, Default)]
pub struct OrchestrationDraft {
    pub name: Option<String>,
    pub report_id: Option<DbId>,
    pub destinations: Option<DestinationsInput>,
    pub cron: Option<String>,
    pub timezone: Option<String>,
}

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrchestration {
    pub name: String,
    pub report_id: DbId,
    pub destinations: String,
    pub cron: String,
    pub timezone: String,
}

impl OrchestrationDraft {
    /// Check required fields and the cron grammar.
    ///
    /// A blank or missing timezone falls back to `default_timezone`.
    pub fn validate(self, default_timezone: &str) -> Result<NewOrchestration, CoreError> {
        let name = non_blank(self.name);
        let destinations = self.destinations.and_then(DestinationsInput::into_text);
        let cron = non_blank(self.cron);

        let (Some(name), Some(report_id), Some(destinations), Some(cron)) =
            (name, self.report_id, destinations, cron)
        else {
            return Err(CoreError::Validation(
                "Missing fields: name, reportId, destinations and cron are required".into(),
            ));
        };

        let cron = normalize_cron(&cron).map_err(CoreError::Validation)?;
        let timezone = non_blank(self.timezone).unwrap_or_else(|| default_timezone.to_string());

        Ok(NewOrchestration {
            name,
            report_id,
            destinations,
            cron,
            timezone,
        })
    }
}

// ---------------------------------------------------------------------------
// Details patch
// ---------------------------------------------------------------------------

/// A validated partial update of name and/or schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsPatch {
    pub name: Option<String>,
    pub cron: Option<String>,
}

/// Validate a details update. At least one field must be present, and a
/// schedule, if given, must pass the cron grammar again.
pub fn validate_details(
    name: Option<String>,
    cron: Option<String>,
) -> Result<DetailsPatch, CoreError> {
    let name = non_blank(name);
    let cron = non_blank(cron);

    if name.is_none() && cron.is_none() {
        return Err(CoreError::Validation(
            "Missing fields: provide name and/or cron".into(),
        ));
    }

    let cron = cron
        .map(|c| normalize_cron(&c))
        .transpose()
        .map_err(CoreError::Validation)?;

    Ok(DetailsPatch { name, cron })
}

/// Trim a value and treat empty strings as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
