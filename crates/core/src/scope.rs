//! Owner scope: the tenant boundary applied to every orchestration query.

use std::fmt;
use std::str::FromStr;

use crate::types::DbId;

/// Which rows a caller may see and mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScopeMode {
    /// Only rows the caller created (within their company).
    #[default]
    User,
    /// Every row belonging to the caller's company.
    Company,
}

impl ScopeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ScopeMode::User => "user",
            ScopeMode::Company => "company",
        }
    }
}

impl FromStr for ScopeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(ScopeMode::User),
            "company" => Ok(ScopeMode::Company),
            other => Err(format!(
                "Unknown scope mode '{other}'. Expected 'user' or 'company'"
            )),
        }
    }
}

impl fmt::Display for ScopeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identity a request acts on behalf of, plus how far its visibility
/// reaches.
///
/// Repositories bind [`OwnerScope::company_id`] and
/// [`OwnerScope::user_filter`] into the same statement that reads or mutates
/// rows, so scoping never depends on a separate authorization query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerScope {
    pub user_id: DbId,
    pub company_id: DbId,
    pub mode: ScopeMode,
}

impl OwnerScope {
    pub fn new(user_id: DbId, company_id: DbId, mode: ScopeMode) -> Self {
        Self {
            user_id,
            company_id,
            mode,
        }
    }

    /// The user id rows must match, or `None` when any row in the company
    /// qualifies.
    pub fn user_filter(&self) -> Option<DbId> {
        match self.mode {
            ScopeMode::User => Some(self.user_id),
            ScopeMode::Company => None,
        }
    }
}
