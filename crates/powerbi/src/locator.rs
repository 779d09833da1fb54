//! Report locator parsing.
//!
//! Stored report URLs come in two shapes:
//!
//! ```text
//! https://app.powerbi.com/reportEmbed?reportId=R&groupId=G
//! https://app.powerbi.com/groups/G/reports/R/ReportSection
//! ```
//!
//! Query parameters win over path segments. The special workspace `me`
//! ("My workspace") carries no group id.

use reqwest::Url;

/// Base URL for canonical embed links.
const EMBED_BASE_URL: &str = "https://app.powerbi.com/reportEmbed";

/// Workspace alias for the signed-in user's personal workspace.
const MY_WORKSPACE: &str = "me";

/// External identifiers of a Power BI report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLocator {
    pub report_id: String,
    /// Workspace (group) id, when the URL names one.
    pub group_id: Option<String>,
}

impl ReportLocator {
    /// Parse a stored report URL.
    ///
    /// Returns `None` when the value is not a URL or names no report.
    pub fn parse(stored_url: &str) -> Option<Self> {
        let url = Url::parse(stored_url.trim()).ok()?;
        Self::from_query(&url).or_else(|| Self::from_path(&url))
    }

    fn from_query(url: &Url) -> Option<Self> {
        let mut report_id = None;
        let mut group_id = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "reportId" if report_id.is_none() => report_id = non_empty(&value),
                "groupId" if group_id.is_none() => group_id = workspace(&value),
                _ => {}
            }
        }
        Some(Self {
            report_id: report_id?,
            group_id,
        })
    }

    fn from_path(url: &Url) -> Option<Self> {
        let segments: Vec<&str> = url
            .path_segments()?
            .filter(|s| !s.is_empty())
            .collect();

        let after = |name: &str| {
            segments
                .iter()
                .position(|s| *s == name)
                .and_then(|i| segments.get(i + 1))
                .copied()
        };

        Some(Self {
            report_id: after("reports").and_then(non_empty)?,
            group_id: after("groups").and_then(workspace),
        })
    }

    /// The canonical `reportEmbed` URL for this report.
    pub fn canonical_embed_url(&self) -> String {
        let mut params = vec![("reportId", self.report_id.as_str())];
        if let Some(group_id) = &self.group_id {
            params.push(("groupId", group_id.as_str()));
        }
        match Url::parse_with_params(EMBED_BASE_URL, &params) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{EMBED_BASE_URL}?reportId={}", self.report_id),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn workspace(value: &str) -> Option<String> {
    non_empty(value).filter(|v| !v.eq_ignore_ascii_case(MY_WORKSPACE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locator(report: &str, group: Option<&str>) -> ReportLocator {
        ReportLocator {
            report_id: report.to_string(),
            group_id: group.map(str::to_string),
        }
    }

    #[test]
    fn path_style_url() {
        let parsed =
            ReportLocator::parse("https://app.powerbi.com/groups/G/reports/R/ReportSection?experience=power-bi");
        assert_eq!(parsed, Some(locator("R", Some("G"))));
    }

    #[test]
    fn query_style_url() {
        let parsed = ReportLocator::parse("https://app.powerbi.com/reportEmbed?reportId=R&groupId=G");
        assert_eq!(parsed, Some(locator("R", Some("G"))));
    }

    #[test]
    fn query_takes_priority_over_path() {
        let parsed = ReportLocator::parse(
            "https://app.powerbi.com/groups/G1/reports/R1?reportId=R2&groupId=G2",
        );
        assert_eq!(parsed, Some(locator("R2", Some("G2"))));
    }

    #[test]
    fn query_without_group() {
        let parsed = ReportLocator::parse("https://app.powerbi.com/reportEmbed?reportId=R&autoAuth=true");
        assert_eq!(parsed, Some(locator("R", None)));
    }

    #[test]
    fn my_workspace_has_no_group() {
        let parsed = ReportLocator::parse("https://app.powerbi.com/groups/me/reports/R");
        assert_eq!(parsed, Some(locator("R", None)));
    }

    #[test]
    fn no_report_segment_or_parameter() {
        assert_eq!(ReportLocator::parse("https://app.powerbi.com/groups/G/dashboards/D"), None);
        assert_eq!(ReportLocator::parse("https://app.powerbi.com/reports/"), None);
        assert_eq!(ReportLocator::parse("https://app.powerbi.com/reportEmbed?reportId="), None);
    }

    #[test]
    fn not_a_url() {
        assert_eq!(ReportLocator::parse("not a url"), None);
        assert_eq!(ReportLocator::parse(""), None);
    }

    #[test]
    fn canonical_url_includes_group_when_known() {
        assert_eq!(
            locator("R", Some("G")).canonical_embed_url(),
            "https://app.powerbi.com/reportEmbed?reportId=R&groupId=G"
        );
        assert_eq!(
            locator("R", None).canonical_embed_url(),
            "https://app.powerbi.com/reportEmbed?reportId=R"
        );
    }
}
