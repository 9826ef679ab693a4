//! Policy report data model
//!
//! These are the results produced by a policy engine. This crate only reads
//! them; it never mutates or persists a result.

use serde::{Deserialize, Serialize};

/// Outcome of evaluating one rule against one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Fail,
    Warn,
    Error,
    Skip,
}

impl Status {
    /// Wire value, as used in Loki labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "pass",
            Status::Fail => "fail",
            Status::Warn => "warn",
            Status::Error => "error",
            Status::Skip => "skip",
        }
    }

    /// Fail and Error are the statuses that surface a result's own priority
    pub fn is_failing(&self) -> bool {
        matches!(self, Status::Fail | Status::Error)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Known priority levels, ordered from least to most important
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Priority {
    /// Priority shown for results that did not fail
    pub const INFORMATION: Priority = Priority::Info;

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Debug => "debug",
            Priority::Info => "info",
            Priority::Warning => "warning",
            Priority::Error => "error",
            Priority::Critical => "critical",
        }
    }

    /// Parse a priority name, ignoring case. Unknown names yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A resource a result was evaluated against
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Resource {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub namespace: String,
    pub uid: String,
}

/// One policy rule evaluation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PolicyResult {
    pub policy: String,
    #[serde(default)]
    pub rule: String,
    #[serde(default)]
    pub message: String,
    pub status: Status,
    /// Free-form; labels carry it verbatim
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub scored: bool,
}

impl PolicyResult {
    /// The first affected resource, if any
    pub fn resource(&self) -> Option<&Resource> {
        self.resources.first()
    }
}

/// A report document bundling the results of one scan
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PolicyReport {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    pub results: Vec<PolicyResult>,
}

/// Accepted input document shapes, tried in order
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResultsDocument {
    Results(Vec<PolicyResult>),
    Reports(Vec<PolicyReport>),
    Report(PolicyReport),
}

/// Parse results from a YAML or JSON document.
///
/// The document may be a single report, a list of reports, or a bare list of results.
pub fn parse_results(content: &str) -> eyre::Result<Vec<PolicyResult>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let document: ResultsDocument = serde_yaml::from_str(content)?;

    Ok(match document {
        ResultsDocument::Results(results) => results,
        ResultsDocument::Reports(reports) => reports.into_iter().flat_map(|r| r.results).collect(),
        ResultsDocument::Report(report) => report.results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_values() {
        assert_eq!(Status::Fail.as_str(), "fail");
        assert_eq!(Status::Error.to_string(), "error");
        assert!(Status::Fail.is_failing());
        assert!(Status::Error.is_failing());
        assert!(!Status::Warn.is_failing());
        assert!(!Status::Pass.is_failing());
    }

    #[test]
    fn test_priority_parse_and_order() {
        assert_eq!(Priority::parse("WARNING"), Some(Priority::Warning));
        assert_eq!(Priority::parse(" critical "), Some(Priority::Critical));
        assert_eq!(Priority::parse("high"), None);
        assert!(Priority::Debug < Priority::Info);
        assert!(Priority::Warning < Priority::Error);
        assert_eq!(Priority::INFORMATION.as_str(), "info");
    }

    #[test]
    fn test_parse_bare_result_list() {
        let yaml = r#"
- policy: disallow-latest
  rule: validate-image-tag
  status: fail
  priority: high
  message: image uses latest tag
  resources:
    - namespace: default
      kind: Pod
      name: app-1
"#;
        let results = parse_results(yaml).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, Status::Fail);
        assert_eq!(results[0].resource().unwrap().name, "app-1");
        assert!(results[0].category.is_empty());
    }

    #[test]
    fn test_parse_report_document() {
        let yaml = r#"
name: polr-ns-default
namespace: default
results:
  - policy: require-labels
    status: pass
  - policy: require-probes
    status: warn
"#;
        let results = parse_results(yaml).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].policy, "require-probes");
        assert!(results[0].resources.is_empty());
    }

    #[test]
    fn test_parse_report_list_json() {
        let json = r#"[
            {"name": "a", "results": [{"policy": "p1", "status": "error"}]},
            {"name": "b", "results": [{"policy": "p2", "status": "skip"}]}
        ]"#;
        let results = parse_results(json).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].status, Status::Error);
        assert_eq!(results[1].status, Status::Skip);
    }

    #[test]
    fn test_parse_empty_document() {
        assert!(parse_results("  \n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_unknown_status_fails() {
        assert!(parse_results("- policy: p\n  status: exploded\n").is_err());
    }
}
