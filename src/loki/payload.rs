//! Loki push payload construction

use chrono::{DateTime, Local, SecondsFormat, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::report::{PolicyResult, Priority};

/// Constant `source` label value
pub const SOURCE: &str = "kyverno";

/// Body of a `POST /api/prom/push` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub streams: Vec<Stream>,
}

/// A run of log lines sharing one label set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    /// Rendered label set, e.g. `{status="fail",policy="p"}`
    pub labels: String,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// RFC 3339, second precision
    pub ts: String,
    pub line: String,
}

impl Payload {
    /// Build the payload for one result, stamped with the current local time
    pub fn new(result: &PolicyResult) -> Self {
        Self::at(result, Local::now())
    }

    /// Build the payload for one result with an explicit timestamp
    pub fn at<Tz>(result: &PolicyResult, now: DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let entry = Entry {
            ts: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            line: format!("[{}] {}", severity_tag(result), result.message),
        };

        Self {
            streams: vec![Stream {
                labels: Labels::from_result(result).to_string(),
                entries: vec![entry],
            }],
        }
    }
}

/// Bracketed tag for the log line.
///
/// Only failing results show their own priority; everything else is INFO.
pub fn severity_tag(result: &PolicyResult) -> String {
    if result.status.is_failing() {
        result.priority.to_uppercase()
    } else {
        Priority::INFORMATION.as_str().to_uppercase()
    }
}

/// Ordered Loki label set.
///
/// Values are written verbatim between double quotes. Embedded quotes or
/// commas are not escaped and will corrupt the rendered selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels {
    pairs: Vec<(&'static str, String)>,
}

impl Labels {
    pub fn from_result(result: &PolicyResult) -> Self {
        let namespace = result.resource().map(|r| r.namespace.as_str()).unwrap_or_default();

        let mut labels = Self::default();
        labels.push("status", result.status.as_str());
        labels.push("policy", &result.policy);
        labels.push("priority", &result.priority);
        labels.push("namespace", namespace);
        labels.push("source", SOURCE);

        labels.push_non_empty("rule", &result.rule);
        labels.push_non_empty("category", &result.category);
        labels.push_non_empty("severity", &result.severity);

        if let Some(resource) = result.resource()
            && !resource.kind.is_empty()
        {
            labels.push("kind", &resource.kind);
            labels.push("name", &resource.name);
        }

        labels
    }

    pub fn push(&mut self, key: &'static str, value: &str) {
        self.pairs.push((key, value.to_string()));
    }

    fn push_non_empty(&mut self, key: &'static str, value: &str) {
        if !value.is_empty() {
            self.push(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.pairs.iter().map(|(k, _)| *k)
    }
}

impl std::fmt::Display for Labels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self.pairs.iter().map(|(k, v)| format!("{}=\"{}\"", k, v)).collect();
        write!(f, "{{{}}}", rendered.join(","))
    }
}
