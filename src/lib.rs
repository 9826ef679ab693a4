//! Push policy evaluation results to Grafana Loki.
//!
//! ```no_run
//! use policy_loki::loki::Client;
//! # fn results() -> Vec<policy_loki::report::PolicyResult> { Vec::new() }
//!
//! let client = Client::new("http://loki:3100");
//! for result in results() {
//!     client.send(&result);
//! }
//! ```

pub mod config;
pub mod loki;
pub mod report;
pub mod target;
