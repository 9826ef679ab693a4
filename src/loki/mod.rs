//! Grafana Loki target
//!
//! Converts policy results into Loki's push format and POSTs them:
//! - `payload` builds the labelled stream for one result
//! - `client` delivers it to `<host>/api/prom/push`

pub mod client;
pub mod payload;

pub use client::{Client, PushOutcome};
pub use payload::{Entry, Labels, Payload, Stream};
