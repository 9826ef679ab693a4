//! Notification targets
//!
//! A target receives policy results one at a time. Delivery is best effort:
//! `send` logs failures and never reports them back.

use crate::report::{PolicyResult, Priority};

/// A destination for policy results
pub trait Target: Send + Sync {
    fn name(&self) -> &str;

    /// Results below this priority are not sent. `None` sends everything.
    fn minimum_priority(&self) -> Option<Priority>;

    fn send(&self, result: &PolicyResult);

    /// Whether `result` passes this target's priority filter.
    ///
    /// Free-form priorities that are not a known level always pass.
    fn should_send(&self, result: &PolicyResult) -> bool {
        match (self.minimum_priority(), Priority::parse(&result.priority)) {
            (Some(minimum), Some(priority)) => priority >= minimum,
            _ => true,
        }
    }
}

/// Send every result that passes the target's filter; returns how many were sent
pub fn dispatch(target: &dyn Target, results: &[PolicyResult]) -> usize {
    let mut sent = 0;

    for result in results {
        if !target.should_send(result) {
            log::debug!(
                "Skipping {} for {}: priority {:?} below minimum",
                result.policy,
                target.name(),
                result.priority
            );
            continue;
        }
        target.send(result);
        sent += 1;
    }

    sent
}
