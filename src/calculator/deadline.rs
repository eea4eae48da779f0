//! Wall-clock budget for a single evaluation.
//!
//! The budget is checked cooperatively by the driver and the reducer, so each
//! evaluation carries its own deadline and concurrent calls never interfere.

use std::time::{Duration, Instant};

use tracing::warn;

use super::error::SolveError;

/// Budget applied to every `solve` call unless a test lowers it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    started: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn start(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    /// Fail with [`SolveError::Timeout`] once the budget is spent.
    pub fn check(&self) -> Result<(), SolveError> {
        let elapsed = self.started.elapsed();
        if elapsed >= self.budget {
            warn!(?elapsed, budget = ?self.budget, "evaluation deadline exceeded");
            return Err(SolveError::Timeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_deadline_passes() {
        assert_eq!(Deadline::start(DEFAULT_TIMEOUT).check(), Ok(()));
    }

    #[test]
    fn test_zero_budget_times_out() {
        assert_eq!(
            Deadline::start(Duration::ZERO).check(),
            Err(SolveError::Timeout)
        );
    }
}
