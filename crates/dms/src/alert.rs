//! Sustained eye-closure alert

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Drowsiness alert status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AlertStatus {
    #[default]
    Inactive,
    Active,
}

impl AlertStatus {
    pub fn is_active(self) -> bool {
        self == AlertStatus::Active
    }
}

/// Status change produced by one update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertTransition {
    Raised,
    Cleared,
}

/// Result of feeding one frame to the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertUpdate {
    pub status: AlertStatus,
    pub transition: Option<AlertTransition>,
    /// Continuous closure so far, `None` while an eye is open
    pub closed_for: Option<Duration>,
}

/// Start of the current both-eyes-closed streak
///
/// `closure_start` is set iff both eyes have been closed continuously since
/// that instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlertTimer {
    pub closure_start: Option<Duration>,
}

/// Tracks how long both eyes stay closed and raises the alert past a threshold
#[derive(Debug, Clone)]
pub struct AlertMonitor {
    threshold: Duration,
    timer: AlertTimer,
    status: AlertStatus,
}

impl AlertMonitor {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            timer: AlertTimer::default(),
            status: AlertStatus::Inactive,
        }
    }

    /// Feed one frame's combined eye state at time `now`
    pub fn update(&mut self, both_eyes_closed: bool, now: Duration) -> AlertUpdate {
        let previous = self.status;

        let closed_for = if both_eyes_closed {
            // Seeding is total: an unset timer starts now
            let start = *self.timer.closure_start.get_or_insert_with(|| {
                debug!("Eye closure started at {:.3}s", now.as_secs_f64());
                now
            });
            let elapsed = now.saturating_sub(start);
            self.status = if elapsed >= self.threshold {
                AlertStatus::Active
            } else {
                AlertStatus::Inactive
            };
            Some(elapsed)
        } else {
            self.timer.closure_start = None;
            self.status = AlertStatus::Inactive;
            None
        };

        let transition = match (previous, self.status) {
            (AlertStatus::Inactive, AlertStatus::Active) => {
                info!(
                    "Eyes closed for {:.2}s, alert active",
                    closed_for.unwrap_or_default().as_secs_f64()
                );
                Some(AlertTransition::Raised)
            }
            (AlertStatus::Active, AlertStatus::Inactive) => {
                info!("Eyes reopened, alert cleared");
                Some(AlertTransition::Cleared)
            }
            _ => None,
        };

        AlertUpdate {
            status: self.status,
            transition,
            closed_for,
        }
    }

    pub fn status(&self) -> AlertStatus {
        self.status
    }

    pub fn timer(&self) -> AlertTimer {
        self.timer
    }

    /// Closure length as of `now` without changing state
    pub fn closed_for(&self, now: Duration) -> Option<Duration> {
        self.timer
            .closure_start
            .map(|start| now.saturating_sub(start))
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    pub fn reset(&mut self) {
        self.timer = AlertTimer::default();
        self.status = AlertStatus::Inactive;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn test_activates_at_threshold() {
        let mut monitor = AlertMonitor::new(Duration::from_secs(3));
        assert_eq!(monitor.update(false, ms(0)).status, AlertStatus::Inactive);

        let first = monitor.update(true, ms(100));
        assert_eq!(first.closed_for, Some(Duration::ZERO));
        assert_eq!(monitor.timer().closure_start, Some(ms(100)));

        assert_eq!(monitor.update(true, ms(3000)).status, AlertStatus::Inactive);
        let update = monitor.update(true, ms(3100));
        assert_eq!(update.status, AlertStatus::Active);
        assert_eq!(update.transition, Some(AlertTransition::Raised));

        // Staying active is not another transition
        let update = monitor.update(true, ms(3200));
        assert_eq!(update.status, AlertStatus::Active);
        assert_eq!(update.transition, None);
    }

    #[test]
    fn test_reopen_clears_immediately() {
        let mut monitor = AlertMonitor::new(Duration::from_secs(1));
        monitor.update(true, ms(0));
        monitor.update(true, ms(1500));
        assert!(monitor.status().is_active());

        let update = monitor.update(false, ms(1600));
        assert_eq!(update.status, AlertStatus::Inactive);
        assert_eq!(update.transition, Some(AlertTransition::Cleared));
        assert_eq!(update.closed_for, None);
        assert_eq!(monitor.timer().closure_start, None);
    }

    #[test]
    fn test_closed_on_first_observation_seeds_timer() {
        let mut monitor = AlertMonitor::new(Duration::from_secs(3));
        let update = monitor.update(true, ms(5000));
        assert_eq!(update.status, AlertStatus::Inactive);
        assert_eq!(monitor.timer().closure_start, Some(ms(5000)));
        assert!(monitor.update(true, ms(8000)).status.is_active());
    }

    #[test]
    fn test_backwards_clock_is_zero_elapsed() {
        let mut monitor = AlertMonitor::new(Duration::from_secs(3));
        monitor.update(true, ms(5000));
        let update = monitor.update(true, ms(1000));
        assert_eq!(update.closed_for, Some(Duration::ZERO));
        assert_eq!(update.status, AlertStatus::Inactive);
    }

    #[test]
    fn test_zero_threshold_activates_immediately() {
        let mut monitor = AlertMonitor::new(Duration::ZERO);
        let update = monitor.update(true, ms(10));
        assert_eq!(update.transition, Some(AlertTransition::Raised));
    }

    #[test]
    fn test_closed_for_peek() {
        let mut monitor = AlertMonitor::new(Duration::from_secs(3));
        assert_eq!(monitor.closed_for(ms(100)), None);
        monitor.update(true, ms(100));
        assert_eq!(monitor.closed_for(ms(600)), Some(ms(500)));
        monitor.reset();
        assert_eq!(monitor.closed_for(ms(600)), None);
    }
}
