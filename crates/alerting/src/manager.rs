//! Alert Dispatcher Implementation

use crate::sink::{AlertSink, SinkKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Alert configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Message handed to the sink when the driver alert fires
    pub message: String,
    /// Re-notify period while the alert stays active (seconds, 0 = once per activation)
    pub repeat_interval_secs: f64,
    /// Sink the host should build
    pub sink: SinkKind,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            message: "Both eyes closed!".to_string(),
            repeat_interval_secs: 0.0,
            sink: SinkKind::Log,
        }
    }
}

impl AlertConfig {
    /// Repeat period, `None` when repeats are disabled or misconfigured
    pub fn repeat_interval(&self) -> Option<Duration> {
        if self.repeat_interval_secs > 0.0 {
            Duration::try_from_secs_f64(self.repeat_interval_secs).ok()
        } else {
            None
        }
    }

    /// Reject a repeat interval that is negative, non-finite or out of range
    pub fn validate(&self) -> Result<(), String> {
        let secs = self.repeat_interval_secs;
        if secs != 0.0 && Duration::try_from_secs_f64(secs).is_err() {
            return Err(format!(
                "repeat_interval_secs must be 0 or a positive duration, got {}",
                secs
            ));
        }
        Ok(())
    }
}

/// State of the active alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertState {
    /// When the alert became active
    pub raised_at: Duration,
    /// Last time the sink was notified
    pub last_fired: Duration,
    /// Notifications sent during this activation
    pub fire_count: usize,
    /// Whether the driver acknowledged it (stops repeats)
    pub acknowledged: bool,
}

/// Forwards alert activations to a sink.
///
/// Every inactive→active transition notifies exactly once. With a repeat
/// interval configured the sink is reminded while the alert stays active,
/// until it is cleared or acknowledged.
pub struct AlertDispatcher {
    config: AlertConfig,
    sink: Box<dyn AlertSink>,
    state: Option<AlertState>,
    total_raised: usize,
}

impl AlertDispatcher {
    /// Create a new dispatcher
    pub fn new(config: AlertConfig, sink: Box<dyn AlertSink>) -> Self {
        info!("Creating alert dispatcher with config: {:?}", config);
        Self {
            config,
            sink,
            state: None,
            total_raised: 0,
        }
    }

    /// Dispatcher using the sink named in the configuration
    pub fn from_config(config: AlertConfig) -> Self {
        let sink = config.sink.build();
        Self::new(config, sink)
    }

    /// Alert became active. Returns true if the sink was notified.
    pub fn raise(&mut self, now: Duration) -> bool {
        if self.state.is_some() {
            debug!("Alert already active, raise ignored");
            return false;
        }

        warn!("Drowsiness alert raised at {:.3}s", now.as_secs_f64());
        self.sink.notify(&self.config.message);
        self.total_raised += 1;
        self.state = Some(AlertState {
            raised_at: now,
            last_fired: now,
            fire_count: 1,
            acknowledged: false,
        });
        true
    }

    /// Alert still active. Returns true if a reminder was sent.
    pub fn tick(&mut self, now: Duration) -> bool {
        let Some(interval) = self.config.repeat_interval() else {
            return false;
        };
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        if state.acknowledged {
            return false;
        }
        if now.saturating_sub(state.last_fired) < interval {
            return false;
        }

        self.sink.notify(&self.config.message);
        state.last_fired = now;
        state.fire_count += 1;
        debug!("Alert reminder #{}", state.fire_count);
        true
    }

    /// Alert condition ended
    pub fn clear(&mut self) {
        if let Some(state) = self.state.take() {
            info!(
                "Drowsiness alert cleared (notified {} time(s))",
                state.fire_count
            );
        }
    }

    /// Acknowledge the active alert
    pub fn acknowledge(&mut self) -> bool {
        match self.state.as_mut() {
            Some(state) => {
                state.acknowledged = true;
                info!("Alert acknowledged");
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&AlertState> {
        self.state.as_ref()
    }

    /// Activations since creation
    pub fn total_raised(&self) -> usize {
        self.total_raised
    }

    pub fn config(&self) -> &AlertConfig {
        &self.config
    }
}

impl Default for AlertDispatcher {
    fn default() -> Self {
        Self::from_config(AlertConfig::default())
    }
}
