//! Alerts raised by the monitoring rules.

use serde::{Deserialize, Serialize};

use crate::engine::state::SensorField;

/// Why an alert fired.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AlertKind {
    /// The reading changed by more than its threshold since the last tick.
    Anomaly {
        /// Absolute change between consecutive ticks.
        change: f64,
    },
    /// The reading is outside its safe range.
    Critical,
}

/// A single alert for one sensor field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// The field the alert is about.
    pub field: SensorField,
    /// What triggered it.
    #[serde(flatten)]
    pub kind: AlertKind,
}

impl Alert {
    /// Create an anomaly alert.
    #[must_use]
    pub const fn anomaly(field: SensorField, change: f64) -> Self {
        Self {
            field,
            kind: AlertKind::Anomaly { change },
        }
    }

    /// Create a critical-level alert.
    #[must_use]
    pub const fn critical(field: SensorField) -> Self {
        Self {
            field,
            kind: AlertKind::Critical,
        }
    }

    /// Whether this is an anomaly alert.
    #[must_use]
    pub const fn is_anomaly(&self) -> bool {
        matches!(self.kind, AlertKind::Anomaly { .. })
    }

    /// Whether this is a critical-level alert.
    #[must_use]
    pub const fn is_critical(&self) -> bool {
        matches!(self.kind, AlertKind::Critical)
    }

    /// Notification text shown to the operator.
    #[must_use]
    pub fn message(&self) -> String {
        match self.kind {
            AlertKind::Anomaly { change } => format!(
                "Anomaly detected in {}! Change: {change:.1}{}",
                self.field.label(),
                self.field.unit()
            ),
            AlertKind::Critical => {
                // "Oxygen level critical!", not "Oxygen Level level critical!"
                let name = match self.field {
                    SensorField::Temperature => "Temperature",
                    SensorField::Oxygen => "Oxygen",
                    SensorField::Salinity => "Salinity",
                };
                format!("{name} level critical!")
            }
        }
    }
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}
