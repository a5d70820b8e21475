//! Sensor state management.
//!
//! Holds the four live readings plus the snapshot of the three simulated
//! fields as of the end of the last tick. The snapshot is what anomaly
//! detection measures change against.

use serde::{Deserialize, Serialize};

/// A sensor field advanced automatically on every tick.
///
/// pH is deliberately absent: it only changes through manual override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorField {
    /// Water temperature (°C).
    Temperature,
    /// Dissolved oxygen (%).
    Oxygen,
    /// Salinity (PSU).
    Salinity,
}

impl SensorField {
    /// All simulated fields, in evaluation order.
    pub const ALL: [Self; 3] = [Self::Temperature, Self::Oxygen, Self::Salinity];

    /// Human-readable label used in alerts and charts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Oxygen => "Oxygen Level",
            Self::Salinity => "Salinity",
        }
    }

    /// Unit suffix, including any separating space.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Temperature => "°C",
            Self::Oxygen => "%",
            Self::Salinity => " PSU",
        }
    }

    /// Short machine name (matches the serde representation).
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Oxygen => "oxygen",
            Self::Salinity => "salinity",
        }
    }
}

impl std::fmt::Display for SensorField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A plain set of the four readings.
///
/// Used as the manual-override payload and as the comparison snapshot
/// for anomaly detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReadings {
    /// Temperature (°C).
    pub temperature: f64,
    /// Oxygen (%).
    pub oxygen: f64,
    /// Salinity (PSU).
    pub salinity: f64,
    /// pH.
    pub ph: f64,
}

impl SensorReadings {
    /// Create a new reading set.
    #[must_use]
    pub const fn new(temperature: f64, oxygen: f64, salinity: f64, ph: f64) -> Self {
        Self {
            temperature,
            oxygen,
            salinity,
            ph,
        }
    }

    /// Value of a simulated field.
    #[must_use]
    pub const fn get(&self, field: SensorField) -> f64 {
        match field {
            SensorField::Temperature => self.temperature,
            SensorField::Oxygen => self.oxygen,
            SensorField::Salinity => self.salinity,
        }
    }

    /// Set a simulated field.
    pub fn set(&mut self, field: SensorField, value: f64) {
        match field {
            SensorField::Temperature => self.temperature = value,
            SensorField::Oxygen => self.oxygen = value,
            SensorField::Salinity => self.salinity = value,
        }
    }

    /// Check if all four values are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.temperature.is_finite()
            && self.oxygen.is_finite()
            && self.salinity.is_finite()
            && self.ph.is_finite()
    }
}

impl Default for SensorReadings {
    fn default() -> Self {
        Self::new(10.0, 50.0, 35.0, 7.2)
    }
}

/// Complete sensor state.
///
/// After every tick `previous_*` equals the current value. A manual override
/// replaces the current values only, so the next tick measures its change
/// against the last simulated reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorState {
    /// Temperature (°C).
    pub temperature: f64,
    /// Oxygen (%).
    pub oxygen: f64,
    /// Salinity (PSU).
    pub salinity: f64,
    /// pH.
    pub ph: f64,
    /// Temperature at the end of the last tick.
    pub previous_temperature: f64,
    /// Oxygen at the end of the last tick.
    pub previous_oxygen: f64,
    /// Salinity at the end of the last tick.
    pub previous_salinity: f64,
}

impl SensorState {
    /// Create a state whose baseline equals the given readings.
    #[must_use]
    pub const fn from_readings(readings: SensorReadings) -> Self {
        Self {
            temperature: readings.temperature,
            oxygen: readings.oxygen,
            salinity: readings.salinity,
            ph: readings.ph,
            previous_temperature: readings.temperature,
            previous_oxygen: readings.oxygen,
            previous_salinity: readings.salinity,
        }
    }

    /// Current value of a simulated field.
    #[must_use]
    pub const fn get(&self, field: SensorField) -> f64 {
        match field {
            SensorField::Temperature => self.temperature,
            SensorField::Oxygen => self.oxygen,
            SensorField::Salinity => self.salinity,
        }
    }

    /// Set the current value of a simulated field.
    pub fn set(&mut self, field: SensorField, value: f64) {
        match field {
            SensorField::Temperature => self.temperature = value,
            SensorField::Oxygen => self.oxygen = value,
            SensorField::Salinity => self.salinity = value,
        }
    }

    /// Baseline value of a simulated field.
    #[must_use]
    pub const fn previous(&self, field: SensorField) -> f64 {
        match field {
            SensorField::Temperature => self.previous_temperature,
            SensorField::Oxygen => self.previous_oxygen,
            SensorField::Salinity => self.previous_salinity,
        }
    }

    /// Current readings.
    #[must_use]
    pub const fn readings(&self) -> SensorReadings {
        SensorReadings::new(self.temperature, self.oxygen, self.salinity, self.ph)
    }

    /// Baseline readings (pH carried over from the current value).
    #[must_use]
    pub const fn previous_readings(&self) -> SensorReadings {
        SensorReadings::new(
            self.previous_temperature,
            self.previous_oxygen,
            self.previous_salinity,
            self.ph,
        )
    }

    /// Snapshot the current values as the new baseline.
    #[allow(clippy::missing_const_for_fn)] // Mutable const not stable
    pub fn commit_baseline(&mut self) {
        self.previous_temperature = self.temperature;
        self.previous_oxygen = self.oxygen;
        self.previous_salinity = self.salinity;
    }

    /// Replace all four current values, leaving the baseline untouched.
    #[allow(clippy::missing_const_for_fn)] // Mutable const not stable
    pub fn replace_readings(&mut self, readings: SensorReadings) {
        self.temperature = readings.temperature;
        self.oxygen = readings.oxygen;
        self.salinity = readings.salinity;
        self.ph = readings.ph;
    }
}

impl Default for SensorState {
    fn default() -> Self {
        Self::from_readings(SensorReadings::default())
    }
}

impl From<SensorReadings> for SensorState {
    fn from(readings: SensorReadings) -> Self {
        Self::from_readings(readings)
    }
}
