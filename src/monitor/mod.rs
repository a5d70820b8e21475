//! Sensor monitoring rules.
//!
//! Two independent rules are evaluated after every tick:
//!
//! 1. **Anomaly**: the change since the last tick exceeds a per-field
//!    threshold (strictly greater).
//! 2. **Critical**: the reading itself is outside its safe range,
//!    regardless of how it got there.
//!
//! A single tick may raise any combination of both.

pub mod alert;
pub mod walk;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::engine::state::{SensorField, SensorReadings};

pub use alert::{Alert, AlertKind};
pub use walk::{Perturbation, RandomWalk, WalkConfig};

/// Maximum tick-to-tick change per field before an anomaly is raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AnomalyThresholds {
    /// Temperature threshold (°C).
    #[validate(range(min = 0.0))]
    pub temperature: f64,
    /// Oxygen threshold (%).
    #[validate(range(min = 0.0))]
    pub oxygen: f64,
    /// Salinity threshold (PSU).
    #[validate(range(min = 0.0))]
    pub salinity: f64,
}

impl AnomalyThresholds {
    /// Threshold for a field.
    #[must_use]
    pub const fn get(&self, field: SensorField) -> f64 {
        match field {
            SensorField::Temperature => self.temperature,
            SensorField::Oxygen => self.oxygen,
            SensorField::Salinity => self.salinity,
        }
    }
}

impl Default for AnomalyThresholds {
    fn default() -> Self {
        Self {
            temperature: 5.0,
            oxygen: 8.0,
            salinity: 6.0,
        }
    }
}

/// Safe range for one field. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CriticalRange {
    /// Critical when the reading is strictly below this.
    #[serde(default)]
    pub below: Option<f64>,
    /// Critical when the reading is strictly above this.
    #[serde(default)]
    pub above: Option<f64>,
}

impl CriticalRange {
    /// Range with both bounds.
    #[must_use]
    pub const fn between(below: f64, above: f64) -> Self {
        Self {
            below: Some(below),
            above: Some(above),
        }
    }

    /// Range with only a lower bound.
    #[must_use]
    pub const fn at_least(below: f64) -> Self {
        Self {
            below: Some(below),
            above: None,
        }
    }

    /// Whether a value violates this range.
    #[must_use]
    pub fn is_violated_by(&self, value: f64) -> bool {
        self.below.is_some_and(|b| value < b) || self.above.is_some_and(|a| value > a)
    }

    /// Whether every set bound is a finite number.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.below.map_or(true, f64::is_finite) && self.above.map_or(true, f64::is_finite)
    }

    /// Whether the bounds are ordered (`below < above` when both are set).
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        match (self.below, self.above) {
            (Some(b), Some(a)) => b < a,
            _ => true,
        }
    }
}

/// Safe ranges for all simulated fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CriticalLimits {
    /// Temperature range (°C).
    pub temperature: CriticalRange,
    /// Oxygen range (%).
    pub oxygen: CriticalRange,
    /// Salinity range (PSU).
    pub salinity: CriticalRange,
}

impl CriticalLimits {
    /// Range for a field.
    #[must_use]
    pub const fn get(&self, field: SensorField) -> &CriticalRange {
        match field {
            SensorField::Temperature => &self.temperature,
            SensorField::Oxygen => &self.oxygen,
            SensorField::Salinity => &self.salinity,
        }
    }
}

impl Default for CriticalLimits {
    fn default() -> Self {
        Self {
            temperature: CriticalRange::between(5.0, 30.0),
            oxygen: CriticalRange::at_least(20.0),
            salinity: CriticalRange::between(10.0, 50.0),
        }
    }
}

/// Both alerting rules with their parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertRules {
    anomaly: AnomalyThresholds,
    critical: CriticalLimits,
}

impl AlertRules {
    /// Create rules from thresholds and limits.
    #[must_use]
    pub const fn new(anomaly: AnomalyThresholds, critical: CriticalLimits) -> Self {
        Self { anomaly, critical }
    }

    /// Anomaly thresholds.
    #[must_use]
    pub const fn anomaly_thresholds(&self) -> &AnomalyThresholds {
        &self.anomaly
    }

    /// Critical limits.
    #[must_use]
    pub const fn critical_limits(&self) -> &CriticalLimits {
        &self.critical
    }

    /// Raise one anomaly alert per field whose change exceeds its threshold.
    #[must_use]
    pub fn detect_anomalies(
        &self,
        current: &SensorReadings,
        previous: &SensorReadings,
    ) -> Vec<Alert> {
        SensorField::ALL
            .into_iter()
            .filter_map(|field| {
                let change = (current.get(field) - previous.get(field)).abs();
                (change > self.anomaly.get(field)).then(|| Alert::anomaly(field, change))
            })
            .collect()
    }

    /// Raise one critical alert per field outside its safe range.
    #[must_use]
    pub fn check_critical(&self, current: &SensorReadings) -> Vec<Alert> {
        SensorField::ALL
            .into_iter()
            .filter(|&field| self.critical.get(field).is_violated_by(current.get(field)))
            .map(Alert::critical)
            .collect()
    }

    /// Run both rules: anomalies first, then critical levels.
    #[must_use]
    pub fn evaluate(&self, current: &SensorReadings, previous: &SensorReadings) -> Vec<Alert> {
        let mut alerts = self.detect_anomalies(current, previous);
        alerts.extend(self.check_critical(current));
        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readings(temperature: f64, oxygen: f64, salinity: f64) -> SensorReadings {
        SensorReadings::new(temperature, oxygen, salinity, 7.2)
    }

    #[test]
    fn test_no_alerts_at_defaults() {
        let rules = AlertRules::default();
        let r = SensorReadings::default();
        assert!(rules.evaluate(&r, &r).is_empty());
    }

    #[test]
    fn test_anomaly_threshold_is_strict() {
        let rules = AlertRules::default();
        let previous = readings(10.0, 50.0, 35.0);

        // Exactly at each threshold: nothing
        let at = readings(15.0, 58.0, 41.0);
        assert!(rules.detect_anomalies(&at, &previous).is_empty());

        // Just past each threshold: one per field
        let past = readings(15.5, 41.5, 41.5);
        let alerts = rules.detect_anomalies(&past, &previous);
        assert_eq!(alerts.len(), 3);
        assert_eq!(
            alerts.iter().map(|a| a.field).collect::<Vec<_>>(),
            SensorField::ALL.to_vec()
        );
    }

    #[test]
    fn test_anomaly_reports_magnitude() {
        let rules = AlertRules::default();
        let alerts = rules.detect_anomalies(&readings(4.0, 50.0, 35.0), &readings(10.0, 50.0, 35.0));
        assert_eq!(alerts, vec![Alert::anomaly(SensorField::Temperature, 6.0)]);
    }

    #[test]
    fn test_critical_temperature_regardless_of_previous() {
        let rules = AlertRules::default();
        let alerts = rules.check_critical(&readings(3.0, 50.0, 35.0));
        assert_eq!(alerts, vec![Alert::critical(SensorField::Temperature)]);

        let alerts = rules.check_critical(&readings(31.0, 50.0, 35.0));
        assert_eq!(alerts, vec![Alert::critical(SensorField::Temperature)]);
    }

    #[test]
    fn test_critical_bounds_are_strict() {
        let rules = AlertRules::default();
        assert!(rules.check_critical(&readings(5.0, 20.0, 10.0)).is_empty());
        assert!(rules.check_critical(&readings(30.0, 20.0, 50.0)).is_empty());
    }

    #[test]
    fn test_oxygen_has_no_upper_limit() {
        let rules = AlertRules::default();
        assert!(rules.check_critical(&readings(10.0, 100.0, 35.0)).is_empty());
        assert_eq!(
            rules.check_critical(&readings(10.0, 19.9, 35.0)),
            vec![Alert::critical(SensorField::Oxygen)]
        );
    }

    #[test]
    fn test_salinity_limits() {
        let rules = AlertRules::default();
        assert_eq!(
            rules.check_critical(&readings(10.0, 50.0, 9.0)),
            vec![Alert::critical(SensorField::Salinity)]
        );
        assert_eq!(
            rules.check_critical(&readings(10.0, 50.0, 51.0)),
            vec![Alert::critical(SensorField::Salinity)]
        );
    }

    #[test]
    fn test_rules_are_independent() {
        let rules = AlertRules::default();
        // Δ=8 on temperature but 10 is within the safe range
        let alerts = rules.evaluate(&readings(10.0, 50.0, 35.0), &readings(2.0, 50.0, 35.0));
        assert_eq!(alerts, vec![Alert::anomaly(SensorField::Temperature, 8.0)]);
    }

    #[test]
    fn test_evaluate_orders_anomalies_before_criticals() {
        let rules = AlertRules::default();
        let alerts = rules.evaluate(&readings(40.0, 10.0, 35.0), &readings(30.0, 50.0, 35.0));
        assert_eq!(
            alerts,
            vec![
                Alert::anomaly(SensorField::Temperature, 10.0),
                Alert::anomaly(SensorField::Oxygen, 40.0),
                Alert::critical(SensorField::Temperature),
                Alert::critical(SensorField::Oxygen),
            ]
        );
    }

    #[test]
    fn test_critical_range_consistency() {
        assert!(CriticalRange::between(5.0, 30.0).is_consistent());
        assert!(!CriticalRange::between(30.0, 5.0).is_consistent());
        assert!(CriticalRange::at_least(20.0).is_consistent());
        assert!(CriticalRange::default().is_consistent());
        assert!(!CriticalRange::default().is_violated_by(-1e9));
    }

    #[test]
    fn test_limits_yaml() {
        let yaml = r"
temperature: { below: 4.0, above: 28.0 }
oxygen: { below: 25.0 }
salinity: {}
";
        let limits: CriticalLimits = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(limits.temperature, CriticalRange::between(4.0, 28.0));
        assert_eq!(limits.oxygen, CriticalRange::at_least(25.0));
        assert_eq!(limits.salinity, CriticalRange::default());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Falsification: an anomaly fires for a field iff |Δ| > threshold.
        #[test]
        fn prop_anomaly_iff_change_exceeds_threshold(
            t in 0.0f64..100.0, o in 0.0f64..100.0, s in 0.0f64..100.0,
            pt in 0.0f64..100.0, po in 0.0f64..100.0, ps in 0.0f64..100.0,
        ) {
            let rules = AlertRules::default();
            let current = SensorReadings::new(t, o, s, 7.0);
            let previous = SensorReadings::new(pt, po, ps, 7.0);
            let alerts = rules.detect_anomalies(&current, &previous);

            for field in SensorField::ALL {
                let expected = (current.get(field) - previous.get(field)).abs()
                    > rules.anomaly_thresholds().get(field);
                let count = alerts.iter().filter(|a| a.field == field).count();
                prop_assert_eq!(count, usize::from(expected));
            }
        }

        /// Falsification: critical alerts ignore the previous readings.
        #[test]
        fn prop_critical_is_pure_in_current(
            t in 0.0f64..100.0, o in 0.0f64..100.0, s in 0.0f64..100.0,
            pt in 0.0f64..100.0,
        ) {
            let rules = AlertRules::default();
            let current = SensorReadings::new(t, o, s, 7.0);
            let a = rules.evaluate(&current, &SensorReadings::new(pt, o, s, 7.0));
            let b = rules.evaluate(&current, &current);
            let crit_a: Vec<_> = a.into_iter().filter(Alert::is_critical).collect();
            let crit_b: Vec<_> = b.into_iter().filter(Alert::is_critical).collect();
            prop_assert_eq!(crit_a, crit_b);
        }
    }
}
