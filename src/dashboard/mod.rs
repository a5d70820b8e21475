//! Headless dashboard model.
//!
//! Consumes [`EngineUpdate`]s and keeps everything a front end needs to
//! draw: one rolling chart window per simulated field, the current
//! readouts, transient notifications, and the manual-override form.
//! Nothing here touches a terminal; see `tui` for the ratatui front end.

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;
use crate::engine::{EngineUpdate, SensorField, SensorReadings, SimTime};
use crate::error::{MonitorError, MonitorResult};

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(feature = "tui")]
pub use tui::DashboardTui;

// ============================================================================
// Time series
// ============================================================================

/// Chart sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Tick number the sample was taken at.
    pub tick: u64,
    /// Reading.
    pub value: f64,
}

/// Rolling buffer for one chart series.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    data: VecDeque<DataPoint>,
    capacity: usize,
    name: String,
}

impl TimeSeries {
    /// Create new time series with capacity.
    #[must_use]
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: VecDeque::with_capacity(capacity),
            capacity,
            name: name.into(),
        }
    }

    /// Push a sample, evicting the oldest when full.
    pub fn push(&mut self, tick: u64, value: f64) {
        if self.data.len() >= self.capacity {
            self.data.pop_front();
        }
        self.data.push_back(DataPoint { tick, value });
    }

    /// Samples, oldest first.
    #[must_use]
    pub const fn data(&self) -> &VecDeque<DataPoint> {
        &self.data
    }

    /// Samples as `(x, y)` pairs for plotting.
    #[must_use]
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.data.iter().map(|p| (p.tick as f64, p.value)).collect()
    }

    /// Series name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Maximum number of samples kept.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent value.
    #[must_use]
    pub fn last_value(&self) -> Option<f64> {
        self.data.back().map(|p| p.value)
    }

    /// Smallest value in the window.
    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.data
            .iter()
            .map(|p| p.value)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Largest value in the window.
    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.data
            .iter()
            .map(|p| p.value)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// First and last tick in the window.
    #[must_use]
    pub fn tick_range(&self) -> Option<(u64, u64)> {
        Some((self.data.front()?.tick, self.data.back()?.tick))
    }

    /// Drop every sample.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }
}

// ============================================================================
// Readouts
// ============================================================================

/// Formatted current values, one decimal place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Readouts {
    /// e.g. `10.0°C`
    pub temperature: String,
    /// e.g. `50.0%`
    pub oxygen: String,
    /// e.g. `35.0 PSU`
    pub salinity: String,
    /// e.g. `7.2`
    pub ph: String,
}

impl Readouts {
    /// Format a set of readings.
    #[must_use]
    pub fn from_readings(r: &SensorReadings) -> Self {
        Self {
            temperature: format!("{:.1}°C", r.temperature),
            oxygen: format!("{:.1}%", r.oxygen),
            salinity: format!("{:.1} PSU", r.salinity),
            ph: format!("{:.1}", r.ph),
        }
    }

    /// Readout for one simulated field.
    #[must_use]
    pub fn get(&self, field: SensorField) -> &str {
        match field {
            SensorField::Temperature => &self.temperature,
            SensorField::Oxygen => &self.oxygen,
            SensorField::Salinity => &self.salinity,
        }
    }
}

impl Default for Readouts {
    fn default() -> Self {
        Self::from_readings(&SensorReadings::default())
    }
}

// ============================================================================
// Notifications
// ============================================================================

/// A transient message shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Text.
    pub message: String,
    /// When it was raised.
    pub raised_at: SimTime,
    /// When it disappears.
    pub expires_at: SimTime,
}

/// Notifications that dismiss themselves after a fixed lifetime.
#[derive(Debug, Clone)]
pub struct NotificationTray {
    items: VecDeque<Notification>,
    lifetime_nanos: u64,
}

impl NotificationTray {
    /// Create a tray with the given notification lifetime.
    #[must_use]
    pub fn new(lifetime: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            lifetime_nanos: u64::try_from(lifetime.as_nanos()).unwrap_or(u64::MAX),
        }
    }

    /// Raise a notification at `now`.
    pub fn push(&mut self, message: impl Into<String>, now: SimTime) {
        self.items.push_back(Notification {
            message: message.into(),
            raised_at: now,
            expires_at: now.add_nanos(self.lifetime_nanos),
        });
    }

    /// Remove everything that has expired by `now`.
    ///
    /// Returns how many were removed.
    pub fn expire(&mut self, now: SimTime) -> usize {
        let before = self.items.len();
        self.items.retain(|n| n.expires_at > now);
        before - self.items.len()
    }

    /// Visible notifications, oldest first.
    pub fn active(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    /// Number of visible notifications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Dismiss everything.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

// ============================================================================
// Dashboard state
// ============================================================================

/// Everything the dashboard shows.
#[derive(Debug, Clone)]
pub struct DashboardState {
    temperature: TimeSeries,
    oxygen: TimeSeries,
    salinity: TimeSeries,
    readings: SensorReadings,
    readouts: Readouts,
    notifications: NotificationTray,
    tick: u64,
    alerts_seen: u64,
}

impl DashboardState {
    /// Create an empty dashboard.
    #[must_use]
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            temperature: TimeSeries::new(SensorField::Temperature.label(), config.window),
            oxygen: TimeSeries::new(SensorField::Oxygen.label(), config.window),
            salinity: TimeSeries::new(SensorField::Salinity.label(), config.window),
            readings: SensorReadings::default(),
            readouts: Readouts::default(),
            notifications: NotificationTray::new(config.notification_lifetime()),
            tick: 0,
            alerts_seen: 0,
        }
    }

    /// Fold one engine update into the view.
    ///
    /// Ticks add a chart sample per field. Overrides only refresh the
    /// readouts; the chart changes on the next tick.
    pub fn apply(&mut self, update: &EngineUpdate) {
        let readings = update.state.readings();

        if update.is_tick() {
            for field in SensorField::ALL {
                self.series_mut(field).push(update.tick, readings.get(field));
            }
        }

        for alert in &update.alerts {
            self.notifications.push(alert.message(), update.time);
            self.alerts_seen += 1;
        }

        self.readings = readings;
        self.readouts = Readouts::from_readings(&readings);
        self.tick = update.tick;
    }

    /// Fold a batch of updates, in order.
    pub fn apply_all<'a>(&mut self, updates: impl IntoIterator<Item = &'a EngineUpdate>) {
        for update in updates {
            self.apply(update);
        }
    }

    /// Drop expired notifications.
    pub fn expire_notifications(&mut self, now: SimTime) -> usize {
        self.notifications.expire(now)
    }

    /// Empty the charts and notifications (after an engine reset).
    pub fn clear(&mut self) {
        for field in SensorField::ALL {
            self.series_mut(field).clear();
        }
        self.notifications.clear();
        self.readings = SensorReadings::default();
        self.readouts = Readouts::default();
        self.tick = 0;
    }

    /// Chart series for a field.
    #[must_use]
    pub const fn series(&self, field: SensorField) -> &TimeSeries {
        match field {
            SensorField::Temperature => &self.temperature,
            SensorField::Oxygen => &self.oxygen,
            SensorField::Salinity => &self.salinity,
        }
    }

    fn series_mut(&mut self, field: SensorField) -> &mut TimeSeries {
        match field {
            SensorField::Temperature => &mut self.temperature,
            SensorField::Oxygen => &mut self.oxygen,
            SensorField::Salinity => &mut self.salinity,
        }
    }

    /// Latest readings.
    #[must_use]
    pub const fn readings(&self) -> &SensorReadings {
        &self.readings
    }

    /// Formatted readouts.
    #[must_use]
    pub const fn readouts(&self) -> &Readouts {
        &self.readouts
    }

    /// Notification tray.
    #[must_use]
    pub const fn notifications(&self) -> &NotificationTray {
        &self.notifications
    }

    /// Tick of the last update.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Alerts received since creation.
    #[must_use]
    pub const fn alerts_seen(&self) -> u64 {
        self.alerts_seen
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(&DashboardConfig::default())
    }
}

// ============================================================================
// Override form
// ============================================================================

/// One input of the override form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    /// Water temperature.
    Temperature,
    /// Dissolved oxygen.
    Oxygen,
    /// Salinity.
    Salinity,
    /// pH.
    Ph,
}

impl FormField {
    /// All inputs in display order.
    pub const ALL: [Self; 4] = [Self::Temperature, Self::Oxygen, Self::Salinity, Self::Ph];

    /// Key used in error messages.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Oxygen => "oxygen",
            Self::Salinity => "salinity",
            Self::Ph => "ph",
        }
    }

    /// Slider label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature (°C)",
            Self::Oxygen => "Oxygen Level (%)",
            Self::Salinity => "Salinity (PSU)",
            Self::Ph => "pH",
        }
    }

    /// Slider increment.
    #[must_use]
    pub const fn step(self) -> f64 {
        match self {
            Self::Ph => 0.1,
            _ => 1.0,
        }
    }

    /// Slider range.
    #[must_use]
    pub const fn range(self) -> (f64, f64) {
        match self {
            Self::Temperature => (0.0, 40.0),
            Self::Ph => (0.0, 14.0),
            _ => (0.0, 100.0),
        }
    }
}

/// Raw text of the four override inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideForm {
    /// Temperature input.
    pub temperature: String,
    /// Oxygen input.
    pub oxygen: String,
    /// Salinity input.
    pub salinity: String,
    /// pH input.
    pub ph: String,
    selected: usize,
}

impl OverrideForm {
    /// Form prefilled with the given readings.
    #[must_use]
    pub fn from_readings(r: &SensorReadings) -> Self {
        Self {
            temperature: format!("{:.1}", r.temperature),
            oxygen: format!("{:.1}", r.oxygen),
            salinity: format!("{:.1}", r.salinity),
            ph: format!("{:.1}", r.ph),
            selected: 0,
        }
    }

    /// Text of one input.
    #[must_use]
    pub fn input(&self, field: FormField) -> &str {
        match field {
            FormField::Temperature => &self.temperature,
            FormField::Oxygen => &self.oxygen,
            FormField::Salinity => &self.salinity,
            FormField::Ph => &self.ph,
        }
    }

    fn input_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Temperature => &mut self.temperature,
            FormField::Oxygen => &mut self.oxygen,
            FormField::Salinity => &mut self.salinity,
            FormField::Ph => &mut self.ph,
        }
    }

    /// Replace the text of one input.
    pub fn set_input(&mut self, field: FormField, text: impl Into<String>) {
        *self.input_mut(field) = text.into();
    }

    /// Currently selected slider.
    #[must_use]
    pub const fn selected(&self) -> FormField {
        FormField::ALL[self.selected % FormField::ALL.len()]
    }

    /// Move the selection to the next slider.
    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % FormField::ALL.len();
    }

    /// Move the selected slider by `steps` increments, clamped to its range.
    ///
    /// An unparsable input restarts from the bottom of the range.
    pub fn nudge(&mut self, steps: i32) {
        let field = self.selected();
        let (lo, hi) = field.range();
        let current = self.input(field).trim().parse::<f64>().unwrap_or(lo);
        let next = (current + f64::from(steps) * field.step()).clamp(lo, hi);
        self.set_input(field, format!("{next:.1}"));
    }

    /// Parse every input.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidOverride`] naming the first input that
    /// is empty, not a number, or not finite.
    pub fn parse(&self) -> MonitorResult<SensorReadings> {
        let value = |field: FormField| -> MonitorResult<f64> {
            let text = self.input(field).trim();
            if text.is_empty() {
                return Err(MonitorError::invalid_override(field.key(), "value is required"));
            }
            let v: f64 = text.parse().map_err(|_| {
                MonitorError::invalid_override(field.key(), format!("'{text}' is not a number"))
            })?;
            if !v.is_finite() {
                return Err(MonitorError::invalid_override(field.key(), "value must be finite"));
            }
            Ok(v)
        };

        Ok(SensorReadings::new(
            value(FormField::Temperature)?,
            value(FormField::Oxygen)?,
            value(FormField::Salinity)?,
            value(FormField::Ph)?,
        ))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Falsification: the window holds the newest samples, oldest first.
        #[test]
        fn prop_window_keeps_newest_in_order(
            capacity in 1usize..50,
            values in proptest::collection::vec(0.0f64..100.0, 0..200),
        ) {
            let mut series = TimeSeries::new("prop", capacity);
            for (i, v) in values.iter().enumerate() {
                series.push(i as u64 + 1, *v);
            }

            let keep = values.len().min(capacity);
            prop_assert_eq!(series.len(), keep);

            let expected: Vec<f64> = values[values.len() - keep..].to_vec();
            let actual: Vec<f64> = series.data().iter().map(|p| p.value).collect();
            prop_assert_eq!(actual, expected);

            let ticks: Vec<u64> = series.data().iter().map(|p| p.tick).collect();
            prop_assert!(ticks.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
