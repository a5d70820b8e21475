//! Terminal dashboard.
//!
//! Live view of the engine using ratatui: a chart of the three simulated
//! series, readouts, a notification panel and the override sliders.
//!
//! This module is only available with the `tui` feature.

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, List, ListItem, Paragraph},
};
use tracing::info;

use super::{DashboardState, FormField, OverrideForm};
use crate::engine::{MonitorEngine, SensorField, TickDriver, WallTime};
use crate::error::{MonitorError, MonitorResult};

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Leave the dashboard.
    Quit,
    /// Pause or resume ticking.
    TogglePause,
    /// Reset the engine to its initial state.
    Reset,
    /// Apply the override form.
    Apply,
    /// Select the next slider.
    NextSlider,
    /// Move the selected slider.
    Nudge(i32),
}

impl Command {
    /// Map a key to a command.
    #[must_use]
    pub const fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Self::Quit),
            KeyCode::Char('p' | ' ') => Some(Self::TogglePause),
            KeyCode::Char('r') => Some(Self::Reset),
            KeyCode::Enter => Some(Self::Apply),
            KeyCode::Tab => Some(Self::NextSlider),
            KeyCode::Char('+' | '=') | KeyCode::Right => Some(Self::Nudge(1)),
            KeyCode::Char('-') | KeyCode::Left => Some(Self::Nudge(-1)),
            KeyCode::Up => Some(Self::Nudge(10)),
            KeyCode::Down => Some(Self::Nudge(-10)),
            _ => None,
        }
    }
}

/// Interactive state that lives outside the engine.
#[derive(Debug)]
pub struct Session {
    /// Charts, readouts and notifications.
    pub view: DashboardState,
    /// Override sliders.
    pub form: OverrideForm,
    /// Ticking suspended.
    pub paused: bool,
    /// Loop keeps going while true.
    pub running: bool,
    /// Status line.
    pub status: String,
}

impl Session {
    /// Start a session for the engine's current state.
    #[must_use]
    pub fn new(engine: &MonitorEngine) -> Self {
        let mut view = DashboardState::new(&engine.config().dashboard);
        view.apply(&engine.snapshot());
        Self {
            form: OverrideForm::from_readings(&engine.state().readings()),
            view,
            paused: false,
            running: true,
            status: "Ready".to_string(),
        }
    }

    /// Execute a command against the engine.
    ///
    /// Returns true when the tick cadence should restart.
    pub fn execute(&mut self, command: Command, engine: &mut MonitorEngine) -> bool {
        match command {
            Command::Quit => {
                self.running = false;
                false
            }
            Command::TogglePause => {
                self.paused = !self.paused;
                self.status = if self.paused { "Paused" } else { "Resumed" }.to_string();
                !self.paused
            }
            Command::Reset => {
                engine.reset();
                self.view.clear();
                self.view.apply(&engine.snapshot());
                self.form = OverrideForm::from_readings(&engine.state().readings());
                self.status = "Reset to initial readings".to_string();
                true
            }
            Command::Apply => {
                match self.form.parse() {
                    Ok(readings) => {
                        let update = engine.apply_override(readings);
                        self.view.apply(&update);
                        self.status = "Override applied".to_string();
                    }
                    Err(e) => self.status = e.to_string(),
                }
                false
            }
            Command::NextSlider => {
                self.form.select_next();
                false
            }
            Command::Nudge(steps) => {
                self.form.nudge(steps);
                false
            }
        }
    }

    /// Status line text.
    #[must_use]
    pub fn status_text(&self) -> String {
        let mode = if self.paused { "PAUSED" } else { "RUNNING" };
        format!(
            "{mode} | tick {} | {}\n[Tab] slider  [+/-] adjust  [Enter] apply  [p] pause  [r] reset  [q] quit",
            self.view.tick(),
            self.status
        )
    }

    /// Status color based on state.
    #[must_use]
    pub const fn status_color(&self) -> Color {
        if self.paused {
            Color::Yellow
        } else {
            Color::Green
        }
    }
}

const fn series_color(field: SensorField) -> Color {
    match field {
        SensorField::Temperature => Color::Red,
        SensorField::Oxygen => Color::Cyan,
        SensorField::Salinity => Color::Yellow,
    }
}

/// Terminal front end.
pub struct DashboardTui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    refresh_hz: u32,
}

impl DashboardTui {
    /// Take over the terminal.
    ///
    /// # Errors
    ///
    /// Returns error if terminal initialization fails.
    pub fn new(refresh_hz: u32) -> MonitorResult<Self> {
        enable_raw_mode()
            .map_err(|e| MonitorError::terminal(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)
            .map_err(|e| MonitorError::terminal(format!("Failed to enter alternate screen: {e}")))?;

        let terminal = Terminal::new(CrosstermBackend::new(stdout))
            .map_err(|e| MonitorError::terminal(format!("Failed to create terminal: {e}")))?;

        Ok(Self {
            terminal,
            refresh_hz: refresh_hz.max(1),
        })
    }

    /// Run the dashboard until the user quits.
    ///
    /// # Errors
    ///
    /// Returns error if drawing or reading input fails.
    pub fn run(&mut self, engine: &mut MonitorEngine) -> MonitorResult<()> {
        let mut session = Session::new(engine);
        let mut driver = TickDriver::for_engine(WallTime::new(), engine);
        let frame_budget = Duration::from_millis(1000 / u64::from(self.refresh_hz));

        while session.running {
            if !session.paused {
                let updates = driver.poll(engine);
                session.view.apply_all(&updates);
            }
            session.view.expire_notifications(engine.current_time());

            self.render(&session)?;

            let wait = if session.paused {
                frame_budget
            } else {
                driver.until_next().min(frame_budget)
            };
            if event::poll(wait)
                .map_err(|e| MonitorError::terminal(format!("Event poll failed: {e}")))?
            {
                if let Event::Key(key) = event::read()
                    .map_err(|e| MonitorError::terminal(format!("Event read failed: {e}")))?
                {
                    if key.kind == KeyEventKind::Press {
                        if let Some(command) = Command::from_key(key.code) {
                            if session.execute(command, engine) {
                                driver.restart();
                            }
                        }
                    }
                }
            }
        }

        info!(ticks = engine.tick_count(), "dashboard closed");
        Ok(())
    }

    fn render(&mut self, session: &Session) -> MonitorResult<()> {
        self.terminal
            .draw(|frame| {
                let area = frame.area();

                // Left: chart over status. Right: readouts, sliders, alerts.
                let main = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
                    .split(area);

                let left = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(10), Constraint::Length(4)])
                    .split(main[0]);

                let right = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(6),
                        Constraint::Length(6),
                        Constraint::Min(3),
                    ])
                    .split(main[1]);

                let points: Vec<Vec<(f64, f64)>> = SensorField::ALL
                    .iter()
                    .map(|f| session.view.series(*f).points())
                    .collect();
                frame.render_widget(Self::chart(session, &points), left[0]);
                frame.render_widget(Self::status(session), left[1]);
                frame.render_widget(Self::readouts(session), right[0]);
                frame.render_widget(Self::sliders(session), right[1]);
                frame.render_widget(Self::notifications(session), right[2]);
            })
            .map_err(|e| MonitorError::terminal(format!("Render failed: {e}")))?;
        Ok(())
    }

    fn chart<'a>(session: &Session, points: &'a [Vec<(f64, f64)>]) -> Chart<'a> {
        let datasets = SensorField::ALL
            .iter()
            .zip(points)
            .map(|(field, data)| {
                Dataset::default()
                    .name(field.label())
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(series_color(*field)))
                    .data(data)
            })
            .collect();

        let (first, last) = session
            .view
            .series(SensorField::Temperature)
            .tick_range()
            .unwrap_or((0, 1));
        let x_max = (last as f64).max(first as f64 + 1.0);

        Chart::new(datasets)
            .block(
                Block::default()
                    .title(" Sensor Readings ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Blue)),
            )
            .x_axis(
                Axis::default()
                    .title("tick")
                    .bounds([first as f64, x_max])
                    .labels([first.to_string(), last.to_string()]),
            )
            .y_axis(
                Axis::default()
                    .bounds([0.0, 100.0])
                    .labels(["0", "50", "100"]),
            )
    }

    fn status(session: &Session) -> Paragraph<'static> {
        Paragraph::new(session.status_text()).block(
            Block::default()
                .title(" Controls ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(session.status_color())),
        )
    }

    fn readouts(session: &Session) -> Paragraph<'static> {
        let r = session.view.readouts();
        let text = format!(
            "Temperature: {}\nOxygen:      {}\nSalinity:    {}\npH:          {}",
            r.temperature, r.oxygen, r.salinity, r.ph
        );
        Paragraph::new(text).block(
            Block::default()
                .title(" Current ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta)),
        )
    }

    fn sliders(session: &Session) -> Paragraph<'static> {
        let selected = session.form.selected();
        let text = FormField::ALL
            .iter()
            .map(|f| {
                let cursor = if *f == selected { ">" } else { " " };
                format!("{cursor} {:<18} {}", f.label(), session.form.input(*f))
            })
            .collect::<Vec<_>>()
            .join("\n");
        Paragraph::new(text).block(
            Block::default()
                .title(" Manual Override ")
                .borders(Borders::ALL),
        )
    }

    fn notifications(session: &Session) -> List<'static> {
        let items: Vec<ListItem> = session
            .view
            .notifications()
            .active()
            .map(|n| ListItem::new(n.message.clone()).style(Style::default().fg(Color::Red)))
            .collect();
        List::new(items).block(Block::default().title(" Alerts ").borders(Borders::ALL))
    }

    fn restore_terminal(&mut self) -> MonitorResult<()> {
        disable_raw_mode()
            .map_err(|e| MonitorError::terminal(format!("Failed to disable raw mode: {e}")))?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
            .map_err(|e| MonitorError::terminal(format!("Failed to leave alternate screen: {e}")))?;
        self.terminal
            .show_cursor()
            .map_err(|e| MonitorError::terminal(format!("Failed to show cursor: {e}")))?;
        Ok(())
    }
}

impl Drop for DashboardTui {
    fn drop(&mut self) {
        // Best effort
        let _ = self.restore_terminal();
    }
}
