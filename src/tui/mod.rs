//! Ratatui-based input form.
//!
//! Left: the receivable form with a live percent-paid preview. Right: the
//! latest prediction (outcome, confidence, recommendation, optional feature
//! table) above a side panel with model information and usage notes.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
};
use tracing::warn;

use crate::app::pipeline::{RunOutput, run_prediction};
use crate::domain::FEATURE_LABELS;
use crate::error::AppError;
use crate::predict::PredictionService;
use crate::report::{
    format_amount, format_count, format_feature_value, format_model_line, format_percent, format_top_features,
};

pub mod form;

use form::{Field, FormState};

/// Start the TUI.
pub fn run(service: PredictionService<'static>) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::terminal(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(service);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::terminal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::terminal(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    service: PredictionService<'static>,
    form: FormState,
    show_details: bool,
    status: String,
    run: Option<RunOutput>,
}

impl App {
    fn new(service: PredictionService<'static>) -> Self {
        Self {
            service,
            form: FormState::default(),
            show_details: false,
            status: "Fill in the form and press p to predict.".to_string(),
            run: None,
        }
    }

    fn categories(&self) -> &'static [String] {
        self.service.artifacts().encoder.classes()
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::terminal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::terminal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::terminal(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        if self.form.editing.is_some() {
            self.handle_amount_edit(code);
            return Ok(false);
        }

        let n_categories = self.categories().len();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Up => self.form.selected = self.form.selected.prev(),
            KeyCode::Down | KeyCode::Tab => self.form.selected = self.form.selected.next(),
            KeyCode::Left => self.form.adjust(-1, n_categories),
            KeyCode::Right => self.form.adjust(1, n_categories),
            KeyCode::Enter => {
                if self.form.selected == Field::Submit {
                    self.predict()?;
                } else if self.form.start_edit() {
                    self.status = "Type digits. Enter to apply, Esc to cancel.".to_string();
                }
            }
            KeyCode::Char('p') => self.predict()?,
            KeyCode::Char('d') => {
                self.show_details = !self.show_details;
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_amount_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.form.cancel_edit();
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.status = self
                    .form
                    .commit_edit()
                    .unwrap_or_else(|| "Value updated.".to_string());
            }
            KeyCode::Backspace => self.form.pop_digit(),
            KeyCode::Char(c) => self.form.push_digit(c),
            _ => {}
        }
    }

    /// Operator errors stay on screen; artifact errors end the session.
    fn predict(&mut self) -> Result<(), AppError> {
        let Some(input) = self.form.to_input(self.categories()) else {
            self.status = "No tax category selected.".to_string();
            return Ok(());
        };

        self.apply_outcome(run_prediction(&self.service, input))
    }

    fn apply_outcome(&mut self, outcome: Result<RunOutput, AppError>) -> Result<(), AppError> {
        match outcome {
            Ok(run) => {
                self.status = format!(
                    "{} ({} confidence)",
                    run.result.outcome_label(),
                    format_percent(run.result.confidence)
                );
                self.run = Some(run);
                Ok(())
            }
            Err(err) if err.kind().is_recoverable() => {
                warn!("{err}");
                self.status = err.to_string();
                self.run = None;
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let metadata = &self.service.artifacts().metadata;
        let lines = vec![
            Line::from(vec![
                Span::styled("settle", Style::default().fg(Color::Cyan)),
                Span::raw(" - Local tax receivable settlement prediction"),
            ]),
            Line::from(Span::styled(format_model_line(metadata), Style::default().fg(Color::Gray))),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(40), Constraint::Percentage(25)])
            .split(area);

        self.draw_form(frame, columns[0]);
        self.draw_result(frame, columns[1]);
        self.draw_sidebar(frame, columns[2]);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(9), Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let category = self
            .categories()
            .get(self.form.category_idx)
            .map(String::as_str)
            .unwrap_or("-");

        let amount = |field: Field, value: i64| match (&self.form.editing, self.form.selected == field) {
            (Some(buf), true) => format!("{buf}_"),
            _ => format_amount(value),
        };

        let items = vec![
            ListItem::new(format!("Tax year:        ‹ {} ›", self.form.year)),
            ListItem::new(format!("Tax category:    ‹ {category} ›")),
            ListItem::new(format!(
                "Opening balance: {}",
                amount(Field::OpeningBalance, self.form.opening_balance)
            )),
            ListItem::new(format!("Amount paid:     {}", amount(Field::AmountPaid, self.form.amount_paid))),
            ListItem::new(Span::styled(
                "[ PREDICT SETTLEMENT STATUS ]",
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];

        let list = List::new(items)
            .block(Block::default().title("Receivable input").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.form.selected.index()));
        frame.render_stateful_widget(list, rows[0], &mut state);

        let preview = Paragraph::new(format!("Percent paid: {}", format_percent(self.form.percent_paid())))
            .style(Style::default().fg(Color::Cyan))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(preview, rows[1]);
    }

    fn draw_result(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Prediction").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("No prediction yet.").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };
        let result = &run.result;

        let details_height = if self.show_details { 8 } else { 0 };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(details_height),
            ])
            .split(inner);

        let color = if result.settled { Color::Green } else { Color::Red };
        let banner = Paragraph::new(Span::styled(
            result.outcome_label(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(banner, rows[0]);

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color))
            .ratio((result.confidence / 100.0).clamp(0.0, 1.0))
            .label(format!("Confidence {}", format_percent(result.confidence)));
        frame.render_widget(gauge, rows[1]);

        let mut lines = vec![
            Line::raw(""),
            Line::from(Span::styled(
                format!("{}:", result.recommendation.title()),
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];
        lines.extend(result.recommendation.lines().iter().map(|l| Line::raw(format!("- {l}"))));
        frame.render_widget(Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true }), rows[2]);

        if self.show_details {
            let mut detail = vec![Line::from(Span::styled(
                "Feature values used",
                Style::default().add_modifier(Modifier::BOLD),
            ))];
            for (idx, (name, value)) in result.features.named().enumerate() {
                let shown = format_feature_value(idx, value);
                detail.push(Line::raw(format!("{:<16} {name:<24} {shown}", FEATURE_LABELS[idx])));
            }
            frame.render_widget(Paragraph::new(Text::from(detail)), rows[3]);
        }
    }

    fn draw_sidebar(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let metadata = &self.service.artifacts().metadata;
        let mut lines = vec![Line::from(Span::styled(
            "Top features",
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        lines.extend(format_top_features(metadata).into_iter().map(Line::raw));
        if let Some(n) = metadata.training_records {
            lines.push(Line::raw(format!("Trained on {} records", format_count(n))));
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled("How to use", Style::default().add_modifier(Modifier::BOLD))));
        for step in [
            "1. Choose the tax year",
            "2. Choose the tax category",
            "3. Enter the opening balance",
            "4. Enter the amount paid",
            "5. Press p to predict",
        ] {
            lines.push(Line::raw(step));
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled("Status", Style::default().add_modifier(Modifier::BOLD))));
        lines.push(Line::from(Span::styled(
            "Settled: closing balance = 0",
            Style::default().fg(Color::Green),
        )));
        lines.push(Line::from(Span::styled(
            "Not settled: closing balance > 0",
            Style::default().fg(Color::Red),
        )));

        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .block(Block::default().title("About").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter edit amount  p predict  d details  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}
