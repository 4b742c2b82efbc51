use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Axis, Block, Borders, Clear, Dataset, GraphType, Paragraph};

use boog_terminal::chart::{ChartSpec, TickFormat, X_LABEL, format_tick};
use boog_terminal::loader::spawn_dataset_loader;
use boog_terminal::state::{AppState, Delta, PickerFocus, Screen, apply_delta};

struct App {
    state: AppState,
    should_quit: bool,
    export_dir: PathBuf,
    // Hit area of the dropdown rows from the last draw, for click selection.
    dropdown_hit: Option<(Rect, usize)>,
}

impl App {
    fn new() -> Self {
        let export_dir = std::env::var("BOOG_EXPORT_DIR")
            .unwrap_or_else(|_| "exports".to_string())
            .into();
        Self {
            state: AppState::new(),
            should_quit: false,
            export_dir,
            dropdown_hit: None,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        if key.code == KeyCode::Char('?') {
            self.state.help_overlay = !self.state.help_overlay;
            return;
        }

        match self.state.screen {
            Screen::Picker => self.on_picker_key(key),
            Screen::Charts => self.on_charts_key(key),
        }
    }

    fn on_picker_key(&mut self, key: KeyEvent) {
        if !self.state.dataset_ready() {
            // Pre-load window: nothing to interact with yet.
            if key.code == KeyCode::Char('q') || key.code == KeyCode::Esc {
                self.should_quit = true;
            }
            return;
        }

        let in_search = self.state.focus == PickerFocus::Search;
        match key.code {
            KeyCode::Tab => {
                self.state.autocomplete.hide();
                self.state.cycle_focus();
            }
            KeyCode::Esc => {
                if self.state.autocomplete.visible() {
                    self.state.autocomplete.hide();
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Up | KeyCode::Down if in_search => {
                self.state.autocomplete_key(key.code);
            }
            KeyCode::Enter if in_search => {
                self.state.autocomplete_key(key.code);
            }
            KeyCode::Backspace if in_search => self.state.search_backspace(),
            KeyCode::Char(c) if in_search => self.state.search_push(c),
            KeyCode::Up | KeyCode::Char('k') => self.state.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.state.select_next(),
            KeyCode::Enter if self.state.focus == PickerFocus::Browse => {
                self.state.add_browse_selection();
            }
            KeyCode::Char('x') | KeyCode::Delete
                if self.state.focus == PickerFocus::Roster =>
            {
                self.state.remove_selected();
            }
            KeyCode::Char('X') if self.state.focus == PickerFocus::Roster => {
                self.state.remove_all();
            }
            KeyCode::Char('g') => {
                if self.state.render_charts() {
                    self.state.screen = Screen::Charts;
                }
            }
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn on_charts_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.state.prev_chart_tab(),
            KeyCode::Right | KeyCode::Char('l') => self.state.next_chart_tab(),
            KeyCode::Char('e') => {
                let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
                let dir = self.export_dir.clone();
                self.state.export_charts(&dir, &stamp);
            }
            KeyCode::Char('b') | KeyCode::Esc => self.state.screen = Screen::Picker,
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let Some((area, start)) = self.dropdown_hit else {
            return;
        };
        let inside = mouse.column >= area.x
            && mouse.column < area.x + area.width
            && mouse.row >= area.y
            && mouse.row < area.y + area.height;
        if !inside {
            return;
        }
        let index = start + (mouse.row - area.y) as usize;
        let Some(text) = self.state.autocomplete.results().get(index).cloned() else {
            return;
        };
        self.state.autocomplete_click(&text);
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let source = std::env::var("BOOG_DATA").unwrap_or_else(|_| "boog.json".to_string());
    spawn_dataset_loader(source, tx);

    let mut app = App::new();
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
                Event::Mouse(mouse) => app.on_mouse(mouse),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    app.dropdown_hit = None;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Picker => render_picker(frame, chunks[1], app),
        Screen::Charts => render_charts_screen(frame, chunks[1], &app.state),
    }

    let footer =
        Paragraph::new(footer_text(&app.state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    match state.screen {
        Screen::Picker => {
            let players = state
                .dataset
                .as_ref()
                .map(|d| format!("{} players", d.len()))
                .unwrap_or_else(|| "loading".to_string());
            format!("BOOG TERMINAL | Picker | {players}")
        }
        Screen::Charts => {
            let title = state
                .current_chart()
                .map(|spec| spec.title.as_str())
                .unwrap_or("no charts");
            format!(
                "BOOG TERMINAL | Charts {}/{} | {title}",
                state.chart_tab + 1,
                state.charts.len().max(1)
            )
        }
    }
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Picker if !state.dataset_ready() => "q Quit | ? Help".to_string(),
        Screen::Picker => {
            let mut text = match state.focus {
                PickerFocus::Search => {
                    "Type to search | ↑/↓ Highlight | Enter Add | Esc Close | Tab Focus"
                        .to_string()
                }
                PickerFocus::Browse => {
                    "j/k/↑/↓ Move | Enter Add | g Graphs | Tab Focus | q Quit".to_string()
                }
                PickerFocus::Roster => {
                    "j/k/↑/↓ Move | x Remove | g Graphs | Tab Focus | q Quit".to_string()
                }
            };
            // The remove-all affordance only exists while the list is
            // non-empty.
            if state.focus == PickerFocus::Roster && !state.roster.is_empty() {
                text = text.replace("x Remove |", "x Remove | X Remove All |");
            }
            text
        }
        Screen::Charts => {
            "←/→ Metric | e Export PNG | b/Esc Back | ? Help | q Quit".to_string()
        }
    }
}

fn render_picker(frame: &mut Frame, area: Rect, app: &mut App) {
    let state = &app.state;
    if !state.dataset_ready() {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(6)])
            .split(area);
        let loading = Paragraph::new("Loading dataset...")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(loading, rows[0]);
        render_console(frame, rows[1], state);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(44)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(columns[0]);

    render_search_box(frame, left[0], state);
    render_browse_list(frame, left[1], state);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(8)])
        .split(columns[1]);

    render_roster(frame, right[0], state);
    render_console(frame, right[1], state);

    // The dropdown overlays whatever sits under the search box.
    if state.autocomplete.visible() {
        app.dropdown_hit = render_dropdown(frame, left[0], left[1], &app.state);
    }
}

fn render_search_box(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.focus == PickerFocus::Search;
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let text = if state.search.is_empty() && !focused {
        "Add players".to_string()
    } else {
        format!("{}{}", state.search, if focused { "_" } else { "" })
    };
    let search = Paragraph::new(text).style(style).block(
        Block::default()
            .title("Search")
            .borders(Borders::ALL)
            .border_style(style),
    );
    frame.render_widget(search, area);
}

/// Draws the autocomplete dropdown under the search box, keeping the
/// highlighted row inside the visible window. Returns the row hit area and
/// window start for click handling.
fn render_dropdown(
    frame: &mut Frame,
    search_area: Rect,
    below: Rect,
    state: &AppState,
) -> Option<(Rect, usize)> {
    let results = state.autocomplete.results();
    let inner_height = results.len().clamp(1, 8) as u16;
    let height = (inner_height + 2).min(below.height);
    if height < 3 || search_area.width < 4 {
        return None;
    }
    let area = Rect {
        x: search_area.x,
        y: below.y,
        width: search_area.width,
        height,
    };
    frame.render_widget(Clear, area);
    let block = Block::default().borders(Borders::ALL).title("Matches");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if results.is_empty() {
        let empty = Paragraph::new("No matches").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return None;
    }

    let cursor = state.autocomplete.cursor();
    let selected = usize::try_from(cursor).unwrap_or(0);
    let (start, end) = visible_range(selected, results.len(), inner.height as usize);

    for (row, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: inner.x,
            y: inner.y + row as u16,
            width: inner.width,
            height: 1,
        };
        let style = if cursor >= 0 && idx == selected {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default()
        };
        frame.render_widget(Paragraph::new(results[idx].as_str()).style(style), row_area);
    }

    Some((inner, start))
}

fn render_browse_list(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.focus == PickerFocus::Browse;
    let block = Block::default()
        .title("All Players")
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let Some(dataset) = &state.dataset else {
        return;
    };
    let names = dataset.names();
    let (start, end) = visible_range(state.browse_selected, names.len(), inner.height as usize);

    for (row, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: inner.x,
            y: inner.y + row as u16,
            width: inner.width,
            height: 1,
        };
        let chosen = state.roster.contains(&names[idx]);
        let mut style = if focused && idx == state.browse_selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if chosen {
            style = style.add_modifier(Modifier::DIM);
        }
        let marker = if chosen { "+ " } else { "  " };
        let line = format!("{marker}{}", names[idx]);
        frame.render_widget(Paragraph::new(line).style(style), row_area);
    }
}

fn render_roster(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.focus == PickerFocus::Roster;
    let block = Block::default()
        .title(format!("Chosen Players ({})", state.roster.len()))
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    if state.roster.is_empty() {
        let empty = Paragraph::new("No players chosen yet")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let names = state.roster.selected();
    let (start, end) = visible_range(state.roster_selected, names.len(), inner.height as usize);
    for (row, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: inner.x,
            y: inner.y + row as u16,
            width: inner.width,
            height: 1,
        };
        let style = if focused && idx == state.roster_selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        let line = format!("{} (x)", names[idx]);
        frame.render_widget(Paragraph::new(line).style(style), row_area);
    }
}

fn render_console(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Console").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let take = inner.height as usize;
    let text = if state.logs.is_empty() {
        "No messages yet".to_string()
    } else {
        state
            .logs
            .iter()
            .rev()
            .take(take)
            .cloned()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect::<Vec<_>>()
            .join("\n")
    };
    frame.render_widget(Paragraph::new(text), inner);
}

fn render_charts_screen(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(6)])
        .split(area);

    match state.current_chart() {
        Some(spec) => render_chart(frame, rows[0], spec),
        None => {
            let empty = Paragraph::new("No charts built; go back and press g")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(empty, rows[0]);
        }
    }

    render_console(frame, rows[1], state);
}

fn render_chart(frame: &mut Frame, area: Rect, spec: &ChartSpec) {
    let datasets: Vec<Dataset> = spec
        .series
        .iter()
        .map(|series| {
            let (r, g, b) = series.color;
            Dataset::default()
                .name(series.player.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Rgb(r, g, b)))
                .data(&series.points)
        })
        .collect();

    let x_labels = axis_labels(spec.x_domain, 3, TickFormat::Plain);
    let y_labels = axis_labels(spec.y_domain, 5, spec.y_format);

    let chart = ratatui::widgets::Chart::new(datasets)
        .block(
            Block::default()
                .title(spec.title.clone())
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title(X_LABEL)
                .bounds(spec.x_domain)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(spec.y_label.clone())
                .bounds(spec.y_domain)
                .labels(y_labels),
        );
    frame.render_widget(chart, area);
}

// ratatui spreads axis labels evenly between the bounds, so labels must be
// evenly spaced samples of the domain rather than the tick positions.
fn axis_labels(domain: [f64; 2], count: usize, format: TickFormat) -> Vec<Span<'static>> {
    let steps = count.max(2) - 1;
    (0..=steps)
        .map(|i| {
            let value = domain[0] + (domain[1] - domain[0]) * i as f64 / steps as f64;
            Span::from(format_tick(value, format))
        })
        .collect()
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "BOOG Terminal - Help",
        "",
        "Picker:",
        "  Tab          Cycle focus (search / all players / chosen)",
        "  type         Search players (search focus)",
        "  ↑/↓          Move highlight",
        "  Enter        Add highlighted player",
        "  x / Del      Remove chosen player (roster focus)",
        "  X            Remove all (roster focus)",
        "  g            Build graphs",
        "",
        "Charts:",
        "  ←/→ or h/l   Switch metric",
        "  e            Export PNGs",
        "  b / Esc      Back to picker",
        "",
        "  ?            Toggle help",
        "  q / Ctrl-q   Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
