use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use std::time::{Duration, Instant};
use subgraph_extend::parser::{load_instance, Instance};
use subgraph_extend::{solve_approx, solve_exact, Graph, Solution};

/// Interactive viewer for solver results: watch the computation, then page
/// through the input graphs, the extension matrix, and the mapping family.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Instance file (same format as the solver binary)
    input: PathBuf,

    /// Use the greedy constructor with refinement instead of branch-and-bound
    #[arg(short = 'a', long = "approx")]
    approx: bool,
}

enum ProgressMessage {
    Done {
        solution: Box<Solution>,
        elapsed: Duration,
    },
    Failed(String),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum View {
    Running,
    Menu,
    Graphs,
    Extension,
    Mappings,
}

struct App {
    algorithm: &'static str,
    instance: Instance,
    rx: Receiver<ProgressMessage>,
    started: Instant,
    calculating: bool,
    failure: Option<String>,
    solution: Option<Solution>,
    elapsed: Duration,
    view: View,
    copy_index: usize,
    row_offset: usize,
    col_offset: usize,
    spinner: usize,
}

const SPINNER_FRAMES: &[&str] = &["|", "/", "-", "\\"];

impl App {
    fn new(algorithm: &'static str, instance: Instance, rx: Receiver<ProgressMessage>) -> Self {
        App {
            algorithm,
            instance,
            rx,
            started: Instant::now(),
            calculating: true,
            failure: None,
            solution: None,
            elapsed: Duration::ZERO,
            view: View::Running,
            copy_index: 0,
            row_offset: 0,
            col_offset: 0,
            spinner: 0,
        }
    }

    fn tick(&mut self) {
        if self.calculating {
            self.spinner = (self.spinner + 1) % SPINNER_FRAMES.len();
        }
        while let Ok(message) = self.rx.try_recv() {
            match message {
                ProgressMessage::Done { solution, elapsed } => {
                    self.calculating = false;
                    self.solution = Some(*solution);
                    self.elapsed = elapsed;
                    self.view = View::Menu;
                }
                ProgressMessage::Failed(reason) => {
                    self.calculating = false;
                    self.failure = Some(reason);
                }
            }
        }
    }

    fn max_dimension(&self) -> usize {
        self.instance.host.num_vertices()
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                if self.view != View::Running {
                    self.view = View::Menu;
                    self.row_offset = 0;
                    self.col_offset = 0;
                }
            }
            KeyCode::Char('g') | KeyCode::Char('G') if self.view == View::Menu => {
                self.view = View::Graphs;
            }
            KeyCode::Char('e') | KeyCode::Char('E') if self.view == View::Menu => {
                self.view = View::Extension;
            }
            KeyCode::Char('m') | KeyCode::Char('M') if self.view == View::Menu => {
                self.view = View::Mappings;
            }
            KeyCode::Up => self.row_offset = self.row_offset.saturating_sub(1),
            KeyCode::Down => {
                self.row_offset = (self.row_offset + 1).min(self.max_dimension().saturating_sub(1));
            }
            KeyCode::Left => self.col_offset = self.col_offset.saturating_sub(1),
            KeyCode::Right => {
                self.col_offset = (self.col_offset + 1).min(self.max_dimension().saturating_sub(1));
            }
            KeyCode::PageUp => self.row_offset = self.row_offset.saturating_sub(10),
            KeyCode::PageDown => {
                self.row_offset = (self.row_offset + 10).min(self.max_dimension().saturating_sub(1));
            }
            KeyCode::Char(',') => self.copy_index = self.copy_index.saturating_sub(1),
            KeyCode::Char('.') => {
                if let Some(solution) = &self.solution {
                    if self.copy_index + 1 < solution.mappings.len() {
                        self.copy_index += 1;
                    }
                }
            }
            _ => {}
        }
    }
}

/// Matrix rows as styled text, windowed by the current scroll offsets.
/// When `base` is given, entries above the base value render highlighted in
/// `original+added` form.
fn matrix_lines(
    graph: &Graph,
    base: Option<&Graph>,
    row_offset: usize,
    col_offset: usize,
    area: Rect,
) -> Vec<Line<'static>> {
    let n = graph.num_vertices();
    let rows_visible = (area.height.saturating_sub(5) as usize).max(3);
    let cols_visible = ((area.width.saturating_sub(6)) / 6).max(3) as usize;
    let row_end = (row_offset + rows_visible).min(n);
    let col_end = (col_offset + cols_visible).min(n);

    let mut lines = Vec::new();
    let mut header = String::from("     ");
    for col in col_offset..col_end {
        header.push_str(&format!("{col:>6}"));
    }
    lines.push(Line::from(Span::styled(
        header,
        Style::default().fg(Color::Cyan),
    )));

    for row in row_offset..row_end {
        let mut spans = vec![Span::styled(
            format!("{row:>4}|"),
            Style::default().fg(Color::Cyan),
        )];
        for col in col_offset..col_end {
            let value = graph.get_edge(row, col);
            let (text, style) = match base {
                Some(base) if value > base.get_edge(row, col) => (
                    format!("{}+{}", base.get_edge(row, col), value - base.get_edge(row, col)),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                _ if value > 0 => (value.to_string(), Style::default().fg(Color::Yellow)),
                _ => (value.to_string(), Style::default().fg(Color::DarkGray)),
            };
            spans.push(Span::styled(format!("{text:>6}"), style));
        }
        lines.push(Line::from(spans));
    }
    if row_end < n || col_end < n {
        lines.push(Line::from(Span::styled(
            format!("  showing rows {row_offset}-{} cols {col_offset}-{} of {n}x{n}",
                row_end.saturating_sub(1),
                col_end.saturating_sub(1)),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

fn bordered(title: String) -> Block<'static> {
    Block::default().borders(Borders::ALL).title(title)
}

fn render_running(f: &mut Frame, app: &App, area: Rect) {
    let elapsed = app.started.elapsed();
    let body = if let Some(reason) = &app.failure {
        format!("Failed: {reason}\n\nPress q to quit.")
    } else {
        format!(
            "Pattern: {} vertices\nHost: {} vertices\nRequested copies: {}\nAlgorithm: {}\n\nSolving {}  ({:.1}s)",
            app.instance.pattern.num_vertices(),
            app.instance.host.num_vertices(),
            app.instance.k,
            app.algorithm,
            SPINNER_FRAMES[app.spinner],
            elapsed.as_secs_f64(),
        )
    };
    let widget = Paragraph::new(body)
        .alignment(Alignment::Left)
        .block(bordered(" Computing extension ".to_string()));
    f.render_widget(widget, area);
}

fn render_menu(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(4), Constraint::Min(6)])
        .split(area);

    let (cost, copies) = match &app.solution {
        Some(solution) => (solution.cost, solution.mappings.len()),
        None => (0, 0),
    };
    let summary = Paragraph::new(format!(
        "Extension cost: {}   copies: {}   time: {} ms",
        cost,
        copies,
        app.elapsed.as_millis()
    ))
    .style(Style::default().fg(Color::Yellow))
    .alignment(Alignment::Center)
    .block(bordered(format!(" {} solution ", app.algorithm)));
    f.render_widget(summary, chunks[0]);

    let items = vec![
        ListItem::new("  [G] Pattern and host matrices"),
        ListItem::new("  [E] Extended host matrix"),
        ListItem::new("  [M] Mapping family"),
        ListItem::new(""),
        ListItem::new("  [Q] Quit"),
    ];
    let menu = List::new(items).block(bordered(" Views ".to_string()));
    f.render_widget(menu, chunks[1]);
}

fn render_graphs(f: &mut Frame, app: &App, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let pattern = Paragraph::new(matrix_lines(
        &app.instance.pattern,
        None,
        app.row_offset,
        app.col_offset,
        halves[0],
    ))
    .block(bordered(format!(
        " Pattern ({} vertices) ",
        app.instance.pattern.num_vertices()
    )));
    f.render_widget(pattern, halves[0]);

    let host = Paragraph::new(matrix_lines(
        &app.instance.host,
        None,
        app.row_offset,
        app.col_offset,
        halves[1],
    ))
    .block(bordered(format!(
        " Host ({} vertices) ",
        app.instance.host.num_vertices()
    )));
    f.render_widget(host, halves[1]);
}

fn render_extension(f: &mut Frame, app: &App, area: Rect) {
    let Some(solution) = &app.solution else {
        return;
    };
    let mut lines = matrix_lines(
        &solution.extended,
        Some(&app.instance.host),
        app.row_offset,
        app.col_offset,
        area,
    );
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Added multiplicities: {}", solution.cost),
        Style::default().fg(Color::Gray),
    )));
    let widget = Paragraph::new(lines).block(bordered(" Extended host (original+added) ".to_string()));
    f.render_widget(widget, area);
}

fn render_mappings(f: &mut Frame, app: &App, area: Rect) {
    let Some(solution) = &app.solution else {
        return;
    };
    let mapping = &solution.mappings[app.copy_index];
    let mut lines = vec![
        Line::from(Span::styled(
            format!("Copy {} of {}   [,/.] switch", app.copy_index + 1, solution.mappings.len()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for (u, &v) in mapping.iter().enumerate() {
        lines.push(Line::from(Span::styled(
            format!("  {u:>3} -> {v}"),
            Style::default().fg(Color::Green),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("image: {:?}", subgraph_extend::image_of(mapping)),
        Style::default().fg(Color::Gray),
    )));
    let widget = Paragraph::new(lines).block(bordered(" Mapping family ".to_string()));
    f.render_widget(widget, area);
}

fn ui(f: &mut Frame, app: &App) {
    let size = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(size);

    match app.view {
        View::Running => render_running(f, app, chunks[0]),
        View::Menu => render_menu(f, app, chunks[0]),
        View::Graphs => render_graphs(f, app, chunks[0]),
        View::Extension => render_extension(f, app, chunks[0]),
        View::Mappings => render_mappings(f, app, chunks[0]),
    }

    let hint = Paragraph::new("[Esc] menu  [arrows] scroll  [q] quit")
        .style(Style::default().fg(Color::Magenta))
        .alignment(Alignment::Center);
    f.render_widget(hint, chunks[1]);
}

fn run_tui(app: &mut App) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') => break,
                    code => app.handle_key(code),
                }
            }
        }
        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let instance = match load_instance(&args.input).and_then(|i| i.validate().map(|_| i)) {
        Ok(instance) => instance,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let (tx, rx) = channel();
    let algorithm = if args.approx { "approximate" } else { "exact" };
    let worker_instance = instance.clone();
    let use_approx = args.approx;
    thread::spawn(move || {
        let started = Instant::now();
        let solution = if use_approx {
            solve_approx(&worker_instance.pattern, &worker_instance.host, worker_instance.k)
        } else {
            solve_exact(
                &worker_instance.pattern,
                &worker_instance.host,
                worker_instance.k,
                false,
            )
        };
        let elapsed = started.elapsed();
        let message = if solution.found {
            ProgressMessage::Done {
                solution: Box::new(solution),
                elapsed,
            }
        } else {
            ProgressMessage::Failed("search exhausted without a valid family".to_string())
        };
        tx.send(message).ok();
    });

    let mut app = App::new(algorithm, instance, rx);
    match run_tui(&mut app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
