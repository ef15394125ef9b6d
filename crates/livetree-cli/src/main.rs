use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use livetree_config::Config;
use livetree_engine::{MarkdownStyle, update_input_structure};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{env, io::stdout, process};
use xi_rope::Rope;
use xi_rope::delta::Builder;

mod detect;
mod preview;
mod surface;

use surface::TerminalSurface;

struct App {
    rope: Rope,
    text: String,
    cursor: usize,
    style: MarkdownStyle,
    surface: TerminalSurface,
    commits: usize,
}

impl App {
    fn new(initial: String, style: MarkdownStyle) -> Self {
        let mut app = Self {
            rope: Rope::from(initial.as_str()),
            text: initial,
            cursor: 0,
            style,
            surface: TerminalSurface::new(),
            commits: 0,
        };
        app.cursor = app.text.len();
        app.reconcile();
        app
    }

    fn reconcile(&mut self) {
        self.surface.begin_update(self.text.len());
        let outcome = update_input_structure(
            &mut self.surface,
            &detect::detect_ranges,
            &self.text,
            Some(self.cursor),
            &self.style,
            false,
        );
        if outcome.committed {
            self.commits += 1;
        }
    }

    fn replace(&mut self, from: usize, to: usize, insert: &str) {
        let mut builder = Builder::new(self.rope.len());
        builder.replace(from..to, Rope::from(insert));
        self.rope = builder.build().apply(&self.rope);
        self.text = self.rope.to_string();
    }

    fn insert(&mut self, s: &str) {
        self.replace(self.cursor, self.cursor, s);
        self.cursor += s.len();
        self.reconcile();
    }

    fn backspace(&mut self) {
        if let Some(ch) = self.text[..self.cursor].chars().next_back() {
            let from = self.cursor - ch.len_utf8();
            self.replace(from, self.cursor, "");
            self.cursor = from;
            self.reconcile();
        }
    }

    fn delete_forward(&mut self) {
        if let Some(ch) = self.text[self.cursor..].chars().next() {
            self.replace(self.cursor, self.cursor + ch.len_utf8(), "");
            self.reconcile();
        }
    }

    fn move_left(&mut self) {
        if let Some(ch) = self.text[..self.cursor].chars().next_back() {
            self.cursor -= ch.len_utf8();
        }
    }

    fn move_right(&mut self) {
        if let Some(ch) = self.text[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    fn line_bounds(&self, at: usize) -> (usize, usize) {
        let start = self.text[..at].rfind('\n').map_or(0, |i| i + 1);
        let end = self.text[at..]
            .find('\n')
            .map_or(self.text.len(), |i| at + i);
        (start, end)
    }

    fn move_home(&mut self) {
        self.cursor = self.line_bounds(self.cursor).0;
    }

    fn move_end(&mut self) {
        self.cursor = self.line_bounds(self.cursor).1;
    }

    fn move_vertical(&mut self, up: bool) {
        let (start, end) = self.line_bounds(self.cursor);
        let column = self.text[start..self.cursor].chars().count();
        let (target_start, target_end) = if up {
            if start == 0 {
                return;
            }
            self.line_bounds(start - 1)
        } else {
            if end == self.text.len() {
                return;
            }
            self.line_bounds(end + 1)
        };
        let mut offset = target_start;
        for ch in self.text[target_start..target_end].chars().take(column) {
            offset += ch.len_utf8();
        }
        self.cursor = offset;
    }

    fn cursor_row_col(&self) -> (usize, usize) {
        let row = self.text[..self.cursor].matches('\n').count();
        let (start, _) = self.line_bounds(self.cursor);
        (row, self.text[start..self.cursor].chars().count())
    }
}

fn main() -> Result<()> {
    // stderr logging garbles the alternate screen, so stay quiet unless
    // RUST_LOG asks for more
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().collect();
    let initial = match args.len() {
        1 => String::new(),
        2 => std::fs::read_to_string(&args[1])
            .with_context(|| format!("failed to read {}", args[1]))?,
        _ => {
            eprintln!("Usage: {} [markdown-file]", args[0]);
            process::exit(1);
        }
    };

    let style = match Config::load() {
        Ok(Some(config)) => config.effective_style(),
        Ok(None) => MarkdownStyle::default_style(),
        Err(e) => {
            eprintln!("Error: failed to load config: {e}");
            process::exit(1);
        }
    };

    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(initial, style);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(());
                }
                KeyCode::Char(c) => app.insert(&c.to_string()),
                KeyCode::Enter => app.insert("\n"),
                KeyCode::Backspace => app.backspace(),
                KeyCode::Delete => app.delete_forward(),
                KeyCode::Left => app.move_left(),
                KeyCode::Right => app.move_right(),
                KeyCode::Up => app.move_vertical(true),
                KeyCode::Down => app.move_vertical(false),
                KeyCode::Home => app.move_home(),
                KeyCode::End => app.move_end(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.area());

    let body = match app.surface.tree() {
        Some(tree) => preview::render_tree(tree),
        None => vec![Line::from("Type to format markdown live")],
    };
    let editor = Paragraph::new(body).block(Block::default().borders(Borders::ALL).title("livetree"));
    f.render_widget(editor, chunks[0]);

    let node_count = app.surface.tree().map_or(0, |t| t.node_count());
    let status = Line::from(vec![
        Span::raw(format!(
            "offset {} | nodes {} | commits {} | ",
            app.cursor, node_count, app.commits
        )),
        Span::raw("Esc: quit"),
    ]);
    f.render_widget(Paragraph::new(vec![status]), chunks[1]);

    // caret, offset by the editor border
    let (row, col) = app.cursor_row_col();
    f.set_cursor_position((
        chunks[0].x + 1 + col as u16,
        chunks[0].y + 1 + row as u16,
    ));
}
