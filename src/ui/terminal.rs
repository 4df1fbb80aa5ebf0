// Terminal-backed prompter.
// Selection menus are drawn with ratatui in an inline viewport below the cursor.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode},
};
use ratatui::{TerminalOptions, Viewport, prelude::*, widgets::*};

use crate::error::Result;
use crate::state::BreadcrumbNode;

use super::breadcrumb::breadcrumb_line;
use super::prompt::{Choice, Prompter};

/// Maximum number of menu rows shown at once; longer menus scroll.
const MAX_VISIBLE_ROWS: u16 = 15;

/// Prompter that talks to the real terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter {
    breadcrumbs: Vec<BreadcrumbNode>,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prompter for TerminalPrompter {
    fn select<T: Clone>(&mut self, question: &str, choices: &[Choice<T>]) -> Result<Option<T>> {
        if choices.is_empty() {
            return Ok(None);
        }

        let labels = choices.iter().map(|c| c.label.clone()).collect();
        let mut menu = SelectMenu::new(question, labels, &self.breadcrumbs);
        let picked = menu.run()?;

        Ok(picked.and_then(|i| choices.get(i)).map(|c| c.value.clone()))
    }

    fn text(&mut self, prompt: &str) -> Result<Option<String>> {
        Ok(LineInput::new(Echo::Visible).run(prompt)?)
    }

    fn password(&mut self, prompt: &str) -> Result<Option<String>> {
        Ok(LineInput::new(Echo::Hidden).run(prompt)?)
    }

    fn pause(&mut self) -> Result<()> {
        print!("Press any key to continue...");
        io::stdout().flush()?;

        let raw = RawMode::enable()?;
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    break;
                }
            }
        }
        drop(raw);

        println!();
        Ok(())
    }

    fn info(&mut self, message: &str) {
        println!("{}", message);
    }

    fn error(&mut self, message: &str) {
        eprintln!("❌ {}", message);
    }

    fn clear(&mut self) {
        let _ = execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0));
    }

    fn show_breadcrumbs(&mut self, trail: &[BreadcrumbNode]) {
        self.breadcrumbs = trail.to_vec();
    }
}

/// Raw mode for the lifetime of the guard.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Whether typed characters are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Echo {
    Visible,
    Hidden,
}

/// What a key press did to a line being typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineAction {
    Typed(char),
    Erased,
    Submit,
    Cancel,
    Ignore,
}

/// Single-line input read key by key in raw mode, so Esc and Ctrl-C cancel
/// the prompt instead of killing the process.
struct LineInput {
    echo: Echo,
    buffer: String,
}

impl LineInput {
    fn new(echo: Echo) -> Self {
        Self {
            echo,
            buffer: String::new(),
        }
    }

    fn apply(&mut self, key: KeyEvent) -> LineAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => LineAction::Cancel,
            KeyCode::Char('d') if ctrl && self.buffer.is_empty() => LineAction::Cancel,
            KeyCode::Char(_) if ctrl => LineAction::Ignore,
            KeyCode::Char(c) => {
                self.buffer.push(c);
                LineAction::Typed(c)
            }
            KeyCode::Backspace => match self.buffer.pop() {
                Some(_) => LineAction::Erased,
                None => LineAction::Ignore,
            },
            KeyCode::Enter => LineAction::Submit,
            KeyCode::Esc => LineAction::Cancel,
            _ => LineAction::Ignore,
        }
    }

    /// Prompt and block until the line is submitted (`Some`) or cancelled (`None`).
    fn run(mut self, prompt: &str) -> io::Result<Option<String>> {
        let mut out = io::stdout();
        write!(out, "? {} ", prompt)?;
        out.flush()?;

        let raw = RawMode::enable()?;
        let submitted = loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match self.apply(key) {
                LineAction::Typed(c) if self.echo == Echo::Visible => write!(out, "{}", c)?,
                LineAction::Erased if self.echo == Echo::Visible => write!(out, "\u{8} \u{8}")?,
                LineAction::Submit => break true,
                LineAction::Cancel => break false,
                _ => {}
            }
            out.flush()?;
        };
        drop(raw);

        writeln!(out)?;
        Ok(submitted.then_some(self.buffer))
    }
}

/// What a key press does to an open menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Next,
    Prev,
    First,
    Last,
    Pick,
    Cancel,
    Ignore,
}

fn menu_action(key: KeyEvent) -> MenuAction {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => MenuAction::Cancel,
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => MenuAction::Next,
        KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => MenuAction::Prev,
        KeyCode::Home | KeyCode::Char('g') => MenuAction::First,
        KeyCode::End | KeyCode::Char('G') => MenuAction::Last,
        KeyCode::Enter | KeyCode::Char(' ') => MenuAction::Pick,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Left | KeyCode::Backspace => {
            MenuAction::Cancel
        }
        _ => MenuAction::Ignore,
    }
}

/// A single-choice menu with keyboard navigation.
struct SelectMenu<'a> {
    question: &'a str,
    labels: Vec<String>,
    breadcrumbs: &'a [BreadcrumbNode],
    list_state: ListState,
}

impl<'a> SelectMenu<'a> {
    fn new(question: &'a str, labels: Vec<String>, breadcrumbs: &'a [BreadcrumbNode]) -> Self {
        let mut list_state = ListState::default();
        if !labels.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            question,
            labels,
            breadcrumbs,
            list_state,
        }
    }

    /// Select the next item, staying at the end.
    fn select_next(&mut self) {
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.labels.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Select the previous item, staying at the start.
    fn select_prev(&mut self) {
        let i = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.list_state.select(Some(i));
    }

    /// Apply a key action. Returns `Some(result)` once the menu is closed.
    fn apply(&mut self, action: MenuAction) -> Option<Option<usize>> {
        match action {
            MenuAction::Next => self.select_next(),
            MenuAction::Prev => self.select_prev(),
            MenuAction::First => self.list_state.select(Some(0)),
            MenuAction::Last => self.list_state.select(Some(self.labels.len().saturating_sub(1))),
            MenuAction::Pick => return Some(self.list_state.selected()),
            MenuAction::Cancel => return Some(None),
            MenuAction::Ignore => {}
        }
        None
    }

    fn height(&self) -> u16 {
        let rows = u16::try_from(self.labels.len()).unwrap_or(u16::MAX);
        // Borders, question line, and key hints
        rows.min(MAX_VISIBLE_ROWS) + 4
    }

    /// Draw the menu and block until an item is picked or the menu is cancelled.
    fn run(&mut self) -> io::Result<Option<usize>> {
        let _raw = RawMode::enable()?;
        let mut terminal = Terminal::with_options(
            CrosstermBackend::new(io::stdout()),
            TerminalOptions {
                viewport: Viewport::Inline(self.height()),
            },
        )?;

        let picked = loop {
            terminal.draw(|frame| self.draw(frame))?;

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(result) = self.apply(menu_action(key)) {
                    break result;
                }
            }
        };

        terminal.clear()?;
        Ok(picked)
    }

    fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Question
                Constraint::Min(1),    // Choices
                Constraint::Length(1), // Key hints
            ])
            .split(frame.area());

        let question = Line::from(vec![
            Span::styled("? ", Style::default().fg(Color::Green)),
            Span::styled(
                self.question.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(Paragraph::new(question), chunks[0]);

        let items: Vec<ListItem> = self
            .labels
            .iter()
            .map(|label| ListItem::new(label.as_str()))
            .collect();

        let mut block = Block::default().borders(Borders::ALL);
        if !self.breadcrumbs.is_empty() {
            block = block.title(breadcrumb_line(self.breadcrumbs));
        }

        let list_widget = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        frame.render_stateful_widget(list_widget, chunks[1], &mut self.list_state);

        let hints = Paragraph::new("↑/↓ move · Enter select · Esc back")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hints, chunks[2]);
    }
}
