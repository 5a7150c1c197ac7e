use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style, Stylize},
    text::{Text, ToText},
    widgets::{Block, Paragraph},
};

use crate::game::{GRID_SIZE, Game, HEART_COUNT, Phase, Tile, TileContent, TileMode};

mod game;

fn main() -> Result<()> {
    let params: Vec<usize> = std::env::args()
        .skip(1)
        .map(|v| v.parse::<usize>().context("parameters should be usize"))
        .collect::<Result<Vec<_>, _>>()?;
    let (size, hearts) = match params[..] {
        [] => (GRID_SIZE, HEART_COUNT),
        [size, hearts] => (size, hearts),
        _ => {
            return Err(eyre!(
                "should give either no parameters or a size and a heart count"
            ));
        }
    };
    if size == 0 || hearts >= size * size {
        return Err(eyre!("heart count should leave at least one safe cell"));
    }

    color_eyre::install()?;
    let terminal = ratatui::init();
    let result = App::new(size, hearts).run(terminal);
    ratatui::restore();
    result
}

const DIGIT_COLORS: [Color; 8] = [
    Color::Blue,
    Color::Green,
    Color::Red,
    Color::Magenta,
    Color::Yellow,
    Color::LightMagenta,
    Color::Gray,
    Color::Black,
];

impl ToText for Tile {
    fn to_text(&self) -> Text<'_> {
        match (self.mode, self.content) {
            (TileMode::Flagged, _) => Text::from("⚑").red(),
            (TileMode::Hidden, _) => Text::raw(" "),
            (TileMode::Revealed, TileContent::Heart) => Text::from("♥").red(),
            (TileMode::Revealed, TileContent::Near(0)) => Text::raw(" "),
            (TileMode::Revealed, TileContent::Near(n)) => Text::styled(
                n.to_string(),
                Style::new()
                    .fg(DIGIT_COLORS[usize::from(n - 1) % DIGIT_COLORS.len()])
                    .bold(),
            ),
        }
    }
}

enum CursorDirection {
    Up,
    Left,
    Right,
    Down,
}

pub struct App {
    running: bool,
    size: usize,
    heart_count: usize,
    game: Game,
    cursor: (usize, usize),
}

impl App {
    pub fn new(size: usize, heart_count: usize) -> Self {
        Self {
            running: false,
            size,
            heart_count,
            game: Game::new(size, heart_count),
            cursor: (0, 0),
        }
    }

    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        self.running = true;
        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
        }
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let [status, grid] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(frame.area());

        frame.render_widget(Paragraph::new(self.status_line()), status);

        let rows = Layout::default()
            .constraints((0..self.size).map(|_| Constraint::Length(1)))
            .direction(Direction::Vertical)
            .split(grid);

        for (row, row_area) in rows.iter().enumerate() {
            let cells = Layout::default()
                .constraints((0..self.size).map(|_| Constraint::Length(3)))
                .direction(Direction::Horizontal)
                .split(*row_area);

            for (col, cell) in cells.iter().enumerate() {
                let bg = if (row, col) == self.cursor {
                    Color::LightYellow
                } else if row % 2 == col % 2 {
                    Color::DarkGray
                } else {
                    Color::Gray
                };
                frame.render_widget(
                    Paragraph::new(self.game.tile_at(row, col).to_text())
                        .centered()
                        .block(Block::new().bg(bg)),
                    *cell,
                );
            }
        }
    }

    fn status_line(&self) -> String {
        let message = match self.game.phase() {
            Phase::Playing => "playing",
            Phase::Won => "you won!",
            Phase::Lost => "game over",
        };
        format!(
            "♥ {} remaining | {message} | n: new game, f: flag, q: quit",
            self.game.hearts_remaining()
        )
    }

    fn handle_crossterm_events(&mut self) -> Result<()> {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
            Event::Mouse(_) => {}
            Event::Resize(_, _) => {}
            _ => {}
        }
        Ok(())
    }

    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),

            (_, KeyCode::Up | KeyCode::Char('k')) => self.move_cursor(CursorDirection::Up),
            (_, KeyCode::Down | KeyCode::Char('j')) => self.move_cursor(CursorDirection::Down),
            (_, KeyCode::Left | KeyCode::Char('h')) => self.move_cursor(CursorDirection::Left),
            (_, KeyCode::Right | KeyCode::Char('l')) => self.move_cursor(CursorDirection::Right),

            (_, KeyCode::Enter | KeyCode::Char(' ')) => {
                self.game.reveal(self.cursor.0, self.cursor.1)
            }
            (_, KeyCode::Char('f')) => self.game.toggle_flag(self.cursor.0, self.cursor.1),
            (_, KeyCode::Char('n')) => self.game = Game::new(self.size, self.heart_count),

            _ => {}
        }
    }

    fn move_cursor(&mut self, direction: CursorDirection) {
        match direction {
            CursorDirection::Up => self.cursor.0 = self.cursor.0.saturating_sub(1),
            CursorDirection::Down => self.cursor.0 = self.cursor.0.saturating_add(1),
            CursorDirection::Left => self.cursor.1 = self.cursor.1.saturating_sub(1),
            CursorDirection::Right => self.cursor.1 = self.cursor.1.saturating_add(1),
        }
        self.cursor.0 = self.cursor.0.clamp(0, self.size - 1);
        self.cursor.1 = self.cursor.1.clamp(0, self.size - 1);
    }

    fn quit(&mut self) {
        self.running = false;
    }
}
