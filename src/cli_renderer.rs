use crate::entity::{Direction, Position};
use crate::game::{Game, GameState};
use crate::renderer::{Input, Renderer};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, Write};
use std::time::{Duration, Instant};

const VICTORY_MESSAGE: &str = "Congratulations! You won the game!";

pub struct CliRenderer {
    last_render: Instant,
    target_frame_time: Duration,
}

impl CliRenderer {
    pub fn new() -> Self {
        Self {
            last_render: Instant::now(),
            // Target 30 FPS for smooth rendering
            target_frame_time: Duration::from_millis(33),
        }
    }

    fn draw_info(&self, game: &Game, stdout: &mut io::Stdout) -> io::Result<()> {
        queue!(
            stdout,
            cursor::MoveTo(0, (game.config.grid_size + 1) as u16),
            ResetColor,
            Print(format!(
                "Score: {} / {}",
                game.scoreboard.score, game.scoreboard.win_threshold
            ))
        )?;

        queue!(
            stdout,
            cursor::MoveTo(0, (game.config.grid_size + 2) as u16),
            Print("Controls: Arrow Keys to move | Q to quit")
        )?;

        Ok(())
    }

    fn draw_victory_banner(&self, game: &Game, stdout: &mut io::Stdout) -> io::Result<()> {
        // Centre the banner over the board (cells are two chars wide)
        let board_width = (game.config.grid_size * 2) as usize;
        let col = board_width.saturating_sub(VICTORY_MESSAGE.len()) / 2;
        let row = game.config.grid_size / 2;

        queue!(
            stdout,
            cursor::MoveTo(col as u16, row as u16),
            SetBackgroundColor(Color::Black),
            SetForegroundColor(Color::Green),
            Print(VICTORY_MESSAGE),
            ResetColor
        )?;
        Ok(())
    }
}

impl Default for CliRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for CliRenderer {
    fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::SetTitle("Mariposa"),
            terminal::Clear(ClearType::All),
            cursor::Hide
        )?;
        Ok(())
    }

    fn render(&mut self, game: &Game) -> io::Result<()> {
        // Frame rate limiting: skip rendering if not enough time has passed
        if self.last_render.elapsed() < self.target_frame_time {
            return Ok(());
        }

        self.last_render = Instant::now();

        let mut stdout = io::stdout();

        queue!(stdout, cursor::MoveTo(0, 0))?;

        // Grid positions are the source of truth, so draw straight from the
        // entities rather than the occupancy markers
        for y in 0..game.config.grid_size {
            for x in 0..game.config.grid_size {
                let pos = Position::new(x, y);

                if game.butterfly.position == pos {
                    queue!(
                        stdout,
                        SetBackgroundColor(Color::Green),
                        SetForegroundColor(Color::Black),
                        Print("}{")
                    )?;
                } else if game.flowers.iter().any(|f| f.position == pos) {
                    queue!(
                        stdout,
                        SetBackgroundColor(Color::Black),
                        SetForegroundColor(Color::Magenta),
                        Print("**")
                    )?;
                } else {
                    queue!(stdout, SetBackgroundColor(Color::Black), Print("  "))?;
                }
            }
            queue!(stdout, ResetColor, Print("\r\n"))?;
        }

        self.draw_info(game, &mut stdout)?;

        if game.state == GameState::Won {
            self.draw_victory_banner(game, &mut stdout)?;
        }

        stdout.flush()?;
        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            cursor::Show,
            terminal::LeaveAlternateScreen,
            ResetColor
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<Option<Input>> {
        if event::poll(Duration::from_millis(10))? {
            if let Event::Key(KeyEvent { code, .. }) = event::read()? {
                match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        return Ok(Some(Input::Quit));
                    }
                    KeyCode::Up => return Ok(Some(Input::Direction(Direction::Up))),
                    KeyCode::Down => return Ok(Some(Input::Direction(Direction::Down))),
                    KeyCode::Left => return Ok(Some(Input::Direction(Direction::Left))),
                    KeyCode::Right => return Ok(Some(Input::Direction(Direction::Right))),
                    _ => {}
                }
            }
        }
        Ok(None)
    }
}

impl Drop for CliRenderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
