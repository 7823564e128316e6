use mariposa::{CliRenderer, Game, GameConfig, GameState, Input, Renderer};
use std::io;
use std::thread;
use std::time::{Duration, Instant};

// Game logic update rate (the tick pacing delay)
const GAME_UPDATE_RATE: Duration = Duration::from_millis(10);
// How long the victory frame stays on screen before the window closes
const WIN_DISPLAY_TIME: Duration = Duration::from_secs(2);

fn main() -> io::Result<()> {
    env_logger::init();

    let mut game = Game::new(GameConfig::default());
    let mut renderer = CliRenderer::new();

    renderer.init()?;

    let mut last_game_update = Instant::now();

    loop {
        // Poll for input; directional keys mutate player state between ticks
        if let Some(input) = renderer.poll_input()? {
            match input {
                Input::Direction(direction) => {
                    game.move_player(direction);
                }
                Input::Quit => {
                    break;
                }
            }
        }

        // Update game logic at fixed rate
        if last_game_update.elapsed() >= GAME_UPDATE_RATE {
            game.update();
            last_game_update = Instant::now();
        }

        // Let renderer decide when to actually render
        // (it manages its own frame rate internally)
        renderer.render(&game)?;

        if game.state == GameState::Won {
            // Keep the victory frame up, then terminate the session
            let shown_at = Instant::now();
            while shown_at.elapsed() < WIN_DISPLAY_TIME {
                renderer.render(&game)?;
                thread::sleep(GAME_UPDATE_RATE);
            }
            break;
        }
    }

    renderer.cleanup()?;
    Ok(())
}
