use crate::config::GameConfig;
use crate::game::{Game, GameState};
use crate::renderer::{Input, Renderer};
use crate::web_renderer::WebRenderer;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

const GAME_UPDATE_INTERVAL: f64 = 10.0; // Tick pacing in ms
const WIN_DISPLAY_TIME: f64 = 2000.0; // Victory frame dwell before the loop stops

struct GameLoop {
    game: Game,
    renderer: WebRenderer,
    last_update: f64,
    won_at: Option<f64>,
}

impl GameLoop {
    fn new() -> Result<Self, JsValue> {
        let game = Game::new(GameConfig::default());
        let mut renderer = WebRenderer::new("gameCanvas")?;
        renderer.init().map_err(|e| JsValue::from_str(&e.to_string()))?;

        let window = web_sys::window().ok_or("no window")?;
        let performance = window.performance().ok_or("no performance")?;
        let last_update = performance.now();

        Ok(Self {
            game,
            renderer,
            last_update,
            won_at: None,
        })
    }

    /// Runs one animation frame. Returns `false` once the victory frame has
    /// been on screen for its dwell time and the loop should stop.
    fn update_frame(&mut self, current_time: f64) -> Result<bool, JsValue> {
        // Poll for input
        if let Some(input) = self
            .renderer
            .poll_input()
            .map_err(|e| JsValue::from_str(&e.to_string()))?
        {
            if let Input::Direction(direction) = input {
                self.game.move_player(direction);
            }
        }

        // Update game logic at fixed rate
        if current_time - self.last_update >= GAME_UPDATE_INTERVAL {
            self.game.update();
            self.last_update = current_time;
        }

        // Render (renderer manages its own frame rate)
        self.renderer
            .render(&self.game)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        if self.game.state == GameState::Won {
            let won_at = *self.won_at.get_or_insert(current_time);
            if current_time - won_at >= WIN_DISPLAY_TIME {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    // Panic messages go to the browser console
    console_error_panic_hook::set_once();

    let game_loop = Rc::new(RefCell::new(GameLoop::new()?));

    let window = web_sys::window().ok_or("no window")?;
    let performance = window.performance().ok_or("no performance")?;

    // Self-rescheduling requestAnimationFrame closure
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    let game_loop_clone = game_loop.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let current_time = performance.now();

        match game_loop_clone.borrow_mut().update_frame(current_time) {
            Ok(true) => {
                let window = web_sys::window().unwrap();
                window
                    .request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref())
                    .unwrap();
            }
            Ok(false) => {
                web_sys::console::log_1(&"Game won, stopping the frame loop.".into());
            }
            Err(e) => {
                web_sys::console::error_1(&e);
            }
        }
    }) as Box<dyn FnMut()>));

    window
        .request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref())
        .unwrap();

    Ok(())
}
