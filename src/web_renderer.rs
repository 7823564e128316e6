use crate::entity::{Direction, ScreenPos};
use crate::game::{Game, GameState};
use crate::renderer::{Input, Renderer};
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, KeyboardEvent, TouchEvent};

const TARGET_FRAME_TIME: f64 = 16.0; // ~60 FPS
const SWIPE_THRESHOLD: f64 = 30.0; // Minimum distance in pixels to register a swipe

const COLOR_BACKGROUND: &str = "#FFFFFF";
const COLOR_TEXT: &str = "#000000";
const BUTTERFLY_SPRITE: &str = "\u{1F98B}"; // 🦋
const FLOWER_SPRITE: &str = "\u{1F338}"; // 🌸

pub struct WebRenderer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    window: web_sys::Window,
    device_pixel_ratio: f64,
    last_render_time: f64,

    // Input state, shared with the key/touch listener closures
    pending_input: Rc<RefCell<Option<Input>>>,
    touch_start_pos: Rc<RefCell<Option<(f64, f64)>>>,
}

impl WebRenderer {
    pub fn new(canvas_id: &str) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        // Disable image smoothing for crisp pixels
        context.set_image_smoothing_enabled(false);

        // Get device pixel ratio for high DPI displays
        let device_pixel_ratio = window.device_pixel_ratio();

        let pending_input = Rc::new(RefCell::new(None));
        let touch_start_pos = Rc::new(RefCell::new(None));

        Ok(Self {
            canvas,
            context,
            window,
            device_pixel_ratio,
            last_render_time: 0.0,
            pending_input,
            touch_start_pos,
        })
    }

    fn setup_keyboard_listener(&self) {
        let pending_input = self.pending_input.clone();

        let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            let input = match event.key().as_str() {
                "ArrowUp" => Some(Input::Direction(Direction::Up)),
                "ArrowDown" => Some(Input::Direction(Direction::Down)),
                "ArrowLeft" => Some(Input::Direction(Direction::Left)),
                "ArrowRight" => Some(Input::Direction(Direction::Right)),
                _ => None,
            };

            if let Some(input) = input {
                *pending_input.borrow_mut() = Some(input);
                event.prevent_default();
            }
        }) as Box<dyn FnMut(KeyboardEvent)>);

        self.window
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
            .unwrap();

        closure.forget(); // Keep listener alive
    }

    fn setup_touch_listeners(&self) {
        let pending_input = self.pending_input.clone();
        let touch_start_pos = self.touch_start_pos.clone();
        let canvas = self.canvas.clone();

        // TouchStart: Record initial position
        let touch_start_pos_clone = touch_start_pos.clone();
        let touchstart_closure = Closure::wrap(Box::new(move |event: TouchEvent| {
            event.prevent_default(); // Prevent zooming, scrolling, etc.

            if let Some(touch) = event.touches().item(0) {
                let x = touch.client_x() as f64;
                let y = touch.client_y() as f64;
                *touch_start_pos_clone.borrow_mut() = Some((x, y));
            }
        }) as Box<dyn FnMut(TouchEvent)>);

        canvas
            .add_event_listener_with_callback(
                "touchstart",
                touchstart_closure.as_ref().unchecked_ref(),
            )
            .unwrap();
        touchstart_closure.forget();

        // TouchMove: Prevent default to avoid scrolling
        let touchmove_closure = Closure::wrap(Box::new(move |event: TouchEvent| {
            event.prevent_default();
        }) as Box<dyn FnMut(TouchEvent)>);

        canvas
            .add_event_listener_with_callback(
                "touchmove",
                touchmove_closure.as_ref().unchecked_ref(),
            )
            .unwrap();
        touchmove_closure.forget();

        // TouchEnd: Detect swipe direction
        let touch_start_pos_clone = touch_start_pos.clone();
        let pending_input_clone = pending_input.clone();
        let touchend_closure = Closure::wrap(Box::new(move |event: TouchEvent| {
            event.prevent_default();

            if let Some(touch) = event.changed_touches().item(0) {
                let end_x = touch.client_x() as f64;
                let end_y = touch.client_y() as f64;

                if let Some((start_x, start_y)) = *touch_start_pos_clone.borrow() {
                    let dx = end_x - start_x;
                    let dy = end_y - start_y;

                    let abs_dx = dx.abs();
                    let abs_dy = dy.abs();

                    // Swipe must be strong enough; the larger delta picks
                    // the direction
                    let input = if abs_dx > SWIPE_THRESHOLD || abs_dy > SWIPE_THRESHOLD {
                        if abs_dx > abs_dy {
                            if dx > 0.0 {
                                Some(Input::Direction(Direction::Right))
                            } else {
                                Some(Input::Direction(Direction::Left))
                            }
                        } else if dy > 0.0 {
                            Some(Input::Direction(Direction::Down))
                        } else {
                            Some(Input::Direction(Direction::Up))
                        }
                    } else {
                        None
                    };

                    if let Some(input) = input {
                        *pending_input_clone.borrow_mut() = Some(input);

                        // Haptic feedback (vibrate for 50ms)
                        // Fails silently where not supported
                        if let Some(window) = web_sys::window() {
                            let navigator = window.navigator();
                            let _ = js_sys::Reflect::get(&navigator, &JsValue::from_str("vibrate"))
                                .ok()
                                .and_then(|vibrate_fn| {
                                    if vibrate_fn.is_function() {
                                        let vibrate = vibrate_fn.dyn_ref::<js_sys::Function>()?;
                                        let _ = vibrate.call1(&navigator, &JsValue::from_f64(50.0));
                                    }
                                    Some(())
                                });
                        }
                    }

                    *touch_start_pos_clone.borrow_mut() = None;
                }
            }
        }) as Box<dyn FnMut(TouchEvent)>);

        canvas
            .add_event_listener_with_callback(
                "touchend",
                touchend_closure.as_ref().unchecked_ref(),
            )
            .unwrap();
        touchend_closure.forget();

        // TouchCancel: Clear state if touch is cancelled
        let touchcancel_closure = Closure::wrap(Box::new(move |event: TouchEvent| {
            event.prevent_default();
            *touch_start_pos.borrow_mut() = None;
        }) as Box<dyn FnMut(TouchEvent)>);

        canvas
            .add_event_listener_with_callback(
                "touchcancel",
                touchcancel_closure.as_ref().unchecked_ref(),
            )
            .unwrap();
        touchcancel_closure.forget();
    }

    fn current_time(&self) -> f64 {
        self.window.performance().unwrap().now()
    }

    /// Maps a centre-origin, y-up screen coordinate to canvas pixels
    /// (top-left origin, y down).
    fn canvas_point(game: &Game, screen: ScreenPos) -> (f64, f64) {
        let half = (game.config.window_px() / 2) as f64;
        (half + screen.x as f64, half - screen.y as f64)
    }

    fn draw_sprite(&self, game: &Game, sprite: &str, screen: ScreenPos) {
        let (x, y) = Self::canvas_point(game, screen);
        self.context
            .set_font(&format!("{}px serif", game.config.cell_px));
        self.context.set_text_align("center");
        self.context.set_text_baseline("middle");
        self.context.fill_text(sprite, x, y).unwrap();
    }

    fn draw_ui(&self, game: &Game) {
        let centre = (game.config.window_px() / 2) as f64;

        self.context.set_fill_style_str(COLOR_TEXT);
        self.context.set_text_align("center");
        self.context.set_text_baseline("middle");

        match game.state {
            GameState::Playing => {
                self.context.set_font("24px Arial");
                self.context
                    .fill_text(
                        &format!("Score: {}", game.scoreboard.score),
                        centre,
                        50.0,
                    )
                    .unwrap();
            }
            GameState::Won => {
                // The victory message replaces the score line, centred on
                // the window
                self.context.set_font("bold 36px Arial");
                self.context
                    .fill_text("Congratulations!", centre, centre - 24.0)
                    .unwrap();
                self.context
                    .fill_text("You won the game!", centre, centre + 24.0)
                    .unwrap();
            }
        }
    }
}

impl Renderer for WebRenderer {
    fn init(&mut self) -> io::Result<()> {
        self.setup_keyboard_listener();
        self.setup_touch_listeners();

        self.last_render_time = self.current_time();

        Ok(())
    }

    fn render(&mut self, game: &Game) -> io::Result<()> {
        let now = self.current_time();

        // Frame rate limiting
        if now - self.last_render_time < TARGET_FRAME_TIME {
            return Ok(());
        }
        self.last_render_time = now;

        // Display size (CSS pixels): the square game window
        let display_px = game.config.window_px() as u32;

        // Internal resolution (actual pixels, scaled for high DPI)
        let pixel_px = (display_px as f64 * self.device_pixel_ratio) as u32;

        if self.canvas.width() != pixel_px || self.canvas.height() != pixel_px {
            self.canvas.set_width(pixel_px);
            self.canvas.set_height(pixel_px);

            let element: &HtmlElement = self.canvas.unchecked_ref();
            element
                .style()
                .set_property("width", &format!("{}px", display_px))
                .unwrap();
            element
                .style()
                .set_property("height", &format!("{}px", display_px))
                .unwrap();

            // Setting canvas width/height resets the context, so reapply
            // the smoothing flag and the DPI scale
            self.context.set_image_smoothing_enabled(false);
            self.context
                .scale(self.device_pixel_ratio, self.device_pixel_ratio)
                .unwrap();
        }

        // White background
        self.context.set_fill_style_str(COLOR_BACKGROUND);
        self.context
            .fill_rect(0.0, 0.0, display_px as f64, display_px as f64);

        // Flowers first, butterfly on top
        self.context.set_fill_style_str(COLOR_TEXT);
        for flower in &game.flowers {
            self.draw_sprite(game, FLOWER_SPRITE, flower.screen);
        }
        self.draw_sprite(game, BUTTERFLY_SPRITE, game.butterfly.screen);

        self.draw_ui(game);

        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        // No cleanup needed for web
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<Option<Input>> {
        Ok(self.pending_input.borrow_mut().take())
    }
}
