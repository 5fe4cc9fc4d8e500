//! Canvas 2D rendering
//!
//! Thin read-only view over the simulation: entities, HUD text, splash and
//! game-over screens. The ball uses a sprite image when the page provides
//! one and degrades to a filled rectangle otherwise.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::sim::{GamePhase, GameState};

const TEXT_COLOR: &str = "black";
const BALL_COLOR: &str = "black";
const PADDLE_COLOR: &str = "green";
const FONT_FAMILY: &str = "Arial";
const FONT_SIZE: f32 = 25.0;

pub struct Renderer {
    ctx: CanvasRenderingContext2d,
    /// Optional sprite from the page's `#ball` image element
    ball_sprite: Option<HtmlImageElement>,
}

impl Renderer {
    pub fn new(
        canvas: &HtmlCanvasElement,
        ball_sprite: Option<HtmlImageElement>,
    ) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        if ball_sprite.is_none() {
            log::info!("no ball sprite found, falling back to rect rendering");
        }
        Ok(Self { ctx, ball_sprite })
    }

    /// Draw one frame for the current phase
    pub fn render(&self, state: &GameState) {
        self.ctx
            .clear_rect(0.0, 0.0, state.field.x as f64, state.field.y as f64);

        match state.phase {
            GamePhase::Splash => self.draw_splash(state),
            GamePhase::Ready | GamePhase::Playing => self.draw_scene(state),
            GamePhase::GameOver => {
                self.draw_scene(state);
                self.draw_game_over(state);
            }
        }
    }

    fn draw_scene(&self, state: &GameState) {
        self.draw_ball(state);
        self.draw_paddle(state);
        self.draw_hud(state);
    }

    fn draw_ball(&self, state: &GameState) {
        let ball = &state.ball;
        match &self.ball_sprite {
            Some(img) => {
                let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    img,
                    ball.pos.x as f64,
                    ball.pos.y as f64,
                    ball.size.x as f64,
                    ball.size.y as f64,
                );
            }
            None => {
                self.ctx.set_fill_style_str(BALL_COLOR);
                self.ctx.fill_rect(
                    ball.pos.x as f64,
                    ball.pos.y as f64,
                    ball.size.x as f64,
                    ball.size.y as f64,
                );
            }
        }
    }

    fn draw_paddle(&self, state: &GameState) {
        let paddle = &state.paddle;
        self.ctx.set_fill_style_str(PADDLE_COLOR);
        self.ctx.fill_rect(
            paddle.pos.x as f64,
            paddle.pos.y as f64,
            paddle.size.x as f64,
            paddle.size.y as f64,
        );
    }

    fn draw_hud(&self, state: &GameState) {
        self.ctx.save();
        self.ctx.set_fill_style_str(TEXT_COLOR);
        self.ctx.set_font(&font(FONT_SIZE));

        self.ctx.set_text_align("left");
        let _ = self
            .ctx
            .fill_text(&format!("Score: {}", state.score), 12.0, 30.0);

        self.ctx.set_text_align("right");
        let _ = self.ctx.fill_text(
            &format!("Lives: {}", state.paddle.lives),
            state.field.x as f64 - 12.0,
            30.0,
        );
        self.ctx.restore();
    }

    fn draw_splash(&self, state: &GameState) {
        let cx = state.field.x as f64 / 2.0;
        self.ctx.set_fill_style_str(TEXT_COLOR);
        self.ctx.set_text_align("center");

        self.ctx.set_font(&font(FONT_SIZE * 3.0));
        let _ = self
            .ctx
            .fill_text("PONG MARATHON", cx, state.field.y as f64 * 0.45);

        self.ctx.set_font(&font(FONT_SIZE * 1.5));
        let _ = self.ctx.fill_text(
            "Select \"New Game\" below to start!",
            cx,
            state.field.y as f64 * 0.6,
        );
    }

    fn draw_game_over(&self, state: &GameState) {
        let cx = state.field.x as f64 / 2.0;
        self.ctx.set_fill_style_str(TEXT_COLOR);
        self.ctx.set_text_align("center");

        self.ctx.set_font(&font(FONT_SIZE * 2.5));
        let _ = self.ctx.fill_text("GAME OVER", cx, state.field.y as f64 / 2.0);

        self.ctx.set_font(&font(FONT_SIZE * 1.5));
        let _ = self.ctx.fill_text(
            "Better luck next time!",
            cx,
            state.field.y as f64 * 0.6,
        );
    }
}

fn font(size: f32) -> String {
    format!("{size}px {FONT_FAMILY}")
}
