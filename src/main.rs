//! Pong Marathon entry point
//!
//! Wasm builds wire the simulation to the page (canvas, keyboard, the New
//! Game button) and drive it from requestAnimationFrame. Native builds run a
//! short headless smoke simulation.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlImageElement, KeyboardEvent, MouseEvent};

    use pong_marathon::audio::AudioManager;
    use pong_marathon::consts::*;
    use pong_marathon::render::Renderer;
    use pong_marathon::sim::{
        Cue, GamePhase, GameState, InputState, Scheduler, Task, run_task, tick,
    };

    /// Everything one browser session owns
    struct App {
        state: GameState,
        input: InputState,
        sched: Scheduler,
        audio: AudioManager,
        renderer: Renderer,
        /// True while a frame callback is outstanding
        raf_active: bool,
    }

    impl App {
        /// One frame: apply due delayed effects, tick, draw.
        /// Returns false when no further frames should be scheduled.
        fn step(&mut self, now: f64) -> bool {
            for task in self.sched.drain_due(now) {
                if let Some(cue) = run_task(&mut self.state, &mut self.sched, now, task) {
                    self.audio.play(cue);
                }
            }

            let input = self.input;
            for cue in tick(&mut self.state, &input, &mut self.sched, now) {
                self.audio.play(cue);
            }

            self.renderer.render(&self.state);

            match self.state.phase {
                // Keep draining until the delayed game-over sting has fired
                GamePhase::GameOver => !self.sched.is_idle(),
                GamePhase::Splash => false,
                _ => true,
            }
        }

        /// Full session reset: every pending delayed effect from the old
        /// session is cancelled before the new state exists, so nothing
        /// stale can touch it
        fn restart(&mut self, now: f64) {
            self.sched.cancel_all();
            let seed = js_sys::Date::now() as u64;
            self.state = GameState::new(seed);
            self.state.begin_round();
            self.input = InputState::default();
            self.sched
                .schedule_after(now, PRE_ROLL_DELAY_MS, Task::BeginPlay);
            self.audio.play(Cue::GameStart);
            log::info!("new game (seed {seed})");
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Pong Marathon starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(FIELD_WIDTH as u32);
        canvas.set_height(FIELD_HEIGHT as u32);

        // Optional sprite; the renderer falls back to a rect without it
        let ball_sprite = document
            .get_element_by_id("ball")
            .and_then(|el| el.dyn_into::<HtmlImageElement>().ok());

        let renderer = Renderer::new(&canvas, ball_sprite).expect("Failed to create 2d renderer");

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App {
            state: GameState::new(seed),
            input: InputState::default(),
            sched: Scheduler::new(),
            audio: AudioManager::new(),
            renderer,
            raf_active: false,
        }));

        // Splash screen until the player starts a game
        {
            let a = app.borrow();
            a.renderer.render(&a.state);
        }

        setup_input_handlers(app.clone());
        setup_new_game_button(app.clone());

        log::info!("Pong Marathon ready");
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();

        // Key down: start holding a direction
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => a.input.set_left(true),
                    "ArrowRight" => a.input.set_right(true),
                    "m" | "M" => {
                        let muted = a.audio.toggle_muted();
                        log::info!("audio muted: {muted}");
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up: release
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => a.input.set_left(false),
                    "ArrowRight" => a.input.set_right(false),
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_new_game_button(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("new-game") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().restart(js_sys::Date::now());
                start_loop(&app);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::error!("no #new-game button found, the game cannot be started");
        }
    }

    /// Begin frame scheduling if the loop is currently halted
    fn start_loop(app: &Rc<RefCell<App>>) {
        let mut a = app.borrow_mut();
        if !a.raf_active {
            a.raf_active = true;
            drop(a);
            request_frame(app.clone());
        }
    }

    fn request_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| frame(app));
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(app: Rc<RefCell<App>>) {
        let keep_going = app.borrow_mut().step(js_sys::Date::now());
        if keep_going {
            request_frame(app);
        } else {
            app.borrow_mut().raf_active = false;
            log::info!("frame loop halted");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use pong_marathon::consts::PRE_ROLL_DELAY_MS;
    use pong_marathon::sim::{GameState, InputState, Scheduler, Task, run_task, tick};

    env_logger::init();
    log::info!("Pong Marathon (native) starting headless smoke run...");

    let mut state = GameState::new(0xDECAF);
    state.begin_round();
    let mut sched = Scheduler::new();
    sched.schedule_after(0.0, PRE_ROLL_DELAY_MS, Task::BeginPlay);

    // Chase the ball so the run survives a while
    let frame_ms = 1000.0 / 60.0;
    for i in 0..3600u32 {
        let now = i as f64 * frame_ms;
        for task in sched.drain_due(now) {
            run_task(&mut state, &mut sched, now, task);
        }
        let ball_center = state.ball.pos.x + state.ball.size.x / 2.0;
        let paddle_center = state.paddle.pos.x + state.paddle.size.x / 2.0;
        let input = InputState {
            left: ball_center < paddle_center - 10.0,
            right: ball_center > paddle_center + 10.0,
        };
        let cues = tick(&mut state, &input, &mut sched, now);
        for cue in cues {
            log::debug!("tick {i}: cue {cue:?}");
        }
    }

    println!(
        "after 60s simulated: score {}, lives {}, phase {:?}",
        state.score, state.paddle.lives, state.phase
    );
}
