//! Arena Rivals entry point
//!
//! Web: wires keyboard/mouse input, Web Audio and the HUD around the
//! simulation and hands a JSON frame to the page's renderer.
//! Native: runs a headless autopilot match and logs how it went.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use serde::Serialize;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use arena_rivals::audio::WebAudio;
    use arena_rivals::consts::*;
    use arena_rivals::feedback::{Cue, CueLog, Feedback};
    use arena_rivals::sim::{
        Combatant, MatchPhase, MatchState, Obstacle, PowerUp, Projectile, Side, TickInput, tick,
    };
    use arena_rivals::stats::format_time;
    use arena_rivals::{CareerStats, Difficulty, Settings};

    /// Name of the page function that draws a frame
    const RENDER_HOOK: &str = "arenaRender";

    /// Keys currently held down
    #[derive(Debug, Default, Clone, Copy)]
    struct Held {
        up: bool,
        down: bool,
        left: bool,
        right: bool,
        fire: bool,
    }

    impl Held {
        fn movement(&self) -> Vec2 {
            let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
            Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
        }
    }

    /// What the page's renderer receives every frame
    #[derive(Serialize)]
    struct Frame<'a> {
        phase: MatchPhase,
        round: u32,
        countdown: f32,
        player: &'a Combatant,
        ai: &'a Combatant,
        projectiles: &'a [Projectile],
        powerups: &'a [PowerUp],
        obstacles: &'a [Obstacle],
        cues: Vec<Cue>,
    }

    struct Game {
        state: MatchState,
        input: TickInput,
        held: Held,
        aim: Vec2,
        accumulator: f32,
        last_time: f64,
        audio: WebAudio,
        effects: CueLog,
        settings: Settings,
        career: CareerStats,
        /// Career already updated for the current MatchOver
        recorded: bool,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let mut audio = WebAudio::new();
            audio.set_muted(!settings.sfx);
            Self {
                state: MatchState::new(settings.match_config(seed)),
                input: TickInput::default(),
                held: Held::default(),
                aim: Vec2::ZERO,
                accumulator: 0.0,
                last_time: 0.0,
                audio,
                effects: CueLog::new(),
                career: CareerStats::load(),
                settings,
                recorded: false,
            }
        }

        /// Fixed-step simulation with a bounded number of substeps
        fn update(&mut self, dt: f32) {
            self.accumulator += dt.min(MAX_FRAME_DT);

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.input.player.movement = self.held.movement();
                self.input.player.aim = Some(self.aim);
                self.input.player.shooting = self.held.fire;

                let mut fx = Feedback::new(&mut self.audio, &mut self.effects);
                tick(&mut self.state, &self.input, SIM_DT, &mut fx);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // One-shot inputs
                self.input.pause = false;
                self.input.player.dash = false;
                self.input.player.special = false;
                self.input.player.reload = false;
            }

            if self.state.phase == MatchPhase::MatchOver && !self.recorded {
                self.recorded = self.state.record_career(&mut self.career);
                self.career.save();
            }
        }

        fn restart(&mut self) {
            self.state.rematch();
            self.recorded = false;
            self.accumulator = 0.0;
            self.input = TickInput::default();
        }

        /// Digit keys pick an offer between rounds; Enter continues without one
        fn choose(&mut self, key: &str) {
            match self.state.phase {
                MatchPhase::RoundOver => {
                    let pick = match key {
                        "1" | "2" | "3" => key
                            .parse::<usize>()
                            .ok()
                            .and_then(|n| self.state.upgrade_offers.get(n - 1).copied()),
                        _ => None,
                    };
                    let mut fx = Feedback::new(&mut self.audio, &mut self.effects);
                    self.state.next_round(pick, &mut fx);
                }
                MatchPhase::MatchOver => self.restart(),
                _ => {}
            }
        }

        fn set_difficulty(&mut self, difficulty: Difficulty) {
            self.state.set_difficulty(difficulty);
            self.settings.difficulty = difficulty;
            self.settings.save();
            log::info!("Difficulty: {}", difficulty.as_str());
        }

        fn publish(&mut self) {
            let frame = Frame {
                phase: self.state.phase,
                round: self.state.round,
                countdown: self.state.countdown,
                player: &self.state.player,
                ai: &self.state.ai,
                projectiles: &self.state.projectiles,
                powerups: &self.state.powerups.items,
                obstacles: &self.state.arena.obstacles,
                cues: self.effects.drain().collect(),
            };
            let Some(window) = web_sys::window() else {
                return;
            };
            let Ok(hook) = js_sys::Reflect::get(&window, &JsValue::from_str(RENDER_HOOK)) else {
                return;
            };
            let Ok(hook) = hook.dyn_into::<js_sys::Function>() else {
                return;
            };
            match serde_json::to_string(&frame) {
                Ok(json) => {
                    let _ = hook.call1(&JsValue::NULL, &JsValue::from_str(&json));
                }
                Err(e) => log::warn!("Frame not serializable: {}", e),
            }
        }

        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let set = |id: &str, text: &str| {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(text));
                }
            };
            let s = &self.state;

            set("hud-player-health", &format!("{:.0}", s.player.health));
            set("hud-ai-health", &format!("{:.0}", s.ai.health));
            set("hud-ammo", &s.player.weapon.ammo_display());
            set("hud-timer", &format_time(s.round_time_left));
            set("hud-round", &s.round.to_string());
            set("hud-wins", &format!("{} - {}", s.player_wins, s.ai_wins));

            let offers = s
                .upgrade_offers
                .iter()
                .enumerate()
                .map(|(i, u)| format!("[{}] {}: {}", i + 1, u.name(), u.description()))
                .collect::<Vec<_>>()
                .join("\n");
            set("hud-offers", &offers);

            let banner = match s.phase {
                MatchPhase::Countdown => format!("{}", s.countdown.ceil() as u32),
                MatchPhase::Playing => String::new(),
                MatchPhase::Paused => "Paused".to_string(),
                MatchPhase::RoundOver => match s.round_winner {
                    Some(Side::Player) => "Round won".into(),
                    Some(_) => "Round lost".into(),
                    None => "Draw".into(),
                },
                MatchPhase::MatchOver => format!(
                    "{} - accuracy {}%, career {}W/{}L",
                    if s.match_winner == Some(Side::Player) {
                        "Victory"
                    } else {
                        "Defeat"
                    },
                    s.stats.accuracy(),
                    self.career.wins,
                    self.career.losses
                ),
            };
            set("hud-banner", &banner);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already initialised".into());
        }

        log::info!("Arena Rivals starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let canvas: Option<HtmlCanvasElement> = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok());
        let Some(canvas) = canvas else {
            log::error!("No #canvas element");
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Match seeded with {}", seed);

        setup_input_handlers(&window, &canvas, game.clone());
        setup_auto_pause(&window, game.clone());
        request_animation_frame(game);
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) {
        // Pointer position -> arena coordinates
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let w = canvas_clone.client_width().max(1) as f32;
                let h = canvas_clone.client_height().max(1) as f32;
                let x = event.offset_x() as f32 / w * ARENA_WIDTH;
                let y = event.offset_y() as f32 / h * ARENA_HEIGHT;
                game.borrow_mut().aim = Vec2::new(x, y);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for (name, down) in [("mousedown", true), ("mouseup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.held.fire = down;
                // Browsers only allow audio after a gesture
                g.audio.resume();
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for (name, down) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "KeyW" | "ArrowUp" => g.held.up = down,
                    "KeyS" | "ArrowDown" => g.held.down = down,
                    "KeyA" | "ArrowLeft" => g.held.left = down,
                    "KeyD" | "ArrowRight" => g.held.right = down,
                    _ if !down => {}
                    "Space" | "ShiftLeft" => g.input.player.dash = true,
                    "KeyE" | "KeyQ" => g.input.player.special = true,
                    "KeyR" => g.input.player.reload = true,
                    "Escape" | "KeyP" => g.input.pause = true,
                    "KeyI" => {
                        g.input.autopilot = !g.input.autopilot;
                        log::info!("Autopilot: {}", g.input.autopilot);
                    }
                    "F1" => g.set_difficulty(Difficulty::Easy),
                    "F2" => g.set_difficulty(Difficulty::Medium),
                    "F3" => g.set_difficulty(Difficulty::Hard),
                    "F4" => g.set_difficulty(Difficulty::Insane),
                    "Digit1" => g.choose("1"),
                    "Digit2" => g.choose("2"),
                    "Digit3" => g.choose("3"),
                    "Enter" => g.choose("Enter"),
                    _ => {}
                }
            });
            let _ = window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut g = game.borrow_mut();
            if g.state.phase == MatchPhase::Playing {
                g.input.pause = true;
                g.held = Held::default();
                log::info!("Auto-paused (window blur)");
            }
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.publish();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use arena_rivals::audio::NullAudio;
    use arena_rivals::consts::SIM_DT;
    use arena_rivals::feedback::{Feedback, Silent};
    use arena_rivals::sim::{MatchPhase, MatchState, TickInput, tick};
    use arena_rivals::stats::format_time;
    use arena_rivals::{CareerStats, Difficulty, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let difficulty = args
        .next()
        .and_then(|s| Difficulty::from_str(&s))
        .unwrap_or_default();
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    log::info!(
        "Arena Rivals (native): autopilot vs {} AI, seed {}",
        difficulty.as_str(),
        seed
    );

    let config = Settings {
        difficulty,
        ..Settings::default()
    }
    .match_config(seed);
    let mut state = MatchState::new(config);
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let mut audio = NullAudio;
    let mut effects = Silent;

    // Hard stop well past any real match length
    let max_ticks = 60 * 60 * 30;
    let mut ticks = 0;
    while state.phase != MatchPhase::MatchOver && ticks < max_ticks {
        let mut fx = Feedback::new(&mut audio, &mut effects);
        tick(&mut state, &input, SIM_DT, &mut fx);
        ticks += 1;

        if state.phase == MatchPhase::RoundOver {
            let pick = state.upgrade_offers.first().copied();
            if let Some(upgrade) = pick {
                log::info!("Autopilot takes {}", upgrade.name());
            }
            state.next_round(pick, &mut fx);
        }
    }

    let mut career = CareerStats::new();
    if !state.record_career(&mut career) {
        log::warn!("Match did not finish within {} ticks", max_ticks);
        return;
    }
    log::info!(
        "{:?} wins {}-{} after {} rounds ({} played)",
        state.match_winner,
        state.player_wins,
        state.ai_wins,
        state.round,
        format_time(state.stats.time_played)
    );
    log::info!(
        "Autopilot: {:.0} damage, {} shots, {}% accuracy",
        state.stats.damage_dealt,
        state.stats.shots_fired,
        state.stats.accuracy()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Entry point is wasm_main
}
