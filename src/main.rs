//! Neon Snake entry point
//!
//! Web: wires DOM input, `requestAnimationFrame` and a canvas renderer to the
//! simulation. Native: runs a headless autopilot session against a synthetic
//! 60 Hz clock.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{CanvasRenderingContext2d, Document, Element, EventTarget, HtmlCanvasElement};

    use neon_snake::audio::AudioManager;
    use neon_snake::highscores::LocalStorageStore;
    use neon_snake::sim::{
        Command, Direction, EventSink, FrameRequester, GameEvent, GameLoop, GamePhase, InputHandle,
        Renderer, Session, Snapshot,
    };
    use neon_snake::{HighScore, Settings, SimConfig};

    /// `requestAnimationFrame` as a frame capability
    ///
    /// `request_frame` only records the request; `schedule` turns it into a
    /// real callback once the loop has been released.
    #[derive(Default)]
    struct RafFrames {
        wanted: bool,
        handle: Option<i32>,
    }

    impl FrameRequester for RafFrames {
        fn request_frame(&mut self) {
            self.wanted = true;
        }

        fn cancel_frame(&mut self) {
            self.wanted = false;
            if let (Some(id), Some(window)) = (self.handle.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }

    /// Plain canvas renderer plus DOM HUD/overlay updates
    struct CanvasRenderer {
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        document: Document,
        last_phase: Option<GamePhase>,
    }

    impl CanvasRenderer {
        fn new(document: Document) -> Option<Self> {
            let canvas = document
                .get_element_by_id("canvas")?
                .dyn_into::<HtmlCanvasElement>()
                .ok()?;
            let ctx = canvas
                .get_context("2d")
                .ok()
                .flatten()?
                .dyn_into::<CanvasRenderingContext2d>()
                .ok()?;
            Some(Self {
                canvas,
                ctx,
                document,
                last_phase: None,
            })
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn update_overlay(&mut self, snapshot: &Snapshot<'_>) {
            if self.last_phase == Some(snapshot.phase) && snapshot.phase != GamePhase::GameOver {
                return;
            }
            self.last_phase = Some(snapshot.phase);

            let Some(overlay) = self.document.get_element_by_id("overlay") else {
                return;
            };
            match snapshot.overlay() {
                Some(prompt) => {
                    let _ = overlay.set_attribute("class", "overlay show");
                    self.set_text("overlay-title", prompt.title);
                    self.set_text("overlay-text", &prompt.message);
                    self.set_text("overlay-btn", prompt.action);
                }
                None => {
                    let _ = overlay.set_attribute("class", "overlay");
                }
            }
        }
    }

    impl Renderer for CanvasRenderer {
        fn render(&mut self, snapshot: &Snapshot<'_>) {
            let board = self.canvas.width().min(self.canvas.height()) as f64;
            let cell = board / snapshot.grid_size as f64;
            let ctx = &self.ctx;

            ctx.set_fill_style_str("#070d1a");
            ctx.fill_rect(0.0, 0.0, board, board);

            ctx.set_fill_style_str("#ff4dc9");
            ctx.fill_rect(
                snapshot.food.x as f64 * cell + cell * 0.2,
                snapshot.food.y as f64 * cell + cell * 0.2,
                cell * 0.6,
                cell * 0.6,
            );

            let inset = cell * 0.08;
            for (i, segment) in snapshot.snake.iter().enumerate() {
                ctx.set_fill_style_str(if i == 0 { "#8bffb8" } else { "#36faff" });
                ctx.fill_rect(
                    segment.x as f64 * cell + inset,
                    segment.y as f64 * cell + inset,
                    cell - inset * 2.0,
                    cell - inset * 2.0,
                );
            }

            self.set_text("hud-score", &snapshot.score.to_string());
            self.set_text("hud-high-score", &snapshot.high_score.to_string());
            self.update_overlay(snapshot);
        }
    }

    type WebLoop = GameLoop<RafFrames, CanvasRenderer>;

    /// Audio shared between the loop (cues) and DOM listeners (unlock, mute)
    #[derive(Clone)]
    struct SharedAudio(Rc<RefCell<AudioManager>>);

    impl SharedAudio {
        fn resume(&self) {
            if let Ok(audio) = self.0.try_borrow() {
                audio.resume();
            }
        }

        fn set_muted(&self, muted: bool) {
            if let Ok(mut audio) = self.0.try_borrow_mut() {
                audio.set_muted(muted);
            }
        }
    }

    impl EventSink for SharedAudio {
        fn handle(&mut self, event: &GameEvent) {
            if let Ok(mut audio) = self.0.try_borrow_mut() {
                audio.handle(event);
            }
        }
    }

    /// DOM listeners kept alive until the loop stops, then removed
    #[derive(Default)]
    struct Listeners {
        registered: Vec<(EventTarget, &'static str, Closure<dyn FnMut(web_sys::Event)>)>,
    }

    impl Listeners {
        fn add(
            &mut self,
            target: &EventTarget,
            kind: &'static str,
            callback: impl FnMut(web_sys::Event) + 'static,
        ) {
            let closure = Closure::<dyn FnMut(web_sys::Event)>::new(callback);
            if target
                .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
                .is_ok()
            {
                self.registered.push((target.clone(), kind, closure));
            }
        }

        fn remove_all(&mut self) {
            for (target, kind, closure) in self.registered.drain(..) {
                let _ = target
                    .remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
                // The pagehide callback may be the one running right now
                closure.forget();
            }
        }
    }

    struct Game {
        game_loop: WebLoop,
        listeners: Listeners,
    }

    pub fn run() {
        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };
        let Some(renderer) = CanvasRenderer::new(document.clone()) else {
            log::error!("Canvas #canvas with a 2d context not found");
            return;
        };

        let settings = Settings::load();
        let high_score = HighScore::load(Box::new(LocalStorageStore));
        let session = Session::new(SimConfig::default(), high_score.best());
        let input = session.input_handle();

        let audio = SharedAudio(Rc::new(RefCell::new(AudioManager::new(&settings))));

        let mut game_loop = GameLoop::new(session, RafFrames::default(), renderer);
        game_loop.add_sink(Box::new(high_score));
        game_loop.add_sink(Box::new(audio.clone()));

        let game = Rc::new(RefCell::new(Game {
            game_loop,
            listeners: Listeners::default(),
        }));

        let mut listeners = Listeners::default();
        setup_input_handlers(&mut listeners, &window, &document, &input, &audio);
        setup_focus_handlers(&mut listeners, &window, &document, &settings, &input, &audio);
        {
            let game = game.clone();
            listeners.add(&window, "pagehide", move |_| stop(&game));
        }
        game.borrow_mut().listeners = listeners;

        game.borrow_mut().game_loop.start();
        schedule(game);
        log::info!("Neon Snake started");
    }

    fn setup_input_handlers(
        listeners: &mut Listeners,
        window: &web_sys::Window,
        document: &Document,
        input: &InputHandle,
        audio: &SharedAudio,
    ) {
        // Keyboard
        {
            let input = input.clone();
            let audio = audio.clone();
            listeners.add(window, "keydown", move |event| {
                let Some(key_event) = event.dyn_ref::<web_sys::KeyboardEvent>() else {
                    return;
                };
                if let Some(command) = Command::from_key(&key_event.key()) {
                    event.prevent_default();
                    // Browsers only start audio from a user gesture
                    audio.resume();
                    input.send(command);
                }
            });
        }

        // On-screen direction buttons: <button data-dir="up|down|left|right">
        if let Ok(buttons) = document.query_selector_all("[data-dir]") {
            for i in 0..buttons.length() {
                let Some(btn) = buttons.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                    continue;
                };
                let name = btn.get_attribute("data-dir").unwrap_or_default();
                let Some(dir) = Direction::from_control(&name) else {
                    log::warn!("Unknown control direction {:?}", name);
                    continue;
                };
                let input = input.clone();
                let audio = audio.clone();
                listeners.add(&btn, "click", move |_| {
                    audio.resume();
                    input.send(Command::Direction(dir));
                });
            }
        }

        // Overlay start/resume/restart
        if let Some(btn) = document.get_element_by_id("overlay-btn") {
            let input = input.clone();
            let audio = audio.clone();
            listeners.add(&btn, "click", move |_| {
                audio.resume();
                input.send(Command::StartOrRestart);
            });
        }
    }

    /// Focus loss (tab hidden, window blur): auto-pause and mute
    ///
    /// Both events fire on a tab switch, so the pause must be `Command::Pause`
    /// rather than a toggle.
    fn setup_focus_handlers(
        listeners: &mut Listeners,
        window: &web_sys::Window,
        document: &Document,
        settings: &Settings,
        input: &InputHandle,
        audio: &SharedAudio,
    ) {
        let auto_pause = settings.auto_pause;
        let mute_on_blur = settings.mute_on_blur;
        if !auto_pause && !mute_on_blur {
            return;
        }

        let on_blur = {
            let input = input.clone();
            let audio = audio.clone();
            move |why: &str| {
                if auto_pause && input.send(Command::Pause) {
                    log::debug!("Auto-pause requested ({})", why);
                }
                if mute_on_blur {
                    audio.set_muted(true);
                }
            }
        };
        let on_focus = {
            let audio = audio.clone();
            move || {
                if mute_on_blur {
                    audio.set_muted(false);
                }
            }
        };

        // Visibility change (tab switch, minimize)
        {
            let document_clone = document.clone();
            let on_blur = on_blur.clone();
            let on_focus = on_focus.clone();
            listeners.add(document, "visibilitychange", move |_| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    on_blur("tab hidden");
                } else {
                    on_focus();
                }
            });
        }

        // Window blur (click outside) and refocus
        listeners.add(window, "blur", move |_| on_blur("window blur"));
        listeners.add(window, "focus", move |_| on_focus());
    }

    /// Tear down: cancel the frame, close input, drop listeners
    fn stop(game: &Rc<RefCell<Game>>) {
        let Ok(mut g) = game.try_borrow_mut() else {
            return;
        };
        g.game_loop.stop();
        g.listeners.remove_all();
    }

    /// Turn a pending frame request into a real `requestAnimationFrame`
    fn schedule(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let mut g = game.borrow_mut();
        let frames = g.game_loop.frames_mut();
        if !frames.wanted {
            return;
        }
        frames.wanted = false;

        let next = game.clone();
        let closure = Closure::once(move |time: f64| game_loop(next, time));
        if let Ok(id) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            g.game_loop.frames_mut().handle = Some(id);
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.game_loop.frames_mut().handle = None;
            // rAF time is in milliseconds
            g.game_loop.on_frame(time / 1000.0);
        }
        schedule(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use neon_snake::highscores::FileStore;
    use neon_snake::sim::{
        Cell, Command, Direction, FrameRequester, GameLoop, GamePhase, GameState, Renderer,
        Session, Snapshot,
    };
    use neon_snake::{HighScore, SimConfig};

    /// Synthetic 60 Hz display
    pub const FRAME_DT: f64 = 1.0 / 60.0;
    /// Give up after ten simulated minutes
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    #[derive(Default)]
    struct HeadlessFrames {
        pending: bool,
    }

    impl FrameRequester for HeadlessFrames {
        fn request_frame(&mut self) {
            self.pending = true;
        }

        fn cancel_frame(&mut self) {
            self.pending = false;
        }
    }

    /// Logs score changes instead of drawing
    #[derive(Default)]
    struct LogRenderer {
        last_score: u64,
    }

    impl Renderer for LogRenderer {
        fn render(&mut self, snapshot: &Snapshot<'_>) {
            if snapshot.score != self.last_score {
                self.last_score = snapshot.score;
                log::debug!(
                    "score {} length {} speed {:.2}",
                    snapshot.score,
                    snapshot.snake.len(),
                    snapshot.speed
                );
            }
        }
    }

    /// Greedy steering: closest safe move toward the food
    fn autopilot(state: &GameState) -> Option<Direction> {
        let head = state.head();
        let distance = |c: Cell| (c - state.food).abs().element_sum();
        Direction::ALL
            .into_iter()
            .filter(|&d| d != state.direction.opposite())
            .map(|d| (d, head + d.delta()))
            .filter(|&(_, c)| neon_snake::sim::in_bounds(c, state.grid_size) && !state.occupies(c))
            .min_by_key(|&(_, c)| distance(c))
            .map(|(d, _)| d)
    }

    pub fn run(config: SimConfig, score_path: &str) {
        let high_score = HighScore::load(Box::new(FileStore::new(score_path)));
        let session = Session::new(config, high_score.best());
        let input = session.input_handle();

        let mut game = GameLoop::new(session, HeadlessFrames::default(), LogRenderer::default());
        game.add_sink(Box::new(high_score));
        game.start();

        input.send(Command::StartOrRestart);
        let mut now = 0.0;
        let mut frames = 0;
        while game.frames_mut().pending && frames < MAX_FRAMES {
            game.frames_mut().pending = false;
            if let Some(dir) = autopilot(game.session().state()) {
                input.send(Command::Direction(dir));
            }
            game.on_frame(now);
            now += FRAME_DT;
            frames += 1;

            if game.session().phase() == GamePhase::GameOver {
                break;
            }
        }

        let state = game.session().state();
        log::info!(
            "Run finished after {:.1}s: score {}, length {}, {:?}",
            now,
            state.score,
            state.snake.len(),
            state.end_reason
        );
        println!(
            "Score: {}  High score: {}",
            state.score,
            game.session().high_score()
        );
        game.stop();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Snake (native, headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            let loaded = std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|json| neon_snake::SimConfig::from_json(&json).map_err(|e| e.to_string()));
            match loaded {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Invalid config {}: {}", path, e);
                    std::process::exit(1);
                }
            }
        }
        None => neon_snake::SimConfig::default(),
    };
    let score_path = args
        .next()
        .unwrap_or_else(|| "neon-snake-highscore.json".to_string());

    headless::run(config, &score_path);
}
