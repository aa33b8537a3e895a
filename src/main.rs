//! Deep Clean headless runner
//!
//! Plays one autopilot run against a virtual 60 Hz clock and reports how
//! far it got. Usage:
//!
//! ```text
//! deep-clean [--tuning FILE] [--code clean25|clean50] [--seed N] [--frames N] [--scores FILE]
//! ```
//!
//! `RUST_LOG=debug` shows spawns, purchases and rejected actions.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use deep_clean::audio::LogPlayer;
    use deep_clean::consts::FRAME_MS;
    use deep_clean::persistence::{JsonFileStore, ScoreStore};
    use deep_clean::platform::{Autopilot, Session};
    use deep_clean::sim::{GamePhase, RunOptions, Simulation};
    use deep_clean::{Settings, Tuning};

    /// Ten simulated minutes
    const DEFAULT_FRAMES: u64 = 36_000;

    #[derive(Debug, Default)]
    struct Args {
        tuning: Option<PathBuf>,
        code: Option<String>,
        seed: Option<u64>,
        frames: Option<u64>,
        scores: Option<PathBuf>,
        settings: Option<PathBuf>,
    }

    fn parse_args() -> Args {
        let mut args = Args::default();
        let mut it = std::env::args().skip(1);
        while let Some(flag) = it.next() {
            let value = it.next();
            match (flag.as_str(), value) {
                ("--tuning", Some(v)) => args.tuning = Some(v.into()),
                ("--code", Some(v)) => args.code = Some(v),
                ("--seed", Some(v)) => args.seed = v.parse().ok(),
                ("--frames", Some(v)) => args.frames = v.parse().ok(),
                ("--scores", Some(v)) => args.scores = Some(v.into()),
                ("--settings", Some(v)) => args.settings = Some(v.into()),
                (other, _) => log::warn!("Ignoring argument '{}'", other),
            }
        }
        args
    }

    fn load_tuning(args: &Args) -> Tuning {
        let Some(path) = &args.tuning else {
            return Tuning::default();
        };
        Tuning::load(path).unwrap_or_else(|e| {
            log::warn!("{}; using default tuning", e);
            Tuning::default()
        })
    }

    pub fn run() {
        env_logger::init();
        log::info!("Deep Clean (headless) starting...");

        let args = parse_args();
        let tuning = load_tuning(&args);
        let sim = match args.seed {
            Some(seed) => Simulation::with_seed(tuning, seed),
            None => Simulation::new(tuning),
        };
        let settings = args
            .settings
            .as_deref()
            .map(Settings::load)
            .unwrap_or_default();
        let store =
            JsonFileStore::new(args.scores.clone().unwrap_or_else(|| "deep_clean_scores.json".into()));
        let previous_best = store.best_wave();
        log::info!("High scores at {} (best wave {})", store.path().display(), previous_best);
        let mut session = Session::new(sim, store, LogPlayer, settings);

        let options = args
            .code
            .as_deref()
            .and_then(RunOptions::from_code)
            .unwrap_or_default();
        let mut now = 0.0;
        session.start(options, now);

        let pilot = Autopilot::default();
        let frames = args.frames.unwrap_or(DEFAULT_FRAMES);
        for _ in 0..frames {
            now += FRAME_MS;
            match session.phase() {
                GamePhase::Playing => {
                    let input = pilot.input(session.sim());
                    session.frame(&input, now);
                }
                GamePhase::Upgrade => shop(&mut session, now),
                GamePhase::GameOver => break,
                GamePhase::Menu | GamePhase::Paused => break,
            }
        }

        let hud = session.hud(now);
        log::info!(
            "Run finished: wave {}, gold {}, hp {}/{} after {:.1}s simulated",
            hud.wave,
            hud.gold,
            hud.hp,
            hud.max_hp,
            now / 1000.0
        );
        if session.scores().best_wave() > previous_best {
            log::info!("New best wave {} (was {})", session.scores().best_wave(), previous_best);
        }
    }

    /// Buy the cheapest affordable card, otherwise skip
    fn shop<S: ScoreStore>(session: &mut Session<S, LogPlayer>, now: f64) {
        let cheapest = session
            .offers()
            .into_iter()
            .filter(|o| o.affordable)
            .min_by_key(|o| o.cost);
        let result = match cheapest {
            Some(offer) => session.purchase(offer.slot, now).map(|_| ()),
            None => session.skip(now),
        };
        // Debounced clicks are expected for the first second of the menu
        if let Err(e) = result {
            log::trace!("Shop action rejected: {}", e);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly on the web
}
