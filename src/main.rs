//! SWITCH BACK headless runner
//!
//! Plays a level without a window: a seeded input script stands in for the
//! keyboard and simulated frame times with jitter drive the fixed-step loop.
//! Useful for soak-testing maps and tuning files.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use switch_back::audio::{AudioManager, LogAudio};
use switch_back::consts::REFERENCE_DT;
use switch_back::ranking::{DEFAULT_RANKING_FILE, Ranking, format_time};
use switch_back::sim::{Level, LevelOutcome, TickInput};
use switch_back::{GameConfig, LevelLayout, init_logging};

/// Longest frame the loop will catch up on
const MAX_FRAME_DT: f32 = 0.1;
const MAX_SUBSTEPS: u32 = 5;

const DEFAULT_MAP: &str = "\
##############################
#............................#
#.S.......a.........S........#
#####H######....#######H######
#....H..........~......H.....#
#.P..H....M>>>..~~.....H..S..#
####################.#########
#..........H.......S.........#
#.S........H......M>>>>>...G.#
#~~~~~~~~~~###################
##############################";

/// Headless SWITCH BACK runner
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Map file (ASCII or JSON layout); the built-in level when omitted
    #[arg(short, long)]
    map: Option<PathBuf>,

    /// JSON tuning file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulated frames to run
    #[arg(short, long, default_value_t = 3600)]
    frames: u32,

    /// Seed for the input script and frame jitter
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Record a victory in the ranking under this name
    #[arg(short, long)]
    name: Option<String>,

    /// Ranking file
    #[arg(long, default_value = DEFAULT_RANKING_FILE)]
    ranking: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Random key presses held for a few frames at a time
struct InputScript {
    rng: Pcg32,
    current: TickInput,
    hold_frames: u32,
}

impl InputScript {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            current: TickInput::default(),
            hold_frames: 0,
        }
    }

    fn next(&mut self) -> TickInput {
        if self.hold_frames == 0 {
            let horizontal = self.rng.random_range(0..3);
            self.current = TickInput {
                left: horizontal == 0,
                right: horizontal == 2,
                up: self.rng.random_bool(0.2),
                down: self.rng.random_bool(0.1),
                jump: self.rng.random_bool(0.25),
                toggle_inventory: self.rng.random_bool(0.02),
                ..Default::default()
            };
            self.hold_frames = self.rng.random_range(6..30);
            return self.current;
        }
        self.hold_frames -= 1;
        // One-shots only fire on the first frame of a hold
        TickInput {
            toggle_inventory: false,
            ..self.current
        }
    }

    /// Frame duration with a little jitter around 60 Hz
    fn frame_dt(&mut self) -> f32 {
        REFERENCE_DT * self.rng.random_range(0.75f32..1.25)
    }
}

/// Fixed-step driver
struct Demo {
    level: Level,
    audio: AudioManager<LogAudio>,
    script: InputScript,
    accumulator: f32,
}

impl Demo {
    /// Run one simulated frame; returns the first non-continue outcome
    fn frame(&mut self) -> LevelOutcome {
        let dt = self.script.frame_dt().min(MAX_FRAME_DT);
        self.accumulator += dt;
        self.level.handle_input(self.script.next());

        let mut outcome = LevelOutcome::Continue;
        let mut substeps = 0;
        while self.accumulator >= REFERENCE_DT && substeps < MAX_SUBSTEPS {
            let step = self.level.tick(REFERENCE_DT);
            self.audio
                .play_events(&self.level.events, &self.level.config.required_item_kind);
            self.accumulator -= REFERENCE_DT;
            substeps += 1;

            if step != LevelOutcome::Continue {
                outcome = step;
            }
            if matches!(step, LevelOutcome::Victory(_) | LevelOutcome::GameOver) {
                break;
            }
        }
        outcome
    }
}

fn record_victory(args: &Args, elapsed_ms: u64) -> Result<(), Box<dyn Error>> {
    let Some(name) = args.name.as_deref() else {
        return Ok(());
    };
    let mut ranking = Ranking::load(&args.ranking);
    match ranking.add_time(name, elapsed_ms) {
        Some(rank) => {
            log::info!("{} placed #{} with {}", name, rank, format_time(elapsed_ms));
            ranking.save(&args.ranking)?;
        }
        None => log::info!("{} did not make the ranking", format_time(elapsed_ms)),
    }
    for (i, entry) in ranking.entries.iter().enumerate() {
        log::info!("{:02}. {:<10} {}", i + 1, entry.name, format_time(entry.time_ms));
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.verbose);
    log::info!("SWITCH BACK (headless) starting, seed {}", args.seed);

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let layout = match &args.map {
        Some(path) => LevelLayout::load(path, config.tile_size)?,
        None => switch_back::map::parse_ascii(DEFAULT_MAP, config.tile_size)?,
    };

    let mut demo = Demo {
        level: Level::new(layout, config),
        audio: AudioManager::new(LogAudio),
        script: InputScript::new(args.seed),
        accumulator: 0.0,
    };

    let mut respawns = 0;
    let mut result = None;
    for _ in 0..args.frames {
        match demo.frame() {
            LevelOutcome::Continue => {}
            LevelOutcome::PlayerRespawned => respawns += 1,
            terminal => {
                result = Some(terminal);
                break;
            }
        }
    }

    let hud = demo.level.hud();
    log::info!(
        "Lives {} | time {} | items {}/{} | next flip in {:.1}s | respawns {}",
        hud.lives,
        format_time(hud.elapsed_ms),
        hud.items_collected,
        hud.items_required,
        hud.gravity_flip_in_ms as f32 / 1000.0,
        respawns
    );
    if hud.show_inventory {
        log::info!("Inventory: {:?}", hud.inventory);
    }

    match result {
        Some(LevelOutcome::Victory(elapsed_ms)) => {
            log::info!("Victory in {}", format_time(elapsed_ms));
            record_victory(&args, elapsed_ms)?;
        }
        Some(LevelOutcome::GameOver) => log::info!("Game over"),
        _ => log::info!("Stopped after {} frames", args.frames),
    }
    Ok(())
}
