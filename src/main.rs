//! Touchline headless runner
//!
//! Plays an all-AI match at the fixed timestep and prints a HUD snapshot as
//! JSON once per simulated second.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use touchline::Tuning;
use touchline::consts::SIM_DT;
use touchline::sim::{HudSnapshot, MatchState, TickInput, tick};
use touchline::tuning::MatchLength;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SportArg {
    Pitch,
    Gridiron,
}

#[derive(Parser, Debug)]
#[command(name = "touchline", version, about = "Headless all-AI match runner")]
struct Args {
    /// Sport to simulate
    #[arg(value_enum, default_value_t = SportArg::Pitch)]
    sport: SportArg,
    /// Match RNG seed
    #[arg(long, default_value_t = 12345)]
    seed: u64,
    /// Simulated seconds to run
    #[arg(long, default_value_t = 30.0, value_parser = parse_seconds)]
    seconds: f32,
    /// Pitch half length preset: short, standard or full
    #[arg(long, value_parser = parse_length)]
    length: Option<MatchLength>,
    /// JSON tuning document; missing fields keep their defaults
    #[arg(long)]
    tuning: Option<PathBuf>,
}

fn parse_seconds(s: &str) -> Result<f32, String> {
    let seconds: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if seconds.is_finite() && seconds > 0.0 {
        Ok(seconds)
    } else {
        Err(format!("expected a positive number of seconds, got {s}"))
    }
}

fn parse_length(s: &str) -> Result<MatchLength, String> {
    MatchLength::from_str(s).ok_or_else(|| format!("unknown match length '{s}'"))
}

fn load_tuning(path: &PathBuf) -> Result<Tuning, String> {
    let json = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    Tuning::from_json(&json).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut tuning = match &args.tuning {
        Some(path) => match load_tuning(path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };
    if let Some(length) = args.length {
        tuning.pitch.match_length = length;
        tuning.pitch.half_duration = None;
    }

    let mut state = match args.sport {
        SportArg::Pitch => MatchState::new_pitch(args.seed, tuning),
        SportArg::Gridiron => MatchState::new_gridiron(args.seed, tuning),
    };
    log::info!(
        "Touchline starting: {:?}, seed {}, {}s, {} halves",
        args.sport,
        args.seed,
        args.seconds,
        state.tuning.pitch.match_length.as_str()
    );

    let input = TickInput::default();
    let ticks = (args.seconds / SIM_DT).round() as u64;
    let per_second = (1.0 / SIM_DT).round() as u64;
    for i in 1..=ticks {
        tick(&mut state, &input, SIM_DT);
        if i % per_second == 0 {
            match HudSnapshot::capture(&state).to_json() {
                Ok(json) => println!("{json}"),
                Err(e) => log::warn!("Snapshot failed: {e}"),
            }
        }
    }

    let score = state.rules.score();
    log::info!("Finished after {} ticks: {} - {}", state.time_ticks, score.home, score.away);
    ExitCode::SUCCESS
}
