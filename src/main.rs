//! track-forge - generate a race track from a seed
//!
//! Prints a per-segment summary, or the full track as JSON.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};
    use clap::Parser;

    use track_forge::{Track, TrackConfig, TrackLength, generate};

    #[derive(Parser)]
    #[command(name = "track-forge")]
    #[command(about = "Seeded procedural race track generator")]
    #[command(version)]
    struct Cli {
        /// Seed string (same seed and config give the same track)
        seed: String,

        /// Length preset: sprint, standard or endurance
        #[arg(short, long)]
        length: Option<TrackLength>,

        /// JSON config file (missing fields take defaults)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the whole track as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Re-check layout invariants and fail if any is broken
        #[arg(long)]
        validate: bool,
    }

    fn load_config(cli: &Cli) -> Result<TrackConfig> {
        let mut config = match &cli.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                TrackConfig::from_json(&text)
                    .with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => TrackConfig::default(),
        };
        if let Some(preset) = cli.length {
            config.apply_preset(preset);
        }
        Ok(config)
    }

    fn print_summary(track: &Track) {
        println!("Track '{}'", track.seed);
        for seg in &track.segments {
            let p = seg.entry.position;
            let gate = match seg.checkpoint_order() {
                Some(order) => format!(" #{order}"),
                None => String::new(),
            };
            println!(
                "  {:>3}  {:<14} ({:>7.1}, {:>5.1}, {:>7.1})  heading {}  bank {:+.2}{}",
                seg.index,
                seg.kind.as_str(),
                p.x,
                p.y,
                p.z,
                seg.entry.heading.index(),
                seg.entry.bank,
                gate
            );
        }
        let s = &track.stats;
        println!(
            "{} segments ({} checkpoints, {} turbos, {} turns, {} ramps, {} bank transitions)",
            s.segments, s.checkpoints, s.turbos, s.turns, s.ramps, s.bank_transitions
        );
        println!(
            "{} steps, {} backtracks, preferred length {}{}",
            s.steps,
            s.backtracks,
            s.preferred_length,
            if s.forced_finish { ", forced finish" } else { "" }
        );
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        let config = load_config(&cli)?;
        log::info!(
            "Generating '{}' (preferred {}-{}, cap {})",
            cli.seed,
            config.preferred_length_min,
            config.preferred_length_max,
            config.max_segments
        );

        let track = generate(&cli.seed, &config);

        if cli.validate {
            if let Err(e) = track.validate() {
                bail!("Track '{}' failed validation: {e}", track.seed);
            }
            log::info!("Track '{}' passed validation", track.seed);
        }

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&track)?);
        } else {
            print_summary(&track);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    cli::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry points live in the library's `wasm` module
}
