//! Flappy Replay headless runner
//!
//! Records autopilot episodes into replay archives and plays archives back
//! without a window. Host frames are simulated at 60 Hz.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result, bail};
    use clap::{Parser, Subcommand};
    use log::{info, warn};

    use flappy_replay::consts::DEFAULT_SEED;
    use flappy_replay::persistence::{DirArchive, export_file_name};
    use flappy_replay::platform::LogHost;
    use flappy_replay::renderer::DrawList;
    use flappy_replay::replay::ReplayPhase;
    use flappy_replay::{Autopilot, Game, Tuning};

    const HOST_FRAME_MS: f64 = 1000.0 / 60.0;

    #[derive(Parser, Debug)]
    #[command(about = "Record and replay Flappy Bird episodes headlessly", version)]
    struct Args {
        #[command(subcommand)]
        command: Command,
    }

    #[derive(Subcommand, Debug)]
    enum Command {
        /// Fly episodes with the autopilot and export them as one archive
        Record {
            /// JSON file overriding the default simulation constants
            #[arg(long)]
            tuning: Option<PathBuf>,
            /// Directory the archive is written into
            #[arg(long, default_value = ".")]
            out: PathBuf,
            #[arg(long, default_value_t = DEFAULT_SEED)]
            seed: u64,
            #[arg(long, default_value_t = 1)]
            episodes: u32,
            /// Host frames after which the autopilot lets go of the bird
            #[arg(long, default_value_t = 3_600)]
            max_frames: u32,
        },
        /// Import an archive directory and play it back
        Replay {
            dir: PathBuf,
        },
    }

    fn load_tuning(path: Option<&Path>) -> Result<Tuning> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading tuning file {}", path.display()))?;
        Tuning::from_json(&json).with_context(|| format!("parsing tuning file {}", path.display()))
    }

    fn record(
        tuning: Tuning,
        out: &Path,
        seed: u64,
        episodes: u32,
        max_frames: u32,
    ) -> Result<()> {
        let autopilot = Autopilot::new();
        let tuning = Tuning {
            agent_type: autopilot.kind().to_string(),
            ..tuning
        };
        let mut game = Game::new(tuning, seed, DrawList::new(), LogHost::new());

        let mut now = 0.0;
        game.frame(now);
        for _ in 0..episodes {
            game.trigger();
            let mut frames = 0u32;
            while !game.state().game_over {
                if frames < max_frames && autopilot.decide(game.state()).flap {
                    game.trigger();
                }
                now += HOST_FRAME_MS;
                game.frame(now);
                frames += 1;
            }
            info!(
                "Episode {} scored {} in {} frames",
                game.state().episode_id,
                game.state().score,
                frames
            );
        }

        let captured_at = chrono::Local::now().naive_local();
        let name = export_file_name(captured_at);
        let dir = out.join(name.trim_end_matches(".zip"));
        let mut archive = DirArchive::new(&dir);
        game.export(&mut archive, captured_at)
            .with_context(|| format!("exporting to {}", dir.display()))?;
        println!("{}", dir.display());
        Ok(())
    }

    fn replay(dir: &Path) -> Result<()> {
        let archive = DirArchive::new(dir);
        let mut game = Game::new(Tuning::default(), DEFAULT_SEED, DrawList::new(), LogHost::new());
        let report = game
            .import(&archive)
            .with_context(|| format!("importing {}", dir.display()))?;
        for warning in &report.warnings {
            warn!("{warning}");
        }

        let mut now = 0.0;
        let mut best_score = 0;
        // Host frames are slightly shorter than the gate interval
        let budget = report.frames.saturating_mul(2) + 10;
        for _ in 0..budget {
            game.frame(now);
            now += HOST_FRAME_MS;
            best_score = best_score.max(game.state().score);
            if game.replay().map(|r| r.phase()) == Some(ReplayPhase::Finished) {
                println!(
                    "replay {}: {} frames ({}), best score {}",
                    report.replay_id,
                    report.frames,
                    game.state().tuning.agent_type,
                    best_score
                );
                return Ok(());
            }
        }
        bail!("replay did not finish within {budget} host frames")
    }

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        match Args::parse().command {
            Command::Record {
                tuning,
                out,
                seed,
                episodes,
                max_frames,
            } => record(load_tuning(tuning.as_deref())?, &out, seed, episodes, max_frames),
            Command::Replay { dir } => replay(&dir),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web builds drive `Game` from the page's animation frame callback
}
