use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use sched_sim::{
    config::SimConfig, playback, render, sim::workload, simulate, Algorithm, SimulationResult,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::{info, warn};

const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preset {
    /// Four processes with mixed arrivals, bursts and priorities
    Classic,
    /// Seeded Bernoulli arrivals of short and long jobs
    Random,
}

/// Step through classic CPU scheduling algorithms tick by tick.
#[derive(Parser, Debug)]
#[command(name = "sched-sim", about = "Discrete-event CPU scheduling simulator")]
struct Args {
    /// Workload file (.toml or .json)
    #[arg(long, short, env = "SCHED_SIM_CONFIG")]
    config: Option<PathBuf>,

    /// Built-in process list, used when the workload file has none
    #[arg(long, value_enum)]
    preset: Option<Preset>,

    /// fcfs, sjf, priority or rr (overrides the workload file)
    #[arg(long, short)]
    algorithm: Option<Algorithm>,

    /// Round-Robin time slice (overrides the workload file)
    #[arg(long, short)]
    quantum: Option<u64>,

    /// Replay frames on a timer instead of printing them at once
    #[arg(long)]
    play: bool,

    /// Delay between replayed frames in milliseconds
    #[arg(long)]
    speed_ms: Option<u64>,

    /// Seed for the random preset
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Print the whole result as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("failed to load workload {}", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(algorithm) = args.algorithm {
        config.algorithm = algorithm;
    }
    if let Some(quantum) = args.quantum {
        config.quantum = quantum.max(1);
    }
    if let Some(speed_ms) = args.speed_ms {
        config.playback.interval_ms = speed_ms;
    }
    if config.processes.is_empty() {
        config.processes = match args.preset {
            Some(Preset::Random) => workload::bernoulli(40, 0.3, 0.3, 2, 6, args.seed),
            Some(Preset::Classic) | None => workload::classic(),
        };
    }
    workload::validate(&config.processes).context("invalid workload")?;

    let label = config.algorithm.label(config.quantum);
    info!(algorithm = %label, processes = config.processes.len(), "simulating");
    let result = simulate(&config.processes, config.algorithm, config.quantum);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{label}");
    if args.play {
        replay(&result, config.playback.interval(), config.playback.autoplay).await?;
    } else {
        for frame in &result.ticks {
            println!("{:<32} {}", render::log_line(frame), render::machine_state(frame));
        }
    }

    println!();
    println!("{}", render::gantt(&result.timeline));
    println!();
    print!("{}", render::stats_table(&result));
    Ok(())
}

/// Replays frames on a timer. Without autoplay, playback starts paused and
/// stdin lines control it: empty or `s` steps, `p` pauses, `r` resumes, `+`
/// and `-` double or halve the speed, `q` stops. End of input resumes.
async fn replay(result: &SimulationResult, interval: Duration, autoplay: bool) -> Result<()> {
    let frames: Arc<[_]> = result.ticks.clone().into();
    let (tx, mut rx) = mpsc::channel(16);
    let handle = playback::spawn(frames, interval, autoplay, tx);
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = !autoplay;
    let mut interval = interval;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            frame = rx.recv() => match frame {
                Some(frame) => {
                    println!("{:<32} {}", render::log_line(&frame), render::machine_state(&frame));
                }
                None => break,
            },
            line = input.next_line(), if input_open => match line.context("failed to read stdin")? {
                Some(line) => match line.trim() {
                    "" | "s" => handle.step(),
                    "p" => handle.pause(),
                    "r" => handle.resume(),
                    "+" => {
                        interval = (interval / 2).max(MIN_INTERVAL);
                        handle.set_interval(interval);
                    }
                    "-" => {
                        interval = interval.saturating_mul(2);
                        handle.set_interval(interval);
                    }
                    "q" => handle.stop(),
                    other => warn!(command = other, "unknown playback command"),
                },
                None => {
                    input_open = false;
                    handle.resume();
                }
            },
            _ = &mut ctrl_c => {
                handle.stop();
                break;
            }
        }
    }

    drop(rx);
    let delivered = handle.join().await.context("playback task failed")?;
    info!(delivered, total = result.ticks.len(), "playback finished");
    Ok(())
}
