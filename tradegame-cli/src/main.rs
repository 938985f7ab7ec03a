//! TradeGame CLI — play, benchmark, and JSON-lines commands.
//!
//! Commands:
//! - `play` — interactive game on stdin: pick long/short/neutral each turn
//! - `benchmark` — buy-and-hold return for one instrument or all of them
//! - `serve-jsonl` — one JSON request per stdin line, one JSON response per stdout line

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tradegame_core::domain::{Bar, Position, SessionId};
use tradegame_core::{format_pnl, PnlTone, Scorecard};
use tradegame_runner::{handle_json, GameConfig, GameService};

#[derive(Parser)]
#[command(
    name = "tradegame",
    about = "TradeGame CLI — trade a hidden price series one bar at a time"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that builds a game service.
#[derive(Args, Clone)]
struct DataArgs {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory of per-instrument CSV files. Overrides the config file.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Fall back to synthetic bars when no real data is available.
    #[arg(long, default_value_t = false)]
    synthetic: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game interactively.
    Play {
        /// Instrument to play (falls back to a random one if unknown).
        #[arg(long)]
        instrument: Option<String>,

        #[command(flatten)]
        data: DataArgs,
    },
    /// Print the buy-and-hold benchmark over the scored turns.
    Benchmark {
        /// Instrument to benchmark.
        #[arg(long, conflicts_with = "all")]
        instrument: Option<String>,

        /// Benchmark every available instrument.
        #[arg(long, default_value_t = false)]
        all: bool,

        #[command(flatten)]
        data: DataArgs,
    },
    /// Serve JSON-lines requests on stdin/stdout.
    ServeJsonl {
        #[command(flatten)]
        data: DataArgs,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play { instrument, data } => run_play(&build_service(&data)?, instrument),
        Commands::Benchmark {
            instrument,
            all,
            data,
        } => run_benchmark(&build_service(&data)?, instrument, all),
        Commands::ServeJsonl { data } => run_serve_jsonl(&build_service(&data)?),
    }
}

/// Used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "tradegame_runner=info,tradegame_cli=info";

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(io::stderr)
        .init();
}

fn build_service(args: &DataArgs) -> Result<GameService> {
    let mut config = match &args.config {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    };
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    if args.synthetic {
        config.synthetic_fallback = true;
    }
    Ok(GameService::from_config(&config)?)
}

fn run_play(service: &GameService, instrument: Option<String>) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let rules = *service.rules();

    let started = service
        .start_session(instrument.as_deref())
        .context("could not start a game")?;
    let mut session_id: SessionId = started.session_id;
    let mut instrument_id = started.instrument_id;
    let mut window = started.initial_window;
    let mut substituted = started.substituted;

    loop {
        if substituted {
            println!("Requested instrument unavailable; playing {instrument_id}.");
        }
        let mut card = Scorecard::new();
        let mut turn = rules.first_scored_turn() as i64;

        loop {
            print_window(turn, &window);
            let Some(position) = prompt_position(&mut lines)? else {
                println!("Bye.");
                return Ok(());
            };

            let outcome = service.submit_turn(&session_id, position, turn)?;
            card.record(turn as usize, position, outcome.pnl);
            println!(
                "Turn {turn}: {position} → {} {}  (total {})",
                format_pnl(outcome.pnl),
                tone_marker(PnlTone::of(outcome.pnl)),
                format_pnl(card.total())
            );

            // The closing bar is scored after `finished`.
            if turn as usize >= rules.last_scored_turn() {
                break;
            }
            match outcome.next_window {
                Some(next) => window = next,
                None => break,
            }
            if outcome.finished {
                println!("Final bar.");
            }
            turn += 1;
        }

        let benchmark = service.session_buy_hold_pnl(&session_id).ok();
        let tone = PnlTone::of(benchmark.map_or(card.total(), |bh| card.edge(bh)));
        println!(
            "\nGame over. {} {}",
            card.summary(&instrument_id, benchmark),
            tone_marker(tone)
        );

        print!("Play again? [y/N] ");
        io::stdout().flush()?;
        let again = lines.next().transpose()?.unwrap_or_default();
        if !again.trim().eq_ignore_ascii_case("y") {
            return Ok(());
        }

        let restarted = service.restart(Some(&session_id), instrument.as_deref())?;
        session_id = restarted.session_id;
        instrument_id = restarted.instrument_id;
        window = service.get_window(&session_id, None)?.window;
        substituted = restarted.substituted;
    }
}

fn prompt_position(
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<Option<Position>> {
    loop {
        print!("Position [l]ong / [s]hort / [n]eutral, [q]uit: ");
        io::stdout().flush()?;
        let Some(line) = lines.next().transpose()? else {
            return Ok(None);
        };
        let position = match line.trim().to_ascii_lowercase().as_str() {
            "l" | "long" => Position::Long,
            "s" | "short" => Position::Short,
            "n" | "neutral" => Position::Neutral,
            "q" | "quit" => return Ok(None),
            other => {
                println!("Unknown choice '{other}'.");
                continue;
            }
        };
        return Ok(Some(position));
    }
}

fn tone_marker(tone: PnlTone) -> &'static str {
    match tone {
        PnlTone::Positive => "▲",
        PnlTone::Negative => "▼",
        PnlTone::Flat => "·",
    }
}

fn print_window(turn: i64, window: &[Bar]) {
    println!("\n── Turn {turn} ──");
    println!("{:<12} {:>10} {:>10} {:>10} {:>10}", "date", "open", "high", "low", "close");
    for bar in window {
        println!(
            "{:<12} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
            bar.date, bar.open, bar.high, bar.low, bar.close
        );
    }
}

fn run_benchmark(service: &GameService, instrument: Option<String>, all: bool) -> Result<()> {
    if all {
        let rows = service.buy_hold_all()?;
        if rows.is_empty() {
            bail!("no instruments available");
        }
        for row in rows {
            match (row.pnl, row.error) {
                (Some(pnl), _) => println!("{:<12} {:>10}", row.instrument_id, format_pnl(pnl)),
                (None, Some(err)) => println!("{:<12} {:>10}  {err}", row.instrument_id, "n/a"),
                (None, None) => println!("{:<12} {:>10}", row.instrument_id, "n/a"),
            }
        }
        return Ok(());
    }

    let Some(instrument) = instrument else {
        bail!("one of --instrument or --all is required");
    };
    let pnl = service.buy_hold_pnl(&instrument)?;
    println!("{}", serde_json::json!({ "instrument_id": instrument, "pnl": pnl }));
    Ok(())
}

fn run_serve_jsonl(service: &GameService) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    tracing::info!(rules = ?service.rules(), "serving JSON-lines requests on stdin");

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_json(service, &line);
        serde_json::to_writer(&mut out, &response)?;
        writeln!(out)?;
        out.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn default_log_filter_parses() {
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }

    #[test]
    fn tone_markers_are_distinct() {
        assert_ne!(tone_marker(PnlTone::Positive), tone_marker(PnlTone::Negative));
        assert_ne!(tone_marker(PnlTone::Flat), tone_marker(PnlTone::Positive));
    }
}
