mod rehearsal;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use forcedeck_core::{
    decode_triplet, encode_card, memorized_deck, prepare_deck, stack_position, Card, Direction,
    Event, Preset, RngState, Trick, TrickConfig,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "forcedeck-cli", about = "Rehearse and inspect the card force")]
struct Cli {
    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the memorized stack in order.
    Deck,
    /// Build one sequence around a forced card.
    Prepare {
        #[arg(long)]
        force: Card,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "classic", value_parser = parse_preset)]
        preset: Preset,
    },
    /// Decode swipe directions (U, R, D, L) three at a time.
    Decode { swipes: String },
    /// Show the swipes that select a card.
    Encode { card: Card },
    /// Run the trick headless and print what happens, with virtual timestamps.
    Simulate {
        #[arg(long, default_value = "")]
        swipes: String,
        #[arg(long, default_value_t = 2)]
        runs: usize,
        #[arg(long, default_value = "classic", value_parser = parse_preset)]
        preset: Preset,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the resolved configuration for a preset.
    Config {
        #[arg(long, default_value = "classic", value_parser = parse_preset)]
        preset: Preset,
    },
    /// Open the terminal UI.
    Cui {
        #[arg(long, short = 'l', env = "FORCEDECK_LANG")]
        locale: Option<String>,
        #[arg(long, default_value = "classic", value_parser = parse_preset)]
        preset: Preset,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, env = "FORCEDECK_LOG_FILE")]
        log_file: Option<PathBuf>,
    },
}

fn parse_preset(value: &str) -> Result<Preset, String> {
    Preset::from_name(value).ok_or_else(|| format!("unknown preset {value:?}"))
}

#[derive(Debug, Serialize)]
struct DecodedTriplet {
    swipes: String,
    card: Option<Card>,
}

#[derive(Debug, Serialize)]
struct Decoded {
    triplets: Vec<DecodedTriplet>,
    /// Trailing swipes still waiting for a third.
    pending: String,
}

fn main() {
    let cli = Cli::parse();
    if let Command::Cui {
        locale,
        preset,
        seed,
        log_file,
    } = cli.command
    {
        let launch = forcedeck_cui::LaunchOptions {
            locale,
            preset,
            seed,
            log_file,
        };
        if let Err(err) = forcedeck_cui::run(launch) {
            eprintln!("cui launch error: {err:#}");
            std::process::exit(1);
        }
        return;
    }

    init_logging();
    if let Err(err) = execute(&cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("FORCEDECK_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn execute(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Deck => print_deck(cli.json),
        Command::Prepare {
            force,
            seed,
            preset,
        } => {
            let config = TrickConfig::preset(*preset);
            config.validate()?;
            let mut rng = seeded(*seed);
            let sequence = prepare_deck(*force, &config.layout, &mut rng);
            info!(seed = rng.seed(), force = %force, "prepared sequence");
            if cli.json {
                return print_json(&sequence);
            }
            for (index, card) in sequence.cards().iter().enumerate() {
                let marker = if index == sequence.force_index() {
                    "  <- force"
                } else {
                    ""
                };
                println!("{:>2}. {}{marker}", index + 1, card.pretty());
            }
            println!("seed {}", rng.seed());
            Ok(())
        }
        Command::Decode { swipes } => {
            let decoded = decode_swipes(swipes)?;
            if cli.json {
                return print_json(&decoded);
            }
            for triplet in &decoded.triplets {
                match triplet.card {
                    Some(card) => println!("{} -> {}", triplet.swipes, card.label()),
                    None => println!("{} -> no card", triplet.swipes),
                }
            }
            if !decoded.pending.is_empty() {
                println!("{} -> waiting", decoded.pending);
            }
            Ok(())
        }
        Command::Encode { card } => {
            let swipes = directions_text(&encode_card(*card));
            if cli.json {
                return print_json(&DecodedTriplet {
                    swipes,
                    card: Some(*card),
                });
            }
            println!("{} -> {swipes}", card.label());
            Ok(())
        }
        Command::Simulate {
            swipes,
            runs,
            preset,
            seed,
        } => {
            let directions = Direction::parse_sequence(swipes)
                .map_err(|err| anyhow!("bad swipes {swipes:?}: {err}"))?;
            let mut trick = Trick::staged(TrickConfig::preset(*preset), seeded(*seed))
                .context("build trick")?;
            let result = rehearsal::rehearse(&mut trick, &directions, *runs);
            info!(seed = trick.seed(), events = result.timeline.len(), "rehearsal done");
            if cli.json {
                return print_json(&result);
            }
            for timed in &result.timeline {
                println!("{:>6}ms  {}", timed.at_ms, describe(&timed.event));
            }
            println!("seed {}", trick.seed());
            Ok(())
        }
        Command::Config { preset } => {
            let config = TrickConfig::preset(*preset);
            config.validate()?;
            print_json(&config)
        }
        Command::Cui { .. } => bail!("terminal UI is launched before logging starts"),
    }
}

fn seeded(seed: Option<u64>) -> RngState {
    seed.map(RngState::from_seed)
        .unwrap_or_else(RngState::from_entropy)
}

fn print_deck(json: bool) -> Result<()> {
    let deck = memorized_deck();
    if json {
        let codes: Vec<String> = deck.iter().map(Card::code).collect();
        return print_json(&codes);
    }
    for card in deck {
        println!("{:>2}. {}", stack_position(*card), card.pretty());
    }
    Ok(())
}

fn decode_swipes(input: &str) -> Result<Decoded> {
    let directions =
        Direction::parse_sequence(input).map_err(|err| anyhow!("bad swipes {input:?}: {err}"))?;
    if directions.is_empty() {
        bail!("no swipes given");
    }
    let chunks = directions.chunks_exact(3);
    let pending = directions_text(chunks.remainder());
    let triplets = chunks
        .map(|chunk| {
            let triplet = [chunk[0], chunk[1], chunk[2]];
            DecodedTriplet {
                swipes: directions_text(&triplet),
                card: decode_triplet(triplet),
            }
        })
        .collect();
    Ok(Decoded { triplets, pending })
}

fn directions_text(directions: &[Direction]) -> String {
    directions.iter().map(|direction| direction.code()).collect()
}

fn describe(event: &Event) -> String {
    match event {
        Event::RunStarted {
            run,
            force,
            forced,
            length,
            force_index,
        } => {
            let source = if *forced { "forced" } else { "random" };
            format!(
                "run {run} started: {length} cards, {source} {} at #{}",
                force.label(),
                force_index + 1
            )
        }
        Event::CardShown { index, card } => format!("show #{} {}", index + 1, card.pretty()),
        Event::SequenceExhausted { run } => format!("run {run} finished"),
        Event::RetryOffered => "retry offered".to_string(),
        Event::RetryTaken => "retry taken".to_string(),
        Event::SwipeBuffered { len } => format!("swipe {len}/3"),
        Event::ForceArmed { card, runs } => format!("armed {} for {runs} runs", card.label()),
        Event::SwipeRejected { directions } => {
            format!("no card for {}", directions_text(directions))
        }
        Event::InputIgnored { input, reason } => format!("ignored {input:?} ({reason:?})"),
        Event::Reset => "reset".to_string(),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_groups_of_three() {
        let decoded = decode_swipes("UUR, DDU, DUU").expect("decode");
        let triplets = &decoded.triplets;
        assert_eq!(triplets.len(), 3);
        assert_eq!(triplets[0].card.map(|card| card.code()), Some("qh".to_string()));
        assert_eq!(triplets[1].card.map(|card| card.code()), Some("6s".to_string()));
        assert_eq!(triplets[2].card, None);
        assert_eq!(triplets[2].swipes, "DUU");
        assert!(decoded.pending.is_empty());
    }

    #[test]
    fn keeps_trailing_swipes_pending() {
        let decoded = decode_swipes("URUL").expect("decode");
        assert_eq!(decoded.triplets.len(), 1);
        assert_eq!(
            decoded.triplets[0].card.map(|card| card.code()),
            Some("as".to_string())
        );
        assert_eq!(decoded.pending, "L");
    }

    #[test]
    fn rejects_bad_input() {
        assert!(decode_swipes("").is_err());
        assert!(decode_swipes("UXR").is_err());
    }

    #[test]
    fn parses_subcommands() {
        let cli = Cli::try_parse_from(["forcedeck-cli", "prepare", "--force", "qh", "--seed", "9"])
            .expect("parse");
        match cli.command {
            Command::Prepare { force, seed, preset } => {
                assert_eq!(force.code(), "qh");
                assert_eq!(seed, Some(9));
                assert_eq!(preset, Preset::Classic);
            }
            other => panic!("unexpected command {other:?}"),
        }
        let cli = Cli::try_parse_from([
            "forcedeck-cli",
            "--json",
            "simulate",
            "--swipes",
            "URL",
            "--preset",
            "dramatic",
        ])
        .expect("parse");
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Command::Simulate {
                runs: 2,
                preset: Preset::Dramatic,
                ..
            }
        ));
    }

    #[test]
    fn describes_forced_start() {
        let event = Event::RunStarted {
            run: 1,
            force: "qh".parse().expect("card"),
            forced: true,
            length: 25,
            force_index: 17,
        };
        assert_eq!(describe(&event), "run 1 started: 25 cards, forced QH at #18");
    }
}
