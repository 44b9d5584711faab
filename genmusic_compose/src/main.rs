// GenMusic composer CLI.
//
// Builds a seed buffer (from text via genmusic_prng, or raw hex), composes a
// score and prints it, either as a human summary or as JSON. Nothing is
// written to disk.
//
// Usage:
//   cargo run -p genmusic_compose --bin generate -- [--seed TEXT | --seed-hex HEX]
//     [--minor] [--config PATH] [--key NOTE] [--json] [--dump-config]
//
// Set RUST_LOG=debug to see seed cursors per stage, RUST_LOG=trace for
// per-slot groove decisions.

use anyhow::{Context, Result};
use clap::Parser;
use genmusic_compose::BAR_COUNT;
use genmusic_compose::config::ComposerConfig;
use genmusic_compose::mode::{Mode, NoteName, pitch_name};
use genmusic_compose::score::{Score, compose};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "generate")]
#[command(version, about = "Compose a deterministic chord/melody/groove score from a seed")]
struct Cli {
    /// Seed text; hashed into the seed buffer
    #[arg(long, default_value = "genmusic")]
    seed: String,

    /// Raw seed bytes as hex (overrides --seed)
    #[arg(long)]
    seed_hex: Option<String>,

    /// Compose in minor instead of major
    #[arg(long)]
    minor: bool,

    /// JSON config file replacing the built-in tables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Transpose the finished score so its tonic is this note (e.g. "eb")
    #[arg(long)]
    key: Option<NoteName>,

    /// Print the score as JSON
    #[arg(long)]
    json: bool,

    /// Print the default config as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.dump_config {
        println!("{}", ComposerConfig::default().to_json_pretty()?);
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => ComposerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ComposerConfig::default(),
    };

    let needed = config.seed_layout.total_len(config.grooves.len());
    let seed = match &cli.seed_hex {
        Some(text) => {
            let bytes = hex::decode(text.trim()).context("--seed-hex is not valid hex")?;
            if bytes.len() > needed {
                log::warn!("seed has {} bytes, only the first {needed} are used", bytes.len());
            }
            bytes
        }
        None => genmusic_prng::seed_bytes(needed, &cli.seed),
    };

    let mode = Mode::from_is_major(!cli.minor);
    let mut score = compose(&seed, mode, &config).context("composition failed")?;
    if let Some(name) = cli.key {
        score = score.in_key(name.pitch_class());
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&score)?);
    } else {
        print_summary(&score);
    }
    Ok(())
}

fn print_summary(score: &Score) {
    println!("Key: {} {}", pitch_name(score.key), score.mode);

    let roots: Vec<&str> = score.roots.iter().map(|&r| pitch_name(r)).collect();
    println!("Roots: {}", roots.join(" "));

    println!("Chords:");
    for (i, chord) in score.chords.iter().take(BAR_COUNT).enumerate() {
        println!(
            "  bar {}: {:<3} declared {:?}, classified {:?}",
            i + 1,
            pitch_name(chord.root().pitch),
            chord.quality(),
            chord.classified_quality()
        );
    }

    println!("Rhythm:");
    for (i, bar) in score.rhythm.iter().enumerate() {
        println!("  bar {}: {bar:?}", i + 1);
    }

    println!("Melody: {} notes", score.melody.len());
    println!("Chord track: {} notes", score.chord_notes().len());
    for groove in &score.grooves {
        println!("Groove {}: {} events", groove.name, groove.notes.len());
    }
    println!("Length: {} beats", score.total_beats());
}
