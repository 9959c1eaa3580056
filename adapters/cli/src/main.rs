#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Scale Boulders over stdin and stdout.

use std::{
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use clap::Parser;
use scale_boulders_controller::GameController;
use scale_boulders_core::{GameConfig, Input, PlayState, RenderFrame, WELCOME_BANNER};

/// Command-line arguments accepted by the adapter.
#[derive(Debug, Parser)]
#[command(
    name = "scale-boulders",
    about = "Identify the scales written on falling boulders before they land."
)]
struct CliArgs {
    /// TOML file overriding the default game configuration.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Seed for scale generation; defaults to the current time.
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
    /// Simulated milliseconds advanced by one `tick`.
    #[arg(long, value_name = "MS", default_value_t = 250)]
    frame_ms: u64,
}

/// One line of player input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Token {
    Input(Input),
    Tick(u32),
    Restart,
}

/// Entry point for the Scale Boulders command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GameConfig::default(),
    };
    let seed = args.seed.unwrap_or_else(seed_from_clock);
    log::info!("seed {seed}");

    let mut game = GameController::new(config, seed).context("invalid game configuration")?;
    let frame = Duration::from_millis(args.frame_ms);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{WELCOME_BANNER}")?;
    writeln!(
        out,
        "keys: left, right, pause, quit, restart, tick [N], or a guess key"
    )?;
    print_frame(&mut out, &game.render_frame())?;

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read input")?;
        let Some(token) = parse_token(&line) else {
            if !line.trim().is_empty() {
                log::warn!("ignoring unrecognised input {:?}", line.trim());
            }
            continue;
        };

        match token {
            Token::Input(input) => {
                if let Some(outcome) = game.handle_input(input) {
                    writeln!(out, "{outcome:?}")?;
                }
            }
            Token::Tick(count) => {
                for _ in 0..count {
                    game.tick(frame)?;
                }
            }
            Token::Restart => game.restart(),
        }
        let _ = game.drain_events();
        print_frame(&mut out, &game.render_frame())?;

        if game.play_state() == PlayState::Ended {
            break;
        }
    }

    writeln!(out, "final score: {}", game.score())?;
    Ok(())
}

fn load_config(path: &Path) -> Result<GameConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("failed to parse config {}", path.display()))
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

fn parse_token(line: &str) -> Option<Token> {
    let mut words = line.split_whitespace();
    let first = words.next()?;
    let token = match first {
        "left" => Token::Input(Input::SelectLeft),
        "right" => Token::Input(Input::SelectRight),
        "pause" => Token::Input(Input::TogglePause),
        "quit" => Token::Input(Input::Terminate),
        "restart" => Token::Restart,
        "tick" => match words.next() {
            Some(count) => Token::Tick(count.parse().ok()?),
            None => Token::Tick(1),
        },
        key => {
            let mut chars = key.chars();
            let guess = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            Token::Input(Input::Guess(guess))
        }
    };
    if words.next().is_some() {
        return None;
    }
    Some(token)
}

fn print_frame(out: &mut impl Write, frame: &RenderFrame) -> io::Result<()> {
    writeln!(out, "score {} ({:?})", frame.score, frame.play_state)?;
    if frame.paused {
        return writeln!(out, "  paused");
    }
    for boulder in &frame.boulders {
        let marker = if boulder.selected { '>' } else { ' ' };
        let notes: Vec<String> = boulder
            .note_sequence
            .iter()
            .map(ToString::to_string)
            .collect();
        writeln!(
            out,
            "{marker} slot {} at {:>5.1}: {:?}, key {:+}: {}",
            boulder.horizontal_slot,
            boulder.vertical_position,
            boulder.clef,
            boulder.key_signature.sharps_flats(),
            notes.join(" ")
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_guess_keys() {
        assert_eq!(parse_token("left"), Some(Token::Input(Input::SelectLeft)));
        assert_eq!(parse_token("  quit "), Some(Token::Input(Input::Terminate)));
        assert_eq!(parse_token("tick"), Some(Token::Tick(1)));
        assert_eq!(parse_token("tick 12"), Some(Token::Tick(12)));
        assert_eq!(parse_token("q"), Some(Token::Input(Input::Guess('q'))));
        assert_eq!(parse_token("restart"), Some(Token::Restart));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(parse_token(""), None);
        assert_eq!(parse_token("tick many"), None);
        assert_eq!(parse_token("left right"), None);
        assert_eq!(parse_token("guess"), None);
    }

    #[test]
    fn paused_frames_hide_boulders() {
        let frame = RenderFrame {
            boulders: Vec::new(),
            score: -20,
            paused: true,
            play_state: PlayState::Paused,
        };
        let mut buffer = Vec::new();
        print_frame(&mut buffer, &frame).expect("write to buffer");
        let text = String::from_utf8(buffer).expect("utf8");
        assert_eq!(text, "score -20 (Paused)\n  paused\n");
    }
}
