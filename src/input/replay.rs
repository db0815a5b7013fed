//! Event-script input source.
//!
//! Drives a [`Tracker`] from a line-oriented script, one command per line:
//!
//! ```text
//! # comments and blank lines are ignored
//! move 120 340
//! click 120 340 left press
//! click 120 340 left release
//! toggle move off
//! opacity 60
//! width 4
//! save
//! ```
//!
//! `save` stops the running session, writes the snapshot and starts a new
//! session, like pressing "stop" and then "start" in an interactive tracker.

use super::events::{MouseButton, PointerEvent};
use crate::output::SaveTarget;
use crate::track::{SessionError, Tracker};
use std::io::BufRead;
use std::path::PathBuf;
use thiserror::Error;

/// A recording channel that can be switched on and off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Moves,
    Clicks(MouseButton),
}

/// One parsed script line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptCommand {
    Pointer(PointerEvent),
    Toggle(Channel, bool),
    Opacity(u8),
    Width(u32),
    Save,
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("failed to read event script: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Session(#[from] SessionError),
}

fn parse_int<T: std::str::FromStr>(token: Option<&str>, what: &str) -> Result<T, String> {
    let token = token.ok_or_else(|| format!("missing {what}"))?;
    token
        .parse()
        .map_err(|_| format!("invalid {what} '{token}'"))
}

fn parse_switch(token: Option<&str>) -> Result<bool, String> {
    match token {
        Some("on") | Some("true") | Some("1") => Ok(true),
        Some("off") | Some("false") | Some("0") => Ok(false),
        Some(other) => Err(format!("expected on/off, got '{other}'")),
        None => Err("missing on/off".to_string()),
    }
}

/// Parses one script line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ScriptCommand>, String> {
    let line = line.split('#').next().unwrap_or("").trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut tokens = line.split_whitespace();
    let keyword = tokens.next().unwrap_or_default().to_ascii_lowercase();
    let command = match keyword.as_str() {
        "move" => ScriptCommand::Pointer(PointerEvent::Move {
            x: parse_int(tokens.next(), "x")?,
            y: parse_int(tokens.next(), "y")?,
        }),
        "click" => {
            let x = parse_int(tokens.next(), "x")?;
            let y = parse_int(tokens.next(), "y")?;
            let button = tokens
                .next()
                .ok_or_else(|| "missing button".to_string())?
                .parse::<MouseButton>()?;
            let pressed = match tokens.next() {
                Some("press") | Some("down") => true,
                Some("release") | Some("up") => false,
                Some(other) => return Err(format!("expected press/release, got '{other}'")),
                None => return Err("missing press/release".to_string()),
            };
            ScriptCommand::Pointer(PointerEvent::Click {
                x,
                y,
                button,
                pressed,
            })
        }
        "toggle" => {
            let channel = match tokens.next() {
                Some("move") | Some("moves") => Channel::Moves,
                Some(name) => Channel::Clicks(name.parse::<MouseButton>()?),
                None => return Err("missing channel".to_string()),
            };
            ScriptCommand::Toggle(channel, parse_switch(tokens.next())?)
        }
        "opacity" => ScriptCommand::Opacity(parse_int(tokens.next(), "opacity")?),
        "width" => ScriptCommand::Width(parse_int(tokens.next(), "width")?),
        "save" => ScriptCommand::Save,
        other => return Err(format!("unknown command '{other}'")),
    };

    if let Some(extra) = tokens.next() {
        return Err(format!("unexpected trailing token '{extra}'"));
    }
    Ok(Some(command))
}

/// Applies a single command to the tracker. Returns the saved path for `save`.
pub fn apply(
    command: ScriptCommand,
    tracker: &mut Tracker,
    target: &SaveTarget,
) -> Result<Option<PathBuf>, SessionError> {
    let settings = tracker.settings().clone();
    match command {
        ScriptCommand::Pointer(event) => tracker.handle(event),
        ScriptCommand::Toggle(Channel::Moves, on) => settings.set_move_enabled(on),
        ScriptCommand::Toggle(Channel::Clicks(button), on) => {
            settings.set_click_enabled(button, on)
        }
        ScriptCommand::Opacity(percent) => settings.set_opacity(percent),
        ScriptCommand::Width(width) => settings.set_width(width),
        ScriptCommand::Save => {
            let path = tracker.save(&target.directory, target.create_dir, target.clean)?;
            tracker.start()?;
            return Ok(Some(path));
        }
    }
    Ok(None)
}

/// Runs a whole script: starts a session, feeds every line, then stops and
/// saves once more at end of input.
///
/// Returns every snapshot path written, in order.
pub fn run<R: BufRead>(
    reader: R,
    tracker: &mut Tracker,
    target: &SaveTarget,
) -> Result<Vec<PathBuf>, ReplayError> {
    let mut saved = Vec::new();
    tracker.start()?;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let command = parse_line(&line).map_err(|message| ReplayError::Parse {
            line: index + 1,
            message,
        })?;
        if let Some(command) = command
            && let Some(path) = apply(command, tracker, target)?
        {
            saved.push(path);
        }
    }

    tracker.stop()?;
    saved.push(tracker.save(&target.directory, target.create_dir, target.clean)?);
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_command() {
        assert_eq!(
            parse_line("move -5 12"),
            Ok(Some(ScriptCommand::Pointer(PointerEvent::Move { x: -5, y: 12 })))
        );
        assert_eq!(
            parse_line("  click 1 2 Right release  # trailing comment"),
            Ok(Some(ScriptCommand::Pointer(PointerEvent::Click {
                x: 1,
                y: 2,
                button: MouseButton::Right,
                pressed: false,
            })))
        );
        assert_eq!(
            parse_line("toggle middle off"),
            Ok(Some(ScriptCommand::Toggle(
                Channel::Clicks(MouseButton::Middle),
                false
            )))
        );
        assert_eq!(
            parse_line("toggle move on"),
            Ok(Some(ScriptCommand::Toggle(Channel::Moves, true)))
        );
        assert_eq!(parse_line("opacity 55"), Ok(Some(ScriptCommand::Opacity(55))));
        assert_eq!(parse_line("width 3"), Ok(Some(ScriptCommand::Width(3))));
        assert_eq!(parse_line("save"), Ok(Some(ScriptCommand::Save)));
        assert_eq!(parse_line("# nothing"), Ok(None));
        assert_eq!(parse_line(""), Ok(None));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse_line("move 1").is_err());
        assert!(parse_line("move a b").is_err());
        assert!(parse_line("click 1 2 back press").is_err());
        assert!(parse_line("click 1 2 left maybe").is_err());
        assert!(parse_line("toggle left sideways").is_err());
        assert!(parse_line("jump 1 2").is_err());
        assert!(parse_line("save now").is_err());
        assert!(parse_line("opacity 300").is_err());
    }
}
