//! Headless event scripts.
//!
//! A script replays operator input against an [`AnnotationSession`], one
//! event per line:
//!
//! ```text
//! # draw a box and label it with class 0
//! down 10 10
//! move 30 25
//! up 50 40
//! key 0
//! key s
//! ```
//!
//! `down`/`up` use the primary button, `rdown`/`rup` the secondary one,
//! `key` takes a single character, `space` or `esc`, and `tick` runs one
//! loop pass with no input. The session ticks once after every line.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use log::debug;
use serde::Serialize;

use crate::error::RegionlabError;
use crate::geom::Point;
use crate::input::{Key, PointerButton, PointerEvent};
use crate::session::{AnnotationSession, Flow, SessionSummary};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Pointer(PointerEvent),
    Key(Key),
    Tick,
}

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Exit,
    EndOfStream,
    EndOfScript,
}

#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub events_processed: usize,
    pub stopped_by: StopReason,
    pub session: SessionSummary,
}

/// Reads a script file, or standard input when `path` is `-`.
pub fn read_script(path: &Path) -> Result<Vec<InputEvent>, RegionlabError> {
    let content = if path == Path::new("-") {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;
        content
    } else {
        fs::read_to_string(path)?
    };
    parse_script(&content)
}

pub fn parse_script(content: &str) -> Result<Vec<InputEvent>, RegionlabError> {
    let mut events = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if let Some(event) = parse_line(line, idx + 1)? {
            events.push(event);
        }
    }
    Ok(events)
}

/// Parses one script line; `None` for blank lines and comments.
pub fn parse_line(line: &str, line_num: usize) -> Result<Option<InputEvent>, RegionlabError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let err = |message: String| RegionlabError::EventScriptParse {
        line: line_num,
        message,
    };

    let mut tokens = trimmed.split_whitespace();
    let verb = tokens.next().unwrap_or_default();
    let args: Vec<&str> = tokens.collect();

    let event = match verb {
        "tick" => {
            expect_args(&args, 0).map_err(err)?;
            InputEvent::Tick
        }
        "key" => {
            expect_args(&args, 1).map_err(err)?;
            InputEvent::Key(parse_key(args[0]).map_err(err)?)
        }
        "down" | "up" | "rdown" | "rup" | "move" => {
            expect_args(&args, 2).map_err(err)?;
            let point = parse_point(args[0], args[1]).map_err(err)?;
            InputEvent::Pointer(match verb {
                "down" => PointerEvent::Down(PointerButton::Primary, point),
                "up" => PointerEvent::Up(PointerButton::Primary, point),
                "rdown" => PointerEvent::Down(PointerButton::Secondary, point),
                "rup" => PointerEvent::Up(PointerButton::Secondary, point),
                _ => PointerEvent::Move(point),
            })
        }
        other => return Err(err(format!("unknown event '{}'", other))),
    };

    Ok(Some(event))
}

fn expect_args(args: &[&str], expected: usize) -> Result<(), String> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(format!(
            "expected {} argument(s), found {}",
            expected,
            args.len()
        ))
    }
}

fn parse_key(token: &str) -> Result<Key, String> {
    match token {
        "space" => return Ok(Key::Char(' ')),
        "esc" => return Ok(Key::Escape),
        _ => {}
    }

    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Key::Char(c)),
        _ => Err(format!(
            "invalid key '{}' (expected one character, 'space' or 'esc')",
            token
        )),
    }
}

fn parse_point(x: &str, y: &str) -> Result<Point, String> {
    let parse = |value: &str| {
        value
            .parse::<i32>()
            .map_err(|_| format!("invalid coordinate '{}'", value))
    };
    Ok(Point::new(parse(x)?, parse(y)?))
}

/// Feeds `events` to the session until one of them ends it.
pub fn run_events(
    session: &mut AnnotationSession,
    events: &[InputEvent],
) -> Result<RunReport, RegionlabError> {
    let mut processed = 0;

    for event in events {
        processed += 1;
        debug!("event {}: {:?}", processed, event);

        let flow = match *event {
            InputEvent::Pointer(pointer) => {
                session.handle_pointer(pointer);
                Flow::Continue
            }
            InputEvent::Key(key) => session.handle_key(key)?,
            InputEvent::Tick => Flow::Continue,
        };
        let flow = if flow.is_continue() {
            session.tick()?
        } else {
            flow
        };

        if let Some(reason) = stop_reason(flow) {
            return Ok(report(session, processed, reason));
        }
    }

    Ok(report(session, processed, StopReason::EndOfScript))
}

/// Ticks the session until it stops on its own (capture end of stream).
///
/// Review sessions never stop by themselves, so they return immediately.
pub fn run_to_end(session: &mut AnnotationSession) -> Result<RunReport, RegionlabError> {
    if session.capture_session().is_none() {
        return Ok(report(session, 0, StopReason::EndOfScript));
    }

    let mut ticks = 0;
    loop {
        ticks += 1;
        if let Some(reason) = stop_reason(session.tick()?) {
            return Ok(report(session, ticks, reason));
        }
    }
}

fn stop_reason(flow: Flow) -> Option<StopReason> {
    match flow {
        Flow::Continue => None,
        Flow::Exit => Some(StopReason::Exit),
        Flow::EndOfStream => Some(StopReason::EndOfStream),
    }
}

fn report(session: &AnnotationSession, events_processed: usize, stopped_by: StopReason) -> RunReport {
    RunReport {
        events_processed,
        stopped_by,
        session: session.summary(),
    }
}
