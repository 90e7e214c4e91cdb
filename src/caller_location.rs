// Resolution of the source location reported next to a failed assertion

use regex::Regex;
use serde::Deserialize;
use std::backtrace::Backtrace;
use std::panic::Location;
use std::sync::OnceLock;

pub const UNKNOWN_LOCATION: &str = "unknown:0";

/// How a failed assertion finds the location it reports.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LocationStrategy {
    /// The `#[track_caller]` call site of the assertion.
    #[default]
    CallSite,
    /// Walk a captured backtrace up to the running test body.
    Backtrace,
}

impl LocationStrategy {
    pub fn locate(self, call_site: &Location<'_>) -> String {
        match self {
            LocationStrategy::CallSite => format_call_site(call_site),
            LocationStrategy::Backtrace => resolve_caller_location(&capture_frames()),
        }
    }
}

pub fn format_call_site(location: &Location<'_>) -> String {
    format!("{}:{}", location.file(), location.line())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub function: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl Frame {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            file: None,
            line: None,
        }
    }

    #[must_use]
    pub fn at(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }
}

fn symbol_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(?:\d+:\s+)?(\S.*?)\s*$").unwrap())
}

fn location_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*at\s+(.+?):(\d+)(?::\d+)?\s*$").unwrap())
}

// Symbol of the routine that invokes test bodies, with optional generics and hash suffix
fn test_routine_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|::)Runner::test(?:::<.*>)?(?:::h[0-9a-f]{16})?$").unwrap())
}

/// Parses the textual rendering of a [`Backtrace`], innermost frame first.
pub fn parse_backtrace(text: &str) -> Vec<Frame> {
    let mut frames: Vec<Frame> = vec![];

    for line in text.lines() {
        if let Some(captures) = location_regex().captures(line) {
            if let Some(frame) = frames.last_mut() {
                // std prints workspace-relative paths as `./path`, `file!()` as `path`
                let file = &captures[1];
                frame.file = Some(file.strip_prefix("./").unwrap_or(file).to_string());
                frame.line = captures[2].parse().ok();
            }
        } else if let Some(captures) = symbol_regex().captures(line) {
            frames.push(Frame::new(&captures[1]));
        }
    }

    frames
}

pub fn capture_frames() -> Vec<Frame> {
    parse_backtrace(&Backtrace::force_capture().to_string())
}

/// Finds the frame of the test-execution routine and returns the location of
/// the frame just inside it, which is the test body that was running.
pub fn resolve_caller_location(frames: &[Frame]) -> String {
    let boundary = frames
        .iter()
        .position(|frame| test_routine_regex().is_match(&frame.function));

    match boundary.and_then(|index| index.checked_sub(1)).map(|index| &frames[index]) {
        Some(Frame {
            file: Some(file),
            line: Some(line),
            ..
        }) => format!("{file}:{line}"),
        _ => UNKNOWN_LOCATION.to_string(),
    }
}
