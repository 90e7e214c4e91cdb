use crate::harness_configuration::{ColorChoice, HarnessConfig};
use colored::{Color, Colorize};
use std::cell::RefCell;
use std::io::{stdout, Stdout, Write};
use std::rc::Rc;

/// Receives the results of a run and turns them into output.
pub trait Reporter {
    fn notify_test_start(&mut self, description: &str);

    fn notify_test_end(&mut self, passed: usize, total: usize, success: bool);

    fn notify_assertion_result(
        &mut self,
        message: &str,
        success: bool,
        location: Option<&str>,
        is_raised_error: bool,
    );

    fn notify_summary(&mut self, total: usize, passed: usize, failed: usize);
}

/// Human-readable report on a terminal (or any other writer).
pub struct ConsoleReporter<W: Write = Stdout> {
    out: W,
    color: bool,
    quiet: bool,
}

impl ConsoleReporter<Stdout> {
    pub fn stdout(config: &HarnessConfig) -> Self {
        Self::new(stdout(), config)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, config: &HarnessConfig) -> Self {
        // The override is process-wide; every reporter sets it to its own choice
        let color = match config.color {
            ColorChoice::Never => false,
            ColorChoice::Always => {
                colored::control::set_override(true);
                true
            }
            ColorChoice::Auto => {
                colored::control::unset_override();
                true
            }
        };

        Self {
            out,
            color,
            quiet: config.quiet,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    // Write errors are logged and otherwise ignored
    fn emit(&mut self, line: &str) {
        if writeln!(self.out, "{line}").is_err() {
            tracing::warn!("failed to write report line");
        }
    }
}

fn result_color(success: bool) -> Color {
    if success {
        Color::Green
    } else {
        Color::Red
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn notify_test_start(&mut self, description: &str) {
        self.emit(&format!("🧪 {description}"));
    }

    fn notify_test_end(&mut self, passed: usize, total: usize, success: bool) {
        let glyph = if success { "🎯" } else { "🚫" };
        let counts = format!("(assertions: {passed} passed / {total} total)");
        let line = format!("{glyph} {}", self.paint(&counts, result_color(success)));
        self.emit(&line);
        self.emit("");
    }

    fn notify_assertion_result(
        &mut self,
        message: &str,
        success: bool,
        location: Option<&str>,
        is_raised_error: bool,
    ) {
        if success && self.quiet {
            return;
        }

        let glyph = match (is_raised_error, success) {
            (true, _) => "⚠️",
            (false, true) => "✔",
            (false, false) => "✘",
        };
        let glyph = self.paint(glyph, result_color(success));
        let message = if is_raised_error {
            self.paint(message, result_color(success))
        } else {
            message.to_string()
        };
        let location = location
            .map(|location| format!(" (in {location})"))
            .unwrap_or_default();

        self.emit(&format!("   {glyph} {message}{location}"));
    }

    fn notify_summary(&mut self, total: usize, passed: usize, failed: usize) {
        let label = if total == 1 { "test" } else { "tests" };
        let result = format!("{total} {label} ({passed} passed, {failed} failed)");
        let line = format!("📃 {}", self.paint(&result, result_color(failed == 0)));
        self.emit(&line);
        let _ = self.out.flush();
    }
}

/// One notification received by an [`EventLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    TestStart(String),
    TestEnd {
        passed: usize,
        total: usize,
        success: bool,
    },
    Assertion {
        message: String,
        success: bool,
        location: Option<String>,
        is_raised_error: bool,
    },
    Summary {
        total: usize,
        passed: usize,
        failed: usize,
    },
}

/// Records notifications instead of printing them.
///
/// Clones share the same buffer, so one clone can be handed to the runner
/// while another is kept to inspect the events afterwards.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<Event>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    #[must_use]
    pub fn assertions(&self) -> Vec<Event> {
        self.events
            .borrow()
            .iter()
            .filter(|event| matches!(event, Event::Assertion { .. }))
            .cloned()
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

impl Reporter for EventLog {
    fn notify_test_start(&mut self, description: &str) {
        self.push(Event::TestStart(description.to_string()));
    }

    fn notify_test_end(&mut self, passed: usize, total: usize, success: bool) {
        self.push(Event::TestEnd {
            passed,
            total,
            success,
        });
    }

    fn notify_assertion_result(
        &mut self,
        message: &str,
        success: bool,
        location: Option<&str>,
        is_raised_error: bool,
    ) {
        self.push(Event::Assertion {
            message: message.to_string(),
            success,
            location: location.map(str::to_string),
            is_raised_error,
        });
    }

    fn notify_summary(&mut self, total: usize, passed: usize, failed: usize) {
        self.push(Event::Summary {
            total,
            passed,
            failed,
        });
    }
}
