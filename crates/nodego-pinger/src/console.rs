//! Human-readable rendering of scheduler progress on stdout.

use std::io::{IsTerminal, Write};
use std::sync::Mutex;

use chrono::{DateTime, Local};

use ngp_core::{ApiError, TaskStatus};
use ngp_scheduler::{Phase, ProgressEvent, Reporter};

const RULE: &str = "==================================================";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Heading,
    Success,
    Warning,
    Error,
}

impl Tone {
    fn ansi(self) -> Option<&'static str> {
        match self {
            Self::Plain => None,
            Self::Heading => Some("\x1b[36m"),
            Self::Success => Some("\x1b[32m"),
            Self::Warning => Some("\x1b[33m"),
            Self::Error => Some("\x1b[31m"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub tone: Tone,
    pub text: String,
}

impl Line {
    fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }
}

/// Server-side failures (>= 500) are errors; client-side rejections are warnings.
fn failure_tone(result_code: u16) -> Tone {
    if result_code >= 500 {
        Tone::Error
    } else {
        Tone::Warning
    }
}

fn status_lines(tone: Tone, result_code: u16, message: &str) -> [Line; 2] {
    [
        Line::new(tone, format!("  Status: {result_code}")),
        Line::new(tone, format!("  Message: {message}")),
    ]
}

fn error_lines(error: &ApiError) -> [Line; 2] {
    status_lines(
        failure_tone(error.result_code()),
        error.result_code(),
        &error.message(),
    )
}

/// Render one event. `now` stamps cycle headers.
pub fn render(event: &ProgressEvent, now: DateTime<Local>) -> Vec<Line> {
    let mut lines = Vec::new();
    match event {
        ProgressEvent::OnboardingPhaseStarted { accounts } => {
            lines.push(Line::new(
                Tone::Heading,
                format!("Performing initial setup and tasks for {accounts} account(s)..."),
            ));
        }
        ProgressEvent::OnboardingStarted {
            username, email, ..
        } => {
            lines.push(Line::new(Tone::Plain, RULE));
            lines.push(Line::new(
                Tone::Heading,
                format!("Initial setup for account: {username} ({email})"),
            ));
            lines.push(Line::new(Tone::Plain, RULE));
        }
        ProgressEvent::CheckIn { result, .. } => {
            lines.push(Line::new(Tone::Plain, "Daily Check-in:"));
            match result {
                Ok(reply) => {
                    lines.extend(status_lines(Tone::Success, reply.result_code, &reply.message))
                }
                Err(e) => lines.extend(error_lines(e)),
            }
        }
        ProgressEvent::TasksStarted { .. } => {
            lines.push(Line::new(Tone::Plain, "Processing initial tasks..."));
        }
        ProgressEvent::TaskSettled { outcome, .. } => {
            let name = format!("Task {} ({})", outcome.code, outcome.display_name);
            match outcome.status {
                TaskStatus::Skipped => {
                    lines.push(Line::new(Tone::Success, format!("{name}: Already completed")));
                }
                TaskStatus::Succeeded => {
                    lines.push(Line::new(Tone::Success, format!("{name}:")));
                    lines.extend(status_lines(
                        Tone::Success,
                        outcome.result_code,
                        &outcome.message,
                    ));
                }
                TaskStatus::Failed => {
                    let tone = failure_tone(outcome.result_code);
                    lines.push(Line::new(tone, format!("{name}:")));
                    lines.extend(status_lines(tone, outcome.result_code, &outcome.message));
                }
            }
        }
        ProgressEvent::OnboardingFinished { .. } => {
            lines.push(Line::new(Tone::Success, "Initial tasks completed"));
            lines.push(Line::new(Tone::Plain, RULE));
        }
        ProgressEvent::PingPhaseStarted => {
            lines.push(Line::new(Tone::Heading, "Starting regular ping cycle..."));
        }
        ProgressEvent::CycleStarted { cycle } => {
            lines.push(Line::new(
                Tone::Heading,
                format!("Ping Cycle #{cycle} at {}", now.format("%Y-%m-%d %H:%M:%S")),
            ));
        }
        ProgressEvent::PingStarted { username, .. } => {
            lines.push(Line::new(Tone::Plain, RULE));
            lines.push(Line::new(
                Tone::Heading,
                format!("Pinging for account: {username}"),
            ));
        }
        ProgressEvent::Pinged { reply, .. } => {
            lines.push(Line::new(Tone::Plain, "Ping Status:"));
            lines.extend(status_lines(Tone::Success, reply.result_code, &reply.message));
        }
        ProgressEvent::NodeStatus { nodes, .. } => {
            lines.push(Line::new(Tone::Plain, "Nodes Status:"));
            for (i, node) in nodes.iter().enumerate() {
                lines.push(Line::new(
                    Tone::Plain,
                    format!("  Node {}: {} points today", i + 1, node.today_points),
                ));
            }
        }
        ProgressEvent::AccountFailed {
            account,
            phase,
            error,
        } => {
            let what = match phase {
                Phase::Onboarding => "processing initial tasks",
                Phase::Ping => "pinging",
            };
            lines.push(Line::new(
                Tone::Error,
                format!("Error {what} for {account}: {error}"),
            ));
        }
        ProgressEvent::Waiting { delay } => {
            lines.push(Line::new(
                Tone::Warning,
                format!("Waiting {} seconds before next cycle...", delay.as_secs()),
            ));
        }
        ProgressEvent::ShutdownRequested => {
            lines.push(Line::new(Tone::Warning, "Gracefully shutting down..."));
        }
    }
    lines
}

/// Writes rendered events to stdout, coloured when stdout is a terminal.
pub struct ConsoleReporter {
    out: Mutex<Box<dyn Write + Send>>,
    color: bool,
}

impl ConsoleReporter {
    pub fn stdout() -> Self {
        let stdout = std::io::stdout();
        let color = stdout.is_terminal();
        Self::new(Box::new(stdout), color)
    }

    fn new(out: Box<dyn Write + Send>, color: bool) -> Self {
        Self {
            out: Mutex::new(out),
            color,
        }
    }

    fn paint(&self, line: &Line) -> String {
        match (self.color, line.tone.ansi()) {
            (true, Some(code)) => format!("{code}{}\x1b[0m", line.text),
            _ => line.text.clone(),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: &ProgressEvent) {
        let lines = render(event, Local::now());
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        for line in &lines {
            // Console output is best effort; a closed stdout must not stop the run.
            let _ = writeln!(out, "{}", self.paint(line));
        }
        let _ = out.flush();
    }
}
