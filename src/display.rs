//! Presentation front ends
//!
//! This module defines the interface between the download/load pipeline and
//! whatever rich-display surface is in use. Front ends receive three kinds
//! of payload: full-page markup (the dataset list), plain status messages,
//! and incremental progress updates keyed by a download session id.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde::Serialize;

use crate::registry::DatasetDef;

/// Incremental progress report for one download session
#[derive(Debug, Clone, Serialize)]
pub struct ProgressEvent {
    /// Short random id correlating events of one download
    pub session_id: String,
    /// Bytes received so far
    pub bytes_so_far: u64,
    /// Expected total; never less than `bytes_so_far`
    pub total_size: u64,
}

impl ProgressEvent {
    /// Completion percentage in 0..=100, rounded to two decimals
    pub fn percent(&self) -> f64 {
        if self.total_size == 0 {
            return 0.0;
        }
        let percent = self.bytes_so_far as f64 / self.total_size as f64 * 100.0;
        (percent * 100.0).round() / 100.0
    }

    /// Human-readable progress label
    pub fn label(&self) -> String {
        if self.bytes_so_far == 0 {
            "Starting download...".to_string()
        } else {
            format!(
                "Downloaded {} of {} bytes",
                self.bytes_so_far, self.total_size
            )
        }
    }
}

/// Sink for everything the pipeline wants to show the user
///
/// Implementations must not fail; a front end that cannot display a payload
/// drops it silently.
pub trait Presenter {
    /// Render a full markup payload (the dataset list)
    fn render(&self, markup: &str);

    /// Show a one-line status message
    fn status(&self, message: &str);

    /// Update the progress indicator for a download session
    fn progress(&self, event: &ProgressEvent);
}

/// Terminal front end
///
/// Statuses go to stdout one per line; progress redraws a text bar in place
/// with carriage returns. Markup is printed verbatim.
pub struct ConsolePresenter {
    mid_progress: AtomicBool,
}

const BAR_WIDTH: usize = 40;

impl ConsolePresenter {
    pub fn new() -> Self {
        Self {
            mid_progress: AtomicBool::new(false),
        }
    }

    /// Terminate an in-place progress bar before printing a normal line
    fn finish_progress(&self) {
        if self.mid_progress.swap(false, Ordering::Relaxed) {
            println!();
        }
    }
}

impl Default for ConsolePresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for ConsolePresenter {
    fn render(&self, markup: &str) {
        self.finish_progress();
        println!("{}", markup);
    }

    fn status(&self, message: &str) {
        self.finish_progress();
        println!("{}", message);
    }

    fn progress(&self, event: &ProgressEvent) {
        let filled = ((event.percent() / 100.0) * BAR_WIDTH as f64).round() as usize;
        let filled = filled.min(BAR_WIDTH);

        print!("\r[");
        for _ in 0..filled {
            print!("#");
        }
        for _ in 0..(BAR_WIDTH - filled) {
            print!(" ");
        }
        print!("] {:.2}% {}", event.percent(), event.label());
        let _ = io::stdout().flush();

        self.mid_progress.store(true, Ordering::Relaxed);
    }
}

/// Payload format emitted by [`JsonLinePresenter`]
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Payload<'a> {
    Render {
        markup: &'a str,
    },
    Status {
        message: &'a str,
    },
    Progress {
        session_id: &'a str,
        label: String,
        percent: f64,
    },
}

/// Machine-readable front end: one JSON object per line
///
/// Intended for rich-display hosts that drive their own progress widgets
/// from status-update payloads keyed by session id.
pub struct JsonLinePresenter<W: Write> {
    out: Mutex<W>,
}

impl<W: Write> JsonLinePresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Consume the presenter and recover the underlying writer
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, payload: &Payload<'_>) {
        if let (Ok(line), Ok(mut out)) = (serde_json::to_string(payload), self.out.lock()) {
            let _ = writeln!(out, "{}", line);
        }
    }
}

impl<W: Write> Presenter for JsonLinePresenter<W> {
    fn render(&self, markup: &str) {
        self.emit(&Payload::Render { markup });
    }

    fn status(&self, message: &str) {
        self.emit(&Payload::Status { message });
    }

    fn progress(&self, event: &ProgressEvent) {
        self.emit(&Payload::Progress {
            session_id: &event.session_id,
            label: event.label(),
            percent: event.percent(),
        });
    }
}

/// Render the dataset list as an HTML table
pub fn dataset_list_html(defs: &[DatasetDef]) -> String {
    let mut html = String::from(
        "<table>\n  <tr><th>Id</th><th>Name</th><th>Topic</th><th>Publisher</th></tr>\n",
    );
    for def in defs {
        html.push_str(&format!(
            "  <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            def.id, def.display_name, def.topic, def.publisher
        ));
    }
    html.push_str("</table>");
    html
}
