//! Download progress reporting.
//!
//! The provisioner itself stays silent; callers attach a reporter to
//! watch the archive transfer. Library callers and tests get
//! `NoopProgress`, the CLI renders an indicatif bar.

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};

/// Receiver for archive transfer progress.
pub trait ProgressReporter: Send + Sync {
    /// A transfer is starting. `total` is the content length when the
    /// server reported one.
    fn start(&self, message: &str, total: Option<u64>);

    /// Bytes transferred so far.
    fn update(&self, current: u64, total: Option<u64>);

    /// The transfer completed.
    fn finish(&self, message: &str);

    /// The transfer failed; `message` describes why.
    fn finish_with_error(&self, message: &str);
}

/// Reporter that ignores all updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn start(&self, _message: &str, _total: Option<u64>) {}
    fn update(&self, _current: u64, _total: Option<u64>) {}
    fn finish(&self, _message: &str) {}
    fn finish_with_error(&self, _message: &str) {}
}

/// Terminal progress bar for the CLI.
///
/// The bar only exists between `start` and `finish`; updates outside
/// that window are ignored, and a failure before `start` (for example a
/// refused connection) simply has no bar to tear down.
#[derive(Default)]
pub struct CliProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressReporter for CliProgress {
    fn start(&self, message: &str, total: Option<u64>) {
        let pb = match total {
            Some(len) if len > 0 => {
                let pb = ProgressBar::new(len);
                pb.set_style(
                    ProgressStyle::with_template(
                        "{msg}\n[{bar:40}] {bytes}/{total_bytes} ({bytes_per_sec}, eta {eta})",
                    )
                    .unwrap()
                    .progress_chars("=>-"),
                );
                pb
            }
            // Length unknown: byte counter behind a spinner.
            _ => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::with_template("{spinner} {msg} {bytes} ({bytes_per_sec})")
                        .unwrap(),
                );
                pb
            }
        };
        pb.set_message(message.to_string());

        *self.bar.lock().unwrap() = Some(pb);
    }

    fn update(&self, current: u64, total: Option<u64>) {
        if let Some(ref pb) = *self.bar.lock().unwrap() {
            if let Some(len) = total {
                pb.set_length(len);
            }
            pb.set_position(current);
        }
    }

    fn finish(&self, message: &str) {
        if let Some(pb) = self.bar.lock().unwrap().take() {
            pb.finish_with_message(message.to_string());
        }
    }

    fn finish_with_error(&self, message: &str) {
        if let Some(pb) = self.bar.lock().unwrap().take() {
            pb.abandon_with_message(message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updates_outside_a_transfer_are_ignored() {
        let progress = CliProgress::new();

        // No bar yet; nothing to update or tear down.
        progress.update(10, Some(100));
        progress.finish_with_error("refused");

        progress.start("downloading", Some(100));
        progress.update(50, Some(100));
        progress.finish("done");

        // The bar is gone after finish.
        progress.update(80, Some(100));
    }

    #[test]
    fn unknown_length_transfer_uses_a_spinner() {
        let progress = CliProgress::new();
        progress.start("downloading", None);
        progress.update(1024, None);
        progress.finish_with_error("stream ended early");
    }
}
