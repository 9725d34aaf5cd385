//! Streaming archive download.
//!
//! Thin fetch step: URL in, file on disk out. The download is skipped
//! when the destination already has content and overwrite was not
//! requested, which is what makes a crashed-then-retried provisioning
//! run resume from the archive it already has.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use futures_util::StreamExt;
use reqwest::Client;
use tracing::debug;

use super::error::{ChromiumError, ChromiumResult};
use super::progress::ProgressReporter;

const USER_AGENT: &str = "open-webdriver";

/// Whether a download to `dest` can be skipped entirely.
fn already_populated(dest: &Path, overwrite: bool) -> bool {
    if overwrite {
        return false;
    }
    fs::metadata(dest).is_ok_and(|m| m.is_file() && m.len() > 0)
}

/// Download `url` to `dest`, streaming chunks to disk.
///
/// The parent directory is created if missing. Non-2xx responses and
/// stream errors surface as `DownloadFailed`.
pub(super) async fn download_file(
    client: &Client,
    url: &str,
    dest: &Path,
    overwrite: bool,
    progress: &dyn ProgressReporter,
) -> ChromiumResult<()> {
    if already_populated(dest, overwrite) {
        debug!(dest = %dest.display(), "archive already present, skipping download");
        return Ok(());
    }

    let response = match client.get(url).header("User-Agent", USER_AGENT).send().await {
        Ok(response) => response,
        Err(e) => {
            let msg = format!("{url}: {e}");
            progress.finish_with_error(&msg);
            return Err(ChromiumError::DownloadFailed(msg));
        }
    };

    if !response.status().is_success() {
        let msg = format!("{url}: HTTP {}", response.status());
        progress.finish_with_error(&msg);
        return Err(ChromiumError::DownloadFailed(msg));
    }

    let total_size = response.content_length();
    progress.start(&format!("Downloading {url}"), total_size);

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(dest)?;

    let mut downloaded: u64 = 0;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                let msg = format!("{url}: {e}");
                progress.finish_with_error(&msg);
                return Err(ChromiumError::DownloadFailed(msg));
            }
        };
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        progress.update(downloaded, total_size);
    }

    progress.finish("Download complete");
    debug!(bytes = downloaded, dest = %dest.display(), "download finished");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromium::progress::NoopProgress;
    use std::sync::Mutex;

    /// Records which reporter callbacks fired, in order.
    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<&'static str>>,
    }

    impl RecordingProgress {
        fn events(&self) -> Vec<&'static str> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ProgressReporter for RecordingProgress {
        fn start(&self, _message: &str, _total: Option<u64>) {
            self.events.lock().unwrap().push("start");
        }
        fn update(&self, _current: u64, _total: Option<u64>) {
            self.events.lock().unwrap().push("update");
        }
        fn finish(&self, _message: &str) {
            self.events.lock().unwrap().push("finish");
        }
        fn finish_with_error(&self, _message: &str) {
            self.events.lock().unwrap().push("finish_with_error");
        }
    }

    #[test]
    fn populated_destination_skips() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("archive.zip");
        fs::write(&dest, b"not empty").unwrap();

        assert!(already_populated(&dest, false));
        assert!(!already_populated(&dest, true));
    }

    #[test]
    fn empty_or_missing_destination_does_not_skip() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.zip");
        assert!(!already_populated(&missing, false));

        let empty = tmp.path().join("empty.zip");
        fs::write(&empty, b"").unwrap();
        assert!(!already_populated(&empty, false));
    }

    #[tokio::test]
    async fn skip_path_performs_no_network_access() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("archive.zip");
        fs::write(&dest, b"cached bytes").unwrap();

        // The URL is unroutable; success proves no request was made.
        let client = Client::new();
        download_file(
            &client,
            "http://127.0.0.1:1/never.zip",
            &dest,
            false,
            &NoopProgress,
        )
        .await
        .unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"cached bytes");
    }

    #[tokio::test]
    async fn failed_request_tears_down_the_reporter() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("archive.zip");

        let recording = RecordingProgress::default();
        let client = Client::new();
        let err = download_file(
            &client,
            "http://127.0.0.1:1/linux.zip",
            &dest,
            false,
            &recording,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ChromiumError::DownloadFailed(_)));
        assert_eq!(recording.events(), vec!["finish_with_error"]);
    }
}
