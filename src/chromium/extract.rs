//! Archive extraction strategies.
//!
//! Two implementations behind one trait: the system `7z` tool (what the
//! published Linux archives were packaged for) and an in-process unzip
//! via the `zip` crate. Selection is capability-based: `7z` is chosen
//! only when the platform prefers it and the tool is actually on PATH.

use std::fs::File;
use std::io;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use super::error::{ChromiumError, ChromiumResult};
use super::platform::Platform;

/// Strategy for unpacking a downloaded archive into a directory.
pub(super) trait ArchiveExtractor {
    /// Human-readable strategy name for logging.
    fn name(&self) -> &'static str;

    /// Extract `archive` into `dest`.
    fn extract(&self, archive: &Path, dest: &Path) -> ChromiumResult<()>;
}

/// Extraction via the system `7z` tool.
pub(super) struct SevenZipExtractor;

impl ArchiveExtractor for SevenZipExtractor {
    fn name(&self) -> &'static str {
        "7z"
    }

    fn extract(&self, archive: &Path, dest: &Path) -> ChromiumResult<()> {
        debug!(archive = %archive.display(), dest = %dest.display(), "extracting with 7z");

        let status = Command::new("7z")
            .arg("x")
            .arg("-y")
            .arg(archive)
            .current_dir(dest)
            .status()
            .map_err(|e| ChromiumError::ExtractionFailed(format!("failed to run 7z: {e}")))?;

        if !status.success() {
            return Err(ChromiumError::ExtractionFailed(format!(
                "7z exited with {status}"
            )));
        }

        Ok(())
    }
}

/// In-process extraction via the `zip` crate.
///
/// Validates every entry (a full CRC pass over the archive) before any
/// file is written.
pub(super) struct ZipExtractor;

impl ArchiveExtractor for ZipExtractor {
    fn name(&self) -> &'static str {
        "zip"
    }

    fn extract(&self, archive: &Path, dest: &Path) -> ChromiumResult<()> {
        debug!(archive = %archive.display(), dest = %dest.display(), "extracting in-process");

        let file = File::open(archive)?;
        let mut zip = zip::ZipArchive::new(file)
            .map_err(|e| ChromiumError::ExtractionFailed(e.to_string()))?;

        // Integrity pass: reading an entry to completion verifies its CRC.
        for i in 0..zip.len() {
            let mut entry = zip
                .by_index(i)
                .map_err(|e| ChromiumError::ExtractionFailed(e.to_string()))?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            io::copy(&mut entry, &mut io::sink()).map_err(|e| {
                ChromiumError::ExtractionFailed(format!("corrupt entry {name}: {e}"))
            })?;
        }

        zip.extract(dest)
            .map_err(|e| ChromiumError::ExtractionFailed(e.to_string()))?;

        Ok(())
    }
}

/// Pick the extraction strategy for `platform`.
///
/// Linux prefers the system `7z` tool when it is installed; everything
/// else (and Linux without `7z`) uses the in-process extractor.
pub(super) fn select_extractor(platform: Platform) -> Box<dyn ArchiveExtractor> {
    if platform.prefers_system_unzip() && which::which("7z").is_ok() {
        Box::new(SevenZipExtractor)
    } else {
        Box::new(ZipExtractor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromium::test_utils::build_zip;
    use std::fs;

    #[test]
    fn zip_extractor_unpacks_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("linux.zip");
        fs::write(
            &archive,
            build_zip(&[("linux/chrome", b"binary"), ("linux/libfoo.so", b"lib")]),
        )
        .unwrap();

        ZipExtractor.extract(&archive, tmp.path()).unwrap();

        assert_eq!(
            fs::read(tmp.path().join("linux").join("chrome")).unwrap(),
            b"binary"
        );
        assert_eq!(
            fs::read(tmp.path().join("linux").join("libfoo.so")).unwrap(),
            b"lib"
        );
    }

    #[test]
    fn zip_extractor_rejects_corrupt_archive_before_writing() {
        let tmp = tempfile::tempdir().unwrap();
        let payload = b"chromium-binary-content";
        let mut bytes = build_zip(&[("linux/chrome", payload)]);

        // Flip a byte inside the stored payload so the CRC check fails.
        let pos = bytes
            .windows(payload.len())
            .position(|w| w == payload)
            .unwrap();
        bytes[pos] ^= 0xff;

        let archive = tmp.path().join("linux.zip");
        fs::write(&archive, bytes).unwrap();

        let out = tmp.path().join("out");
        fs::create_dir_all(&out).unwrap();
        let err = ZipExtractor.extract(&archive, &out).unwrap_err();
        assert!(matches!(err, ChromiumError::ExtractionFailed(_)));

        // Nothing was extracted.
        assert!(!out.join("linux").exists());
    }

    #[test]
    fn zip_extractor_rejects_non_zip_file() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("bogus.zip");
        fs::write(&archive, b"this is not a zip").unwrap();

        let err = ZipExtractor.extract(&archive, tmp.path()).unwrap_err();
        assert!(matches!(err, ChromiumError::ExtractionFailed(_)));
    }

    #[test]
    fn non_linux_platform_uses_in_process_extractor() {
        let extractor = select_extractor(Platform::Win32);
        assert_eq!(extractor.name(), "zip");
    }
}
