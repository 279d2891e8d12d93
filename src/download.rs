//! Dataset download
//!
//! This module fetches a dataset's raw bytes over HTTP into a named
//! temporary file, reporting progress to a presentation front end after
//! every chunk. The temporary file is deleted when its handle drops, so
//! every exit path cleans up after itself.

use std::io::{Read, Write};
use std::time::Duration;

use rand::distributions::Alphanumeric;
use rand::Rng;
use tempfile::NamedTempFile;

use crate::display::{Presenter, ProgressEvent};
use crate::registry::DatasetDef;
use crate::Result;
use crate::SampleDataError;

/// Fixed identifying header sent with every dataset request
pub const USER_AGENT: &str = "samplesets Sample Data Downloader/1.0";

/// Response bytes are read in chunks of this size
const CHUNK_SIZE: usize = 8192;

/// Assumed total when the response carries no Content-Length; raised to the
/// actual byte count once exceeded so percentages never pass 100
const TOTAL_SIZE_PLACEHOLDER: u64 = 100;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Retrieves a dataset's bytes into a local temporary file
///
/// The default implementation is [`HttpFetcher`]; tests substitute their own.
pub trait Fetcher {
    /// Download the descriptor's url, emitting progress through `presenter`.
    ///
    /// The returned [`NamedTempFile`] holds the raw response body and is
    /// removed from disk when dropped.
    fn fetch(&self, def: &DatasetDef, presenter: &dyn Presenter) -> Result<NamedTempFile>;
}

/// Byte counters and correlation id for one download invocation
pub struct DownloadSession {
    id: String,
    bytes_so_far: u64,
    total_size: u64,
}

impl DownloadSession {
    /// Start a session with a fresh random id
    pub fn new(content_length: Option<u64>) -> Self {
        let id: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(8)
            .map(char::from)
            .collect();
        Self {
            id,
            bytes_so_far: 0,
            total_size: content_length.unwrap_or(TOTAL_SIZE_PLACEHOLDER),
        }
    }

    /// Session id, for correlating progress UI elements
    pub fn id(&self) -> &str {
        &self.id
    }

    fn advance(&mut self, bytes: u64) {
        self.bytes_so_far += bytes;
        if self.bytes_so_far > self.total_size {
            self.total_size = self.bytes_so_far;
        }
    }

    fn event(&self) -> ProgressEvent {
        ProgressEvent {
            session_id: self.id.clone(),
            bytes_so_far: self.bytes_so_far,
            total_size: self.total_size,
        }
    }
}

/// Copy `reader` to `writer` in fixed-size chunks with progress reporting.
///
/// A zero-byte event is emitted before the first read to initialize the
/// progress UI; one event follows each chunk written. The loop ends on the
/// first empty read, which updates no counters and emits no further event.
/// Read failures are network errors, write failures are I/O errors.
pub(crate) fn copy_with_progress<R, W>(
    reader: &mut R,
    writer: &mut W,
    session: &mut DownloadSession,
    presenter: &dyn Presenter,
) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buffer = [0u8; CHUNK_SIZE];

    presenter.progress(&session.event());

    loop {
        let bytes_read = reader.read(&mut buffer).map_err(|e| {
            SampleDataError::NetworkError(format!("Failed to read response: {}", e))
        })?;
        session.advance(bytes_read as u64);

        if bytes_read == 0 {
            break;
        }

        writer.write_all(&buffer[..bytes_read])?;
        presenter.progress(&session.event());
    }

    Ok(session.bytes_so_far)
}

/// Blocking HTTP fetcher
pub struct HttpFetcher {
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, def: &DatasetDef, presenter: &dyn Presenter) -> Result<NamedTempFile> {
        presenter.status(&format!(
            "Downloading '{}' from {}",
            def.display_name, def.url
        ));
        log::debug!("GET {}", def.url);

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                SampleDataError::NetworkError(format!("Failed to create HTTP client: {}", e))
            })?;

        let mut response = client.get(&def.url).send().map_err(|e| {
            SampleDataError::NetworkError(format!(
                "Failed to download '{}': {}",
                def.display_name, e
            ))
        })?;

        if !response.status().is_success() {
            return Err(SampleDataError::NetworkError(format!(
                "Failed to download file, status: {}",
                response.status()
            )));
        }

        let content_length = response.content_length();
        let mut session = DownloadSession::new(content_length);
        let mut file = NamedTempFile::new()?;

        let bytes_written =
            copy_with_progress(&mut response, file.as_file_mut(), &mut session, presenter)?;
        file.as_file_mut().flush()?;

        log::debug!(
            "wrote {} bytes to {}",
            bytes_written,
            file.path().display()
        );
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Cursor;

    /// Presenter that records every payload it receives
    #[derive(Default)]
    struct RecordingPresenter {
        events: RefCell<Vec<ProgressEvent>>,
        statuses: RefCell<Vec<String>>,
    }

    impl Presenter for RecordingPresenter {
        fn render(&self, _markup: &str) {}

        fn status(&self, message: &str) {
            self.statuses.borrow_mut().push(message.to_string());
        }

        fn progress(&self, event: &ProgressEvent) {
            self.events.borrow_mut().push(event.clone());
        }
    }

    #[test]
    fn test_session_id_is_eight_alphanumeric_chars() {
        let session = DownloadSession::new(None);
        assert_eq!(session.id().len(), 8);
        assert!(session.id().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_copy_reports_monotonic_progress() {
        let data = vec![7u8; 20_000];
        let mut reader = Cursor::new(data.clone());
        let mut out = Vec::new();
        let mut session = DownloadSession::new(Some(data.len() as u64));
        let presenter = RecordingPresenter::default();

        let written =
            copy_with_progress(&mut reader, &mut out, &mut session, &presenter).unwrap();

        assert_eq!(written, 20_000);
        assert_eq!(out, data);

        let events = presenter.events.borrow();
        // Initial zero-byte event plus one per 8192-byte chunk
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].bytes_so_far, 0);
        assert_eq!(events[1].bytes_so_far, 8192);
        assert_eq!(events[2].bytes_so_far, 16_384);
        assert_eq!(events[3].bytes_so_far, 20_000);
        for pair in events.windows(2) {
            assert!(pair[0].bytes_so_far <= pair[1].bytes_so_far);
        }
        // Declared length is trusted throughout
        assert!(events.iter().all(|e| e.total_size == 20_000));
        // All events of a session share one id
        assert!(events.iter().all(|e| e.session_id == events[0].session_id));
    }

    #[test]
    fn test_placeholder_total_raised_once_exceeded() {
        let data = vec![1u8; 20_000];
        let mut reader = Cursor::new(data);
        let mut out = Vec::new();
        let mut session = DownloadSession::new(None);
        let presenter = RecordingPresenter::default();

        copy_with_progress(&mut reader, &mut out, &mut session, &presenter).unwrap();

        let events = presenter.events.borrow();
        assert_eq!(events[0].total_size, 100);
        // Once bytes exceed the placeholder, the total tracks bytes read
        let last = events.last().unwrap();
        assert_eq!(last.total_size, last.bytes_so_far);
        assert!(events.iter().all(|e| e.percent() <= 100.0));
    }

    #[test]
    fn test_placeholder_total_kept_for_tiny_bodies() {
        let mut reader = Cursor::new(vec![1u8; 50]);
        let mut out = Vec::new();
        let mut session = DownloadSession::new(None);
        let presenter = RecordingPresenter::default();

        copy_with_progress(&mut reader, &mut out, &mut session, &presenter).unwrap();

        let events = presenter.events.borrow();
        let last = events.last().unwrap();
        assert_eq!(last.total_size, 100);
        assert_eq!(last.bytes_so_far, 50);
        assert_eq!(last.percent(), 50.0);
    }

    /// Reader that yields one good chunk and then fails
    struct FlakyReader {
        sent: bool,
    }

    impl Read for FlakyReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.sent {
                Err(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset",
                ))
            } else {
                self.sent = true;
                buf[..3].copy_from_slice(b"abc");
                Ok(3)
            }
        }
    }

    #[test]
    fn test_mid_stream_failure_is_network_error() {
        let mut reader = FlakyReader { sent: false };
        let mut out = Vec::new();
        let mut session = DownloadSession::new(None);
        let presenter = RecordingPresenter::default();

        let err = copy_with_progress(&mut reader, &mut out, &mut session, &presenter)
            .unwrap_err();

        assert!(matches!(err, SampleDataError::NetworkError(_)));
        // The chunk received before the failure was still written
        assert_eq!(out, b"abc");
    }
}
