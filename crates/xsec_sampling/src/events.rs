//! Tab-separated event stream.
//!
//! ```text
//! E_e	cos_theta
//! 12.345678	-0.250000
//! ```

use crate::error::SamplingError;
use crate::sampler::Event;
use csv::{Writer, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Column headers of the event stream.
pub const EVENT_HEADER: [&str; 2] = ["E_e", "cos_theta"];

/// Writes events as tab-separated lines with six decimals.
///
/// # Example
///
/// ```
/// use xsec_sampling::events::EventWriter;
/// use xsec_sampling::sampler::Event;
///
/// let mut writer = EventWriter::new(Vec::new()).unwrap();
/// writer.write(&Event { x: 1.5, y: -0.25 }).unwrap();
/// let bytes = writer.into_inner().unwrap();
///
/// assert_eq!(String::from_utf8(bytes).unwrap(), "E_e\tcos_theta\n1.500000\t-0.250000\n");
/// ```
pub struct EventWriter<W: Write> {
    inner: Writer<W>,
    written: usize,
}

impl EventWriter<File> {
    /// Create (or truncate) the file at `path` and write the header.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SamplingError> {
        Self::new(File::create(path)?)
    }
}

impl<W: Write> EventWriter<W> {
    /// Wrap `sink` and write the header line.
    pub fn new(sink: W) -> Result<Self, SamplingError> {
        let mut inner = WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_writer(sink);
        inner.write_record(EVENT_HEADER)?;
        Ok(Self { inner, written: 0 })
    }

    /// Append one event.
    pub fn write(&mut self, event: &Event) -> Result<(), SamplingError> {
        self.inner
            .write_record([format!("{:.6}", event.x), format!("{:.6}", event.y)])?;
        self.written += 1;
        Ok(())
    }

    /// Number of events written so far.
    #[inline]
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush buffered records to the sink.
    pub fn flush(&mut self) -> Result<(), SamplingError> {
        self.inner.flush()?;
        Ok(())
    }

    /// Flush and return the sink.
    pub fn into_inner(self) -> Result<W, SamplingError> {
        self.inner
            .into_inner()
            .map_err(|e| SamplingError::Io(e.into_error()))
    }
}
