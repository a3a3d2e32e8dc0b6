use crate::error::{ReportError, ReportResult};
use flate2::write::GzEncoder;
use flate2::Compression;
use tar::{Builder, Header};

#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveEntry {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Packages named artifacts into one downloadable bundle.
pub trait ArchiveBuilder: Send + Sync {
    /// File extension of the bundle, without the leading dot.
    fn extension(&self) -> &str;
    fn bundle(&self, entries: &[ArchiveEntry]) -> ReportResult<Vec<u8>>;
}

/// Gzip-compressed tarball with entries in insertion order.
#[derive(Debug, Clone, Copy, Default)]
pub struct TarGzArchive;

impl ArchiveBuilder for TarGzArchive {
    fn extension(&self) -> &str {
        "tar.gz"
    }

    fn bundle(&self, entries: &[ArchiveEntry]) -> ReportResult<Vec<u8>> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = Builder::new(encoder);

        for entry in entries {
            let mut header = Header::new_gnu();
            header.set_size(entry.bytes.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, &entry.name, entry.bytes.as_slice())
                .map_err(|e| ReportError::Archive(format!("{}: {}", entry.name, e)))?;
        }

        let encoder = builder
            .into_inner()
            .map_err(|e| ReportError::Archive(e.to_string()))?;
        encoder
            .finish()
            .map_err(|e| ReportError::Archive(e.to_string()))
    }
}
