//! Rotating gzip output for one group.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::{Compression, GzBuilder};
use quiver_core::{Posting, Uid};
use tracing::debug;

use super::error::{BackupError, BackupResult};
use super::types::{file_name, BackupOptions};
use crate::group::GroupId;
use crate::rdf::write_quad;

/// Fixed so identical input gives identical bytes.
const COMPRESSION_LEVEL: u32 = 6;

/// Writes quad lines of one group into `g{group}-s{seq}.rdf.gz` files.
///
/// Files are created on the first line, so a group with nothing to write
/// leaves no files behind. Lines collect in a text buffer that is pushed
/// through gzip once it reaches the configured size.
pub(crate) struct GroupWriter<'a> {
    dir: &'a Path,
    group: GroupId,
    max_lines: u64,
    buffer_bytes: usize,
    buffer: String,
    current: Option<GzEncoder<File>>,
    lines_in_file: u64,
    files: Vec<PathBuf>,
    lines: u64,
}

impl<'a> GroupWriter<'a> {
    pub(crate) fn new(dir: &'a Path, group: GroupId, options: &BackupOptions) -> Self {
        Self {
            dir,
            group,
            max_lines: options.max_lines_per_file.max(1),
            buffer_bytes: options.buffer_bytes,
            buffer: String::with_capacity(options.buffer_bytes.min(1 << 20)),
            current: None,
            lines_in_file: 0,
            files: Vec::new(),
            lines: 0,
        }
    }

    /// Append the quad line for `posting`.
    pub(crate) fn write_posting(&mut self, subject: Uid, attr: &str, posting: &Posting) -> BackupResult<()> {
        if self.current.is_none() || self.lines_in_file >= self.max_lines {
            self.rotate()?;
        }
        write_quad(&mut self.buffer, subject, attr, posting);
        self.buffer.push('\n');
        self.lines_in_file += 1;
        self.lines += 1;
        if self.buffer.len() >= self.buffer_bytes {
            self.flush_buffer()?;
        }
        Ok(())
    }

    /// Files opened so far, in sequence order.
    pub(crate) fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Lines written so far.
    pub(crate) const fn lines(&self) -> u64 {
        self.lines
    }

    /// Flush the buffer and finish the current gzip stream.
    ///
    /// Safe to call more than once; a failed close still drops the file.
    pub(crate) fn close(&mut self) -> BackupResult<()> {
        let flushed = self.flush_buffer();
        self.buffer.clear();
        let Some(encoder) = self.current.take() else {
            return flushed;
        };
        flushed?;
        let file = encoder.finish().map_err(|e| self.io_error(e))?;
        file.sync_all().map_err(|e| self.io_error(e))
    }

    fn rotate(&mut self) -> BackupResult<()> {
        self.close()?;

        let seq = u32::try_from(self.files.len())
            .map_err(|_| self.io_error(io::Error::other("too many sequence files")))?;
        let path = self.dir.join(file_name(self.group, seq));
        fs::create_dir_all(self.dir).map_err(|source| BackupError::Io {
            group: self.group,
            path: self.dir.to_path_buf(),
            source,
        })?;
        let file = File::create(&path).map_err(|source| BackupError::Io {
            group: self.group,
            path: path.clone(),
            source,
        })?;
        debug!(file = %path.display(), seq, "opened backup file");

        self.current = Some(GzBuilder::new().mtime(0).write(file, Compression::new(COMPRESSION_LEVEL)));
        self.files.push(path);
        self.lines_in_file = 0;
        Ok(())
    }

    fn flush_buffer(&mut self) -> BackupResult<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let Some(encoder) = self.current.as_mut() else {
            return Ok(());
        };
        let written = encoder.write_all(self.buffer.as_bytes());
        self.buffer.clear();
        written.map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: io::Error) -> BackupError {
        let path = self.files.last().cloned().unwrap_or_else(|| self.dir.to_path_buf());
        BackupError::Io { group: self.group, path, source }
    }
}
