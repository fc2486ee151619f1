//! Recovering stream reader: line framing with partial-line salvage,
//! rolling corruption-ratio guarding, rotation detection, and checkpoint
//! resume. Combines what the source system splits across a line-level
//! stream reader and a record-level recovery wrapper into one state
//! machine, since this crate has one `Frame` consumer, not several.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::thread::sleep;
use std::time::Duration;

use crate::config::IoConfig;
use crate::error::{AetherError, Result};
use crate::types::{Checkpoint, Frame, StreamStats};
use crate::util::{create_with_backoff, open_with_backoff, replace_file_atomic_backoff};

use super::record::{parse_csv_record, parse_jsonl_record};

const CORRUPT_WINDOW_SIZE: u32 = 64;

/// One raw line read attempt.
enum RawLine {
    Line(String),
    /// Tail mode, nothing new yet (not EOF — caller should keep polling).
    Empty,
    /// File mode: no more data, stream is done.
    Eof,
}

pub struct RecoveryStreamReader {
    cfg: IoConfig,
    path: PathBuf,
    file: BufReader<File>,
    partial: String,
    offset: u64,
    signature: String,
    last_timestamp_ns: u64,
    stats: StreamStats,
    corrupt_window: u32,
    window_size: u32,
    at_eof: bool,
}

fn file_signature(path: &Path) -> String {
    match std::fs::metadata(path) {
        Ok(meta) => format!("{}:{}", meta.is_file(), meta.len()),
        Err(_) => String::new(),
    }
}

impl RecoveryStreamReader {
    pub fn open(cfg: IoConfig) -> Result<Self> {
        let path = PathBuf::from(&cfg.path);
        let file = open_with_backoff(&path, 3, 20)
            .map_err(|e| AetherError::Io(e))?;
        let signature = file_signature(&path);
        let mut reader = Self {
            cfg,
            path,
            file: BufReader::new(file),
            partial: String::new(),
            offset: 0,
            signature,
            last_timestamp_ns: 0,
            stats: StreamStats::default(),
            corrupt_window: 0,
            window_size: 0,
            at_eof: false,
        };
        reader.resume_if_checkpointed()?;
        Ok(reader)
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    /// True when the most recent `next()` call hit true end-of-stream
    /// (file mode, no more data). In tail mode this never becomes true —
    /// an exhausted tail just means "nothing new yet, keep polling".
    pub fn at_eof(&self) -> bool {
        self.at_eof
    }

    fn resume_if_checkpointed(&mut self) -> Result<()> {
        match self.cfg.start_position.as_str() {
            "end" => {
                let end = self.file.seek(SeekFrom::End(0))?;
                self.offset = end;
            }
            "checkpoint" => {
                if let Ok(text) = std::fs::read_to_string(&self.cfg.checkpoint_path) {
                    if let Some(ck) = Checkpoint::parse_line(&text) {
                        if ck.signature == self.signature {
                            self.file.seek(SeekFrom::Start(ck.offset))?;
                            self.offset = ck.offset;
                            self.last_timestamp_ns = ck.timestamp_ns;
                            self.stats.checkpoint_resume_total += 1;
                        }
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn write_checkpoint(&mut self) {
        if self.cfg.checkpoint_path.is_empty() {
            return;
        }
        let ck = Checkpoint {
            signature: self.signature.clone(),
            offset: self.offset,
            timestamp_ns: self.last_timestamp_ns,
        };
        let tmp_path = format!("{}.tmp", self.cfg.checkpoint_path);
        let tmp = PathBuf::from(&tmp_path);
        let dest = PathBuf::from(&self.cfg.checkpoint_path);
        let write_result = (|| -> std::io::Result<()> {
            let mut f = create_with_backoff(&tmp, 3, 20)?;
            use std::io::Write;
            f.write_all(ck.to_line().as_bytes())?;
            replace_file_atomic_backoff(&tmp, &dest)
        })();
        if write_result.is_ok() {
            self.stats.checkpoint_writes_total += 1;
        }
    }

    fn detect_rotation(&mut self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let new_sig = file_signature(&self.path);
        if new_sig != self.signature {
            self.stats.rotations_detected_total += 1;
            if self.cfg.rotate_handling == "reopen" {
                let file = open_with_backoff(&self.path, 3, 20).map_err(AetherError::Io)?;
                self.file = BufReader::new(file);
                self.offset = 0;
                self.partial.clear();
                self.signature = new_sig;
            } else {
                return Err(AetherError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "file rotated under reader",
                )));
            }
        }
        Ok(())
    }

    fn read_raw_line(&mut self) -> std::io::Result<RawLine> {
        let mut buf: Vec<u8> = Vec::new();
        let n = self.file.read_until(b'\n', &mut buf)?;
        if n == 0 {
            if self.cfg.mode == "tail" {
                sleep(Duration::from_millis(self.cfg.poll_interval_ms));
                return Ok(RawLine::Empty);
            }
            return Ok(RawLine::Eof);
        }
        self.offset += n as u64;
        let ends_with_newline = buf.last() == Some(&b'\n');
        let mut text = String::from_utf8_lossy(&buf).to_string();
        if ends_with_newline {
            if text.ends_with('\n') {
                text.pop();
            }
            if text.ends_with('\r') {
                text.pop();
            }
            if !self.partial.is_empty() {
                let full = std::mem::take(&mut self.partial) + &text;
                return Ok(RawLine::Line(full));
            }
            return Ok(RawLine::Line(text));
        }

        self.stats.records_partial_total += 1;
        self.partial.push_str(&text);
        if self.partial.len() > self.cfg.max_partial_line_bytes {
            self.partial.clear();
            self.stats.records_corrupt_total += 1;
        }
        if self.cfg.mode == "tail" {
            sleep(Duration::from_millis(self.cfg.poll_interval_ms));
        }
        Ok(RawLine::Empty)
    }

    /// Advance the rolling corrupt-ratio window by one consumed line
    /// (valid or corrupt) and gate once the window fills.
    fn note_consumed(&mut self, corrupt: bool) -> Result<()> {
        self.window_size += 1;
        if corrupt {
            self.stats.records_corrupt_total += 1;
            self.corrupt_window += 1;
        }
        if self.window_size >= CORRUPT_WINDOW_SIZE {
            let ratio = self.corrupt_window as f32 / self.window_size as f32;
            self.window_size = 0;
            self.corrupt_window = 0;
            if ratio > self.cfg.max_corrupt_ratio {
                return Err(AetherError::Parse("corrupt ratio exceeded".to_string()));
            }
        }
        Ok(())
    }

    /// Returns `Ok(Some(frame))` on a validated record, `Ok(None)` for an
    /// in-band empty/EOF indication, or `Err` on a fatal failure.
    pub fn next(&mut self) -> Result<Option<Frame>> {
        loop {
            self.detect_rotation()?;

            let raw = match self.read_raw_line() {
                Ok(r) => r,
                Err(e) => {
                    self.stats.consecutive_errors_current += 1;
                    if self.stats.consecutive_errors_current > self.cfg.max_consecutive_errors {
                        return Err(AetherError::Io(e));
                    }
                    continue;
                }
            };

            let line = match raw {
                RawLine::Eof => {
                    self.at_eof = true;
                    return Ok(None);
                }
                RawLine::Empty => {
                    self.at_eof = false;
                    return Ok(None);
                }
                RawLine::Line(l) => l,
            };

            if line.trim().is_empty() {
                continue;
            }

            let result = if self.cfg.format == "csv" {
                parse_csv_record(&line)
            } else {
                parse_jsonl_record(&line)
            };

            if result.corrupt {
                self.note_consumed(true)?;
                continue;
            }

            let frame = result.frame.unwrap();
            if !frame.is_shape_consistent() {
                self.note_consumed(true)?;
                continue;
            }

            self.note_consumed(false)?;
            self.stats.records_total += 1;
            self.stats.consecutive_errors_current = 0;
            self.last_timestamp_ns = frame.timestamp_ns;
            self.write_checkpoint();
            return Ok(Some(frame));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_lines(dir: &tempfile::TempDir, name: &str, lines: &[String]) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        for line in lines {
            writeln!(f, "{line}").unwrap();
        }
        path
    }

    fn csv_line(ts: u64) -> String {
        format!("{ts},5800000000,1,1,2,0.1;0.2,0.0;0.0")
    }

    #[test]
    fn reads_single_valid_frame() {
        let dir = tempdir().unwrap();
        let path = write_lines(&dir, "stream.csv", &[csv_line(1)]);
        let cfg = IoConfig {
            path: path.to_string_lossy().to_string(),
            checkpoint_path: dir.path().join("ckpt").to_string_lossy().to_string(),
            ..IoConfig::default()
        };
        let mut reader = RecoveryStreamReader::open(cfg).unwrap();
        let frame = reader.next().unwrap().unwrap();
        assert_eq!(frame.timestamp_ns, 1);
        assert_eq!(reader.stats().records_total, 1);
    }

    #[test]
    fn corruption_threshold_stops_stream() {
        let dir = tempdir().unwrap();
        let mut lines: Vec<String> = (0..30).map(|_| "garbage,line".to_string()).collect();
        lines.extend((0..70).map(csv_line));
        let path = write_lines(&dir, "stream.csv", &lines);
        let cfg = IoConfig {
            path: path.to_string_lossy().to_string(),
            checkpoint_path: dir.path().join("ckpt").to_string_lossy().to_string(),
            max_corrupt_ratio: 0.25,
            ..IoConfig::default()
        };
        let mut reader = RecoveryStreamReader::open(cfg).unwrap();
        let mut err = None;
        for _ in 0..100 {
            match reader.next() {
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(e) => {
                    err = Some(e);
                    break;
                }
            }
        }
        assert!(err.is_some());
    }

    #[test]
    fn lenient_threshold_yields_remaining_frames() {
        let dir = tempdir().unwrap();
        let mut lines: Vec<String> = (0..30).map(|_| "garbage,line".to_string()).collect();
        lines.extend((0..70).map(csv_line));
        let path = write_lines(&dir, "stream.csv", &lines);
        let cfg = IoConfig {
            path: path.to_string_lossy().to_string(),
            checkpoint_path: dir.path().join("ckpt").to_string_lossy().to_string(),
            max_corrupt_ratio: 0.5,
            ..IoConfig::default()
        };
        let mut reader = RecoveryStreamReader::open(cfg).unwrap();
        let mut count = 0;
        loop {
            match reader.next().unwrap() {
                Some(_) => count += 1,
                None => break,
            }
        }
        assert_eq!(count, 70);
    }
}
