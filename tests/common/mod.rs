use aethersense::config::Config;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn csv_line(ts: u64, rx: u8, tx: u8, sc: u16, re: &[f32], im: &[f32]) -> String {
    let re_list = re.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(";");
    let im_list = im.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(";");
    format!("{ts},5800000000,{rx},{tx},{sc},{re_list},{im_list}")
}

pub fn write_lines(path: &Path, lines: &[String]) {
    let mut f = File::create(path).unwrap();
    for line in lines {
        writeln!(f, "{line}").unwrap();
    }
}

/// A config pointed at `path`/`checkpoint`, with jitter rejection disabled
/// so tests can drive the pipeline with synthetic, evenly-spaced frames.
pub fn test_config(path: &Path, checkpoint: &Path, window_frames: usize) -> Config {
    let mut cfg = Config::default();
    cfg.io.path = path.to_string_lossy().to_string();
    cfg.io.checkpoint_path = checkpoint.to_string_lossy().to_string();
    cfg.dsp.window_frames = window_frames;
    cfg.dsp.resampling.reject_jitter_ratio = 1.0;
    cfg
}

pub fn tmp_paths() -> (tempfile::TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stream.csv");
    let checkpoint = dir.path().join("checkpoint");
    (dir, path, checkpoint)
}
