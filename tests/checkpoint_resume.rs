#[path = "common/mod.rs"]
mod common;

use aethersense::io::RecoveryStreamReader;
use common::{csv_line, test_config, tmp_paths, write_lines};

#[test]
fn reader_resumes_from_checkpoint_after_reopen() {
    let (_dir, path, checkpoint) = tmp_paths();
    let lines: Vec<String> = (0..5u64).map(|i| csv_line(i, 1, 1, 2, &[0.1, 0.2], &[0.0, 0.0])).collect();
    write_lines(&path, &lines);

    let mut cfg = test_config(&path, &checkpoint, 16);
    {
        let mut reader = RecoveryStreamReader::open(cfg.io.clone()).unwrap();
        // Consume the first two records, each write updates the checkpoint.
        reader.next().unwrap();
        reader.next().unwrap();
    }

    cfg.io.start_position = "checkpoint".to_string();
    let mut resumed = RecoveryStreamReader::open(cfg.io.clone()).unwrap();
    assert_eq!(resumed.stats().checkpoint_resume_total, 1);

    let frame = resumed.next().unwrap().unwrap();
    assert_eq!(frame.timestamp_ns, 2, "resumed reader should continue after the 2 consumed records");
}
