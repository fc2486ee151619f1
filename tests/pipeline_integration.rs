#[path = "common/mod.rs"]
mod common;

use aethersense::io::RecoveryStreamReader;
use aethersense::runtime::{Pipeline, RuntimeMetrics};
use common::{csv_line, test_config, tmp_paths, write_lines};

#[test]
fn full_window_of_csv_frames_yields_a_decision() {
    let (_dir, path, checkpoint) = tmp_paths();
    let window_frames = 16usize;
    let lines: Vec<String> = (0..window_frames as u64)
        .map(|i| csv_line(i * 50_000_000, 1, 1, 4, &[0.1, 0.2, 0.3, 0.4], &[0.0, 0.0, 0.0, 0.0]))
        .collect();
    write_lines(&path, &lines);

    let cfg = test_config(&path, &checkpoint, window_frames);
    let mut reader = RecoveryStreamReader::open(cfg.io.clone()).unwrap();
    let mut pipeline = Pipeline::new(cfg);
    let mut metrics = RuntimeMetrics::new();

    let mut last_decision = None;
    loop {
        match reader.next().unwrap() {
            Some(frame) => {
                if let Some(d) = pipeline.process(&frame, &mut metrics).unwrap() {
                    last_decision = Some(d);
                }
            }
            None => break,
        }
    }

    let decision = last_decision.expect("a full window should emit exactly one decision");
    assert!(decision.energy_motion >= 0.0);
    assert_eq!(metrics.frames_processed_total, 1);
}

#[test]
fn reader_and_pipeline_report_stats() {
    let (_dir, path, checkpoint) = tmp_paths();
    let lines = vec![
        csv_line(0, 1, 1, 2, &[0.1, 0.2], &[0.0, 0.0]),
        "garbage".to_string(),
        csv_line(50_000_000, 1, 1, 2, &[0.1, 0.2], &[0.0, 0.0]),
    ];
    write_lines(&path, &lines);

    let cfg = test_config(&path, &checkpoint, 16);
    let mut reader = RecoveryStreamReader::open(cfg.io.clone()).unwrap();
    let mut count = 0;
    loop {
        match reader.next().unwrap() {
            Some(_) => count += 1,
            None => break,
        }
    }
    assert_eq!(count, 2);
    assert_eq!(reader.stats().records_corrupt_total, 1);
}
