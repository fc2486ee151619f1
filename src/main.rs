use std::path::PathBuf;
use std::process::ExitCode;

use aethersense::config::Config;
use aethersense::io::RecoveryStreamReader;
use aethersense::runtime::{Pipeline, RuntimeMetrics};
use aethersense::util::init_tracing_once;

struct Args {
    config_path: Option<String>,
    input_override: Option<String>,
    format_override: Option<String>,
}

fn parse_args() -> Args {
    let mut args = Args {
        config_path: None,
        input_override: None,
        format_override: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => args.config_path = it.next(),
            "--input" => args.input_override = it.next(),
            "--format" => args.format_override = it.next(),
            _ => {}
        }
    }
    args
}

const REPORT_EVERY_FRAMES: u64 = 50;

fn run() -> ExitCode {
    init_tracing_once();
    let args = parse_args();

    let Some(config_path) = args.config_path else {
        eprintln!("--config is required");
        return ExitCode::from(2);
    };

    let mut cfg = match Config::from_json_file(&PathBuf::from(&config_path)) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Config error: {e}");
            return ExitCode::from(3);
        }
    };

    if let Some(input) = args.input_override {
        cfg.io.path = input;
    }
    if let Some(format) = args.format_override {
        cfg.io.format = format;
    }

    if let Err(e) = cfg.validate(true) {
        eprintln!("Config validation error: {e}");
        return ExitCode::from(4);
    }

    let mut reader = match RecoveryStreamReader::open(cfg.io.clone()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Reader error: {e}");
            return ExitCode::from(5);
        }
    };

    let mut pipeline = Pipeline::new(cfg.clone());
    let mut metrics = RuntimeMetrics::new();
    let mut frames_seen: u64 = 0;
    let mut present_count: u64 = 0;
    let mut energy_sum: f64 = 0.0;

    loop {
        let frame = match reader.next() {
            Ok(Some(frame)) => frame,
            // True EOF ends the run; a tail-mode "nothing new yet" keeps polling.
            Ok(None) if reader.at_eof() => break,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("Read error: {e}");
                return ExitCode::from(6);
            }
        };

        let decision = match pipeline.process(&frame, &mut metrics) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("Pipeline error: {e}");
                return ExitCode::from(7);
            }
        };

        let Some(decision) = decision else {
            continue;
        };

        frames_seen += 1;
        energy_sum += decision.energy_motion as f64;
        if decision.present {
            present_count += 1;
        }

        if frames_seen % REPORT_EVERY_FRAMES == 0 {
            report(frames_seen, energy_sum, present_count, &metrics);
        }
    }

    if frames_seen > 0 {
        report(frames_seen, energy_sum, present_count, &metrics);
    }

    ExitCode::SUCCESS
}

fn report(frames: u64, energy_sum: f64, present_count: u64, metrics: &RuntimeMetrics) {
    let avg_energy = energy_sum / frames as f64;
    let present_rate = present_count as f64 / frames as f64;
    tracing::info!(
        frames,
        avg_energy,
        present_rate,
        p50_us = metrics.percentile(50.0),
        p99_us = metrics.percentile(99.0),
        "pipeline progress"
    );
}

fn main() -> ExitCode {
    run()
}
