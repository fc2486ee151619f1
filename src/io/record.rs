//! CSV/JSONL record grammar parsing, isolated from the stream state machine
//! so corruption can be classified without touching file handles.

use crate::types::{Complex32, Frame};

/// Outcome of parsing one line: either a `Frame`, or `corrupt` with a
/// human-readable reason. Never panics on malformed input.
pub struct RecoveryResult {
    pub frame: Option<Frame>,
    pub corrupt: bool,
    pub error: Option<String>,
}

impl RecoveryResult {
    fn corrupt(msg: impl Into<String>) -> Self {
        Self {
            frame: None,
            corrupt: true,
            error: Some(msg.into()),
        }
    }

    fn ok(frame: Frame) -> Self {
        Self {
            frame: Some(frame),
            corrupt: false,
            error: None,
        }
    }
}

fn parse_float_list(value: &str, delim: char) -> Option<Vec<f32>> {
    value.split(delim).map(|tok| tok.trim().parse::<f32>().ok()).collect()
}

/// `ts_ns,freq_hz,rx,tx,sc,re0;re1;...,im0;im1;...`
pub fn parse_csv_record(line: &str) -> RecoveryResult {
    let cols: Vec<&str> = line.split(',').collect();
    if cols.len() != 7 {
        return RecoveryResult::corrupt("CSV line must have 7 columns");
    }

    let timestamp_ns = match cols[0].trim().parse::<u64>() {
        Ok(v) => v,
        Err(_) => return RecoveryResult::corrupt("invalid timestamp_ns"),
    };
    let center_freq_hz = match cols[1].trim().parse::<u64>() {
        Ok(v) => v,
        Err(_) => return RecoveryResult::corrupt("invalid center_freq_hz"),
    };
    let rx_count = match cols[2].trim().parse::<u8>() {
        Ok(v) => v,
        Err(_) => return RecoveryResult::corrupt("invalid rx"),
    };
    let tx_count = match cols[3].trim().parse::<u8>() {
        Ok(v) => v,
        Err(_) => return RecoveryResult::corrupt("invalid tx"),
    };
    let subcarrier_count = match cols[4].trim().parse::<u16>() {
        Ok(v) => v,
        Err(_) => return RecoveryResult::corrupt("invalid subcarrier_count"),
    };

    let re = match parse_float_list(cols[5], ';') {
        Some(v) => v,
        None => return RecoveryResult::corrupt("invalid float token in re_list"),
    };
    let im = match parse_float_list(cols[6], ';') {
        Some(v) => v,
        None => return RecoveryResult::corrupt("invalid float token in im_list"),
    };

    let expected = rx_count as usize * tx_count as usize * subcarrier_count as usize;
    if re.len() != expected || im.len() != expected {
        return RecoveryResult::corrupt("data_re/data_im length mismatch");
    }

    let data = re
        .into_iter()
        .zip(im)
        .map(|(r, i)| Complex32::new(r, i))
        .collect();

    RecoveryResult::ok(Frame {
        timestamp_ns,
        center_freq_hz,
        rx_count,
        tx_count,
        subcarrier_count,
        data,
    })
}

/// Permissive JSONL parsing: a single-line JSON object carrying
/// `timestamp_ns, center_freq_hz, rx, tx, subcarrier_count, data_re, data_im`.
pub fn parse_jsonl_record(line: &str) -> RecoveryResult {
    let value: serde_json::Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(_) => return RecoveryResult::corrupt("JSONL is not valid JSON"),
    };

    let get_u64 = |key: &str| value.get(key).and_then(|v| v.as_u64());
    let get_u64_loose = |key: &str| {
        value
            .get(key)
            .and_then(|v| v.as_u64().or_else(|| v.as_i64().map(|i| i as u64)))
    };

    let timestamp_ns = match get_u64("timestamp_ns") {
        Some(v) => v,
        None => return RecoveryResult::corrupt("missing/invalid timestamp_ns"),
    };
    let center_freq_hz = match get_u64("center_freq_hz") {
        Some(v) => v,
        None => return RecoveryResult::corrupt("missing/invalid center_freq_hz"),
    };
    let rx_count = match get_u64_loose("rx") {
        Some(v) if v <= u8::MAX as u64 => v as u8,
        _ => return RecoveryResult::corrupt("missing/invalid rx"),
    };
    let tx_count = match get_u64_loose("tx") {
        Some(v) if v <= u8::MAX as u64 => v as u8,
        _ => return RecoveryResult::corrupt("missing/invalid tx"),
    };
    let subcarrier_count = match get_u64_loose("subcarrier_count") {
        Some(v) if v <= u16::MAX as u64 => v as u16,
        _ => return RecoveryResult::corrupt("missing/invalid subcarrier_count"),
    };

    let as_f32_array = |key: &str| -> Option<Vec<f32>> {
        value.get(key)?.as_array()?.iter().map(|v| v.as_f64().map(|f| f as f32)).collect()
    };

    let re = match as_f32_array("data_re") {
        Some(v) => v,
        None => return RecoveryResult::corrupt("JSONL missing/invalid data_re"),
    };
    let im = match as_f32_array("data_im") {
        Some(v) => v,
        None => return RecoveryResult::corrupt("JSONL missing/invalid data_im"),
    };

    let expected = rx_count as usize * tx_count as usize * subcarrier_count as usize;
    if re.len() != expected || im.len() != expected {
        return RecoveryResult::corrupt("JSONL data length mismatch");
    }

    let data = re
        .into_iter()
        .zip(im)
        .map(|(r, i)| Complex32::new(r, i))
        .collect();

    RecoveryResult::ok(Frame {
        timestamp_ns,
        center_freq_hz,
        rx_count,
        tx_count,
        subcarrier_count,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_csv_frame() {
        let line = "1000000000,5800000000,1,1,2,0.1;0.2,0.0;0.0";
        let result = parse_csv_record(line);
        assert!(!result.corrupt);
        let frame = result.frame.unwrap();
        assert_eq!(frame.timestamp_ns, 1_000_000_000);
        assert_eq!(frame.center_freq_hz, 5_800_000_000);
        assert_eq!(frame.rx_count, 1);
        assert_eq!(frame.tx_count, 1);
        assert_eq!(frame.subcarrier_count, 2);
        assert_eq!(frame.data, vec![Complex32::new(0.1, 0.0), Complex32::new(0.2, 0.0)]);
    }

    #[test]
    fn rejects_wrong_column_count() {
        assert!(parse_csv_record("1,2,3").corrupt);
    }

    #[test]
    fn rejects_length_mismatch() {
        assert!(parse_csv_record("1,2,1,1,2,0.1,0.0").corrupt);
    }

    #[test]
    fn parses_jsonl_frame() {
        let line = r#"{"timestamp_ns":1,"center_freq_hz":2,"rx":1,"tx":1,"subcarrier_count":2,"data_re":[0.1,0.2],"data_im":[0.0,0.0]}"#;
        let result = parse_jsonl_record(line);
        assert!(!result.corrupt);
    }

    #[test]
    fn jsonl_missing_key_is_corrupt() {
        let line = r#"{"timestamp_ns":1}"#;
        assert!(parse_jsonl_record(line).corrupt);
    }
}
