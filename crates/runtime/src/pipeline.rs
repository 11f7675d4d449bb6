//! Line reader → record parser → top-N selector.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use hs_core::{parse_record, ScoredId};
use hs_views::{Offer, TopNConfig, TopNSelector};
use tracing::{debug, info, warn};

use crate::metrics::MetricsRegistry;
use crate::RunError;

const BOM: char = '\u{feff}';

/// Open the records file, or stdin for `-`.
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead>, RunError> {
    if path == Path::new("-") {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let access = |source: io::Error| RunError::InputAccess {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(access)?;
    // A directory opens fine on Linux and only fails on the first read.
    if file.metadata().map_err(access)?.is_dir() {
        return Err(access(io::Error::new(io::ErrorKind::InvalidInput, "is a directory")));
    }
    Ok(Box::new(BufReader::new(file)))
}

/// Stream `reader` through the selector and return the finalized result.
///
/// The first invalid record aborts the run; an empty line is an invalid record.
pub fn run_selection<R: BufRead>(
    reader: R,
    cfg: TopNConfig,
    metrics: &MetricsRegistry,
) -> Result<Vec<ScoredId>, RunError> {
    info!(limit = cfg.limit, policy = ?cfg.policy, "selection starting");
    let mut selector = TopNSelector::new(cfg);

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let mut line = line.map_err(|source| RunError::Read { line: line_no, source })?;
        metrics.inc_lines_read(1);
        if line_no == 1 && line.starts_with(BOM) {
            line.replace_range(..BOM.len_utf8(), "");
        }

        let pair = match parse_record(&line) {
            Ok(pair) => pair,
            Err(source) => {
                warn!(line = line_no, error = %source, "rejecting record");
                return Err(RunError::Parse { line: line_no, text: line, source });
            }
        };
        metrics.inc_records_parsed(1);

        match selector.offer(pair) {
            Offer::Inserted => {}
            Offer::Replaced => metrics.inc_duplicates_replaced(1),
            Offer::Evicted { score } => {
                debug!(%score, "evicted lowest score");
                metrics.inc_scores_evicted(1);
            }
            Offer::Rejected => metrics.inc_scores_rejected(1),
            Offer::Halted => {}
        }
        metrics.record_result_peak(selector.len() as u64);

        if selector.is_halted() {
            info!(line = line_no, "result set full, ignoring remaining input");
            break;
        }
    }

    Ok(selector.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hs_core::ParseError;
    use hs_views::ScanPolicy;
    use serde_json::json;
    use std::io::Cursor;

    fn run(input: &str, cfg: TopNConfig) -> (Result<Vec<ScoredId>, RunError>, MetricsRegistry) {
        let metrics = MetricsRegistry::default();
        let result = run_selection(Cursor::new(input.to_string()), cfg, &metrics);
        (result, metrics)
    }

    fn summary(out: &[ScoredId]) -> Vec<(f64, serde_json::Value)> {
        out.iter().map(|p| (p.score.value(), p.id.clone())).collect()
    }

    #[test]
    fn resolves_duplicates_to_last_id() {
        let input = "5:{\"id\":1}\n5:{\"id\":2}\n3:{\"id\":3}\n";
        let (result, metrics) = run(input, TopNConfig::new(2));
        let out = result.unwrap();
        assert_eq!(summary(&out), vec![(5.0, json!(2)), (3.0, json!(3))]);
        let snap = metrics.snapshot();
        assert_eq!(snap.records_parsed, 3);
        assert_eq!(snap.duplicates_replaced, 1);
    }

    #[test]
    fn does_not_assume_sorted_input() {
        let input = "1:{\"id\":\"a\"}\n-7:{\"id\":\"b\"}\n10.5:{\"id\":\"c\"}\n3:{\"id\":\"d\"}\n10.5:{\"id\":\"e\"}\n0:{\"id\":\"f\"}\n";
        let (result, metrics) = run(input, TopNConfig::new(2));
        assert_eq!(summary(&result.unwrap()), vec![(10.5, json!("e")), (3.0, json!("d"))]);
        let snap = metrics.snapshot();
        assert_eq!(snap.scores_evicted, 2);
        assert_eq!(snap.scores_rejected, 1);
        assert_eq!(snap.result_peak, 2);
    }

    #[test]
    fn stop_at_capacity_ignores_later_lines() {
        let input = "1:{\"id\":\"a\"}\n2:{\"id\":\"b\"}\n1:{\"id\":\"late\"}\nnot a record\n";
        let cfg = TopNConfig::new(2).with_policy(ScanPolicy::StopAtCapacity);
        let (result, metrics) = run(input, cfg);
        assert_eq!(summary(&result.unwrap()), vec![(2.0, json!("b")), (1.0, json!("a"))]);
        assert_eq!(metrics.snapshot().lines_read, 2);
    }

    #[test]
    fn accepts_crlf_line_endings() {
        let input = "4:{\"id\":\"x\"}\r\n2:{\"id\":\"y\"}\r\n";
        let (result, _) = run(input, TopNConfig::new(5));
        assert_eq!(summary(&result.unwrap()), vec![(4.0, json!("x")), (2.0, json!("y"))]);
    }

    #[test]
    fn blank_line_is_invalid_json() {
        for input in ["4:{\"id\":\"x\"}\n\n2:{\"id\":\"y\"}\n", "4:{\"id\":\"x\"}\n   \n"] {
            let (result, _) = run(input, TopNConfig::new(5));
            assert!(
                matches!(
                    result,
                    Err(RunError::Parse { line: 2, source: ParseError::InvalidJson { .. }, .. })
                ),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn strips_byte_order_mark_on_first_line() {
        let input = "\u{feff}7:{\"id\":\"bom\"}\n3:{\"id\":\"plain\"}\n";
        let (result, _) = run(input, TopNConfig::new(2));
        assert_eq!(summary(&result.unwrap()), vec![(7.0, json!("bom")), (3.0, json!("plain"))]);
    }

    #[test]
    fn byte_order_mark_after_first_line_is_rejected() {
        let input = "7:{\"id\":1}\n\u{feff}3:{\"id\":2}\n";
        let (result, _) = run(input, TopNConfig::new(2));
        assert!(matches!(
            result,
            Err(RunError::Parse { line: 2, source: ParseError::InvalidScore { .. }, .. })
        ));
    }

    #[test]
    fn fails_fast_on_invalid_json() {
        let input = "5:{\"id\":1}\nabc:{not valid json}\n9:{\"id\":2}\n";
        let (result, metrics) = run(input, TopNConfig::new(3));
        match result.unwrap_err() {
            RunError::Parse { line, text, source: ParseError::InvalidJson { .. } } => {
                assert_eq!(line, 2);
                assert_eq!(text, "abc:{not valid json}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(metrics.snapshot().records_parsed, 1);
    }

    #[test]
    fn fails_fast_on_missing_id() {
        let (result, _) = run("10:{\"x\":1}\n", TopNConfig::new(1));
        assert!(matches!(
            result,
            Err(RunError::Parse { line: 1, source: ParseError::MissingId { .. }, .. })
        ));
    }

    #[test]
    fn reports_non_utf8_input_as_read_error() {
        let metrics = MetricsRegistry::default();
        let bytes: Vec<u8> = b"1:{\"id\":1}\n2:{\"id\":\xff}\n".to_vec();
        let result = run_selection(Cursor::new(bytes), TopNConfig::new(2), &metrics);
        assert!(matches!(result, Err(RunError::Read { line: 2, .. })));
    }

    #[test]
    fn missing_file_is_input_access_error() {
        let err = open_input(Path::new("/definitely/not/here.data")).err().unwrap();
        assert!(matches!(err, RunError::InputAccess { .. }));
    }

    #[test]
    fn directory_is_input_access_error() {
        let dir = std::env::temp_dir();
        match open_input(&dir).err().unwrap() {
            RunError::InputAccess { path, source } => {
                assert_eq!(path, dir);
                assert_eq!(source.kind(), io::ErrorKind::InvalidInput);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
