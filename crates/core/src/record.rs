//! Parsing of `<score>:<json-object>` record lines.

use serde_json::{Map, Value};

use crate::{ParseError, Score, ScoredId};

/// Parse one record line into its score and `id`.
///
/// The line is split at the first `:`; the rest of the line, colons included,
/// is the JSON payload. The payload is validated before the score so a line
/// that is broken in both places reports the payload.
pub fn parse_record(line: &str) -> Result<ScoredId, ParseError> {
    let (raw_score, payload) = line.split_once(':').unwrap_or((line, ""));

    let mut object: Map<String, Value> =
        serde_json::from_str(payload).map_err(|source| ParseError::InvalidJson {
            payload: payload.to_string(),
            source,
        })?;

    let id = object.remove("id").ok_or_else(|| ParseError::MissingId {
        payload: payload.to_string(),
    })?;

    let score = parse_score(raw_score)?;
    Ok(ScoredId { score, id })
}

fn parse_score(raw: &str) -> Result<Score, ParseError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Score::new)
        .ok_or_else(|| ParseError::InvalidScore {
            score: raw.to_string(),
        })
}
