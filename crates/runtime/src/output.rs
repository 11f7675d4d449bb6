use std::io::{self, Write};
use std::str::FromStr;

use hs_core::ScoredId;

use crate::RunError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON array.
    #[default]
    Json,
    /// One compact JSON object per line.
    Jsonl,
    /// `<score>\t<id>` per line.
    Text,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "jsonl" => Ok(Self::Jsonl),
            "text" => Ok(Self::Text),
            other => Err(format!("unknown output format `{other}`")),
        }
    }
}

/// Write the finalized results, highest score first.
pub fn write_results<W: Write>(mut out: W, results: &[ScoredId], format: OutputFormat) -> Result<(), RunError> {
    render(&mut out, results, format)
        .and_then(|()| out.flush())
        .map_err(RunError::Output)
}

fn render<W: Write>(out: &mut W, results: &[ScoredId], format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, results)?;
            writeln!(out)
        }
        OutputFormat::Jsonl => {
            for pair in results {
                serde_json::to_writer(&mut *out, pair)?;
                writeln!(out)?;
            }
            Ok(())
        }
        OutputFormat::Text => {
            for pair in results {
                writeln!(out, "{}\t{}", pair.score, pair.id)?;
            }
            Ok(())
        }
    }
}
