//! Human-readable classification summaries.

use crate::constants::confidence::DECIMAL_PLACES;
use crate::inference::ClassificationResult;
use std::io::{self, Write};
use std::path::Path;

/// Write a classification summary for one input.
///
/// ```text
/// reef.jpg: auto-flagged-invasive (invasive: yes, threshold 0.6000)
///   1. lionfish     0.9100  Red Lionfish (Pterois volitans) [invasive]
///   2. manatee      0.0500  unknown species
/// ```
pub fn write_summary<W: Write>(
    writer: &mut W,
    file: &Path,
    result: &ClassificationResult,
) -> io::Result<()> {
    let invasive = match result.invasive {
        Some(true) => "yes",
        Some(false) => "no",
        None => "unknown",
    };
    writeln!(
        writer,
        "{}: {} (invasive: {invasive}, threshold {:.prec$})",
        file.display(),
        result.decision,
        result.threshold,
        prec = DECIMAL_PLACES
    )?;

    if result.predictions.is_empty() {
        writeln!(writer, "  no predictions")?;
        return Ok(());
    }

    let width = result
        .predictions
        .iter()
        .map(|p| p.label.chars().count())
        .max()
        .unwrap_or(0);

    for (rank, prediction) in result.predictions.iter().enumerate() {
        let species = prediction.species.as_ref().map_or_else(
            || "unknown species".to_string(),
            |s| {
                let status = if s.is_invasive { "invasive" } else { "native" };
                format!("{} ({}) [{status}]", s.common_name, s.scientific_name)
            },
        );
        writeln!(
            writer,
            "  {}. {:<width$}  {:.prec$}  {species}",
            rank + 1,
            prediction.label,
            prediction.score,
            prec = DECIMAL_PLACES
        )?;
    }

    Ok(())
}

/// Print a classification summary to stdout.
pub fn print_summary(file: &Path, result: &ClassificationResult) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_summary(&mut lock, file, result)
}
