//! File-level conversion used by the CLI.

use crate::config::Config;
use anyhow::{Context, Result};
use qtfaststart_media::{ConvertOptions, ConvertSummary, ParseOptions, QtFile};
use std::fs;
use std::path::Path;

/// Result of converting one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// `moov` already preceded `mdat`; the input was copied unchanged.
    AlreadyFastStart,
    /// The file was rewritten.
    Converted(ConvertSummary),
}

/// Load `input`, move its `moov` atom to the front and write the result to
/// `output`.
///
/// The output is always written, even when no conversion was needed, so it
/// can be used in place of the input either way. Nothing is written if the
/// input fails to load.
pub fn convert_file(input: &Path, output: &Path, config: &Config) -> Result<Outcome> {
    let data =
        fs::read(input).with_context(|| format!("Failed to open input file: {:?}", input))?;
    tracing::debug!("Read {} bytes from {:?}", data.len(), input);

    let options = ParseOptions::from(&config.parse);
    let mut file = QtFile::with_options(data, options)
        .with_context(|| format!("Failed to load movie: {:?}", input))?;

    tracing::debug!(
        atoms = file.atoms().len(),
        moov_offset = file.moov().offset,
        mdat_offset = file.mdat().offset,
        "Parsed top-level atoms"
    );

    let outcome = if file.is_fast_start_enabled() {
        Outcome::AlreadyFastStart
    } else {
        let summary = file
            .convert_with(ConvertOptions::from(&config.convert))
            .with_context(|| format!("Failed to convert movie: {:?}", input))?;
        tracing::info!(
            shift = summary.shift,
            tables = summary.chunk_offset_tables,
            filler_removed = summary.filler_removed,
            "Moved moov atom to the front"
        );
        Outcome::Converted(summary)
    };

    fs::write(output, file.bytes())
        .with_context(|| format!("Failed to create output file: {:?}", output))?;
    tracing::debug!("Wrote {} bytes to {:?}", file.bytes().len(), output);

    Ok(outcome)
}
