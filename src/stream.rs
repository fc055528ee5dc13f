//! Stream - decode, clean and re-encode a multi-document manifest.
//!
//! Documents are processed one at a time in input order. Decode and encode
//! failures abort the run; everything else is handled by the rule sets.

use serde::Deserialize;
use std::io::{Read, Write};
use tracing::debug;

use crate::cleaner::{CleanOutcome, Cleaner};
use crate::document::Document;
use crate::error::{CleanupError, EncodeSource, Result};
use crate::value::Value;

/// Output encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// YAML documents separated by `---`.
    #[default]
    Yaml,
    /// One pretty-printed JSON object per document.
    Json,
}

/// Counts gathered while processing a stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    /// Documents decoded from the input.
    pub documents: usize,
    /// Resources cleaned and written.
    pub cleaned: usize,
    /// Documents passed over because they are not resources.
    pub skipped: usize,
}

/// Cleans every document read from `input` and writes the results to
/// `output` in the same order.
pub fn clean_stream<R: Read, W: Write>(
    input: R,
    output: &mut W,
    cleaner: &Cleaner,
    format: OutputFormat,
) -> Result<StreamSummary> {
    let mut summary = StreamSummary::default();

    for (i, de) in serde_yaml::Deserializer::from_reader(input).enumerate() {
        let index = i + 1;
        let value =
            Value::deserialize(de).map_err(|source| CleanupError::Decode { index, source })?;
        summary.documents += 1;

        let Some(mut doc) = Document::from_value(value) else {
            debug!(index, "skipping document that is not a mapping");
            summary.skipped += 1;
            continue;
        };
        if let CleanOutcome::Skipped = cleaner.clean(&mut doc) {
            summary.skipped += 1;
            continue;
        }

        write_document(output, &doc, format, summary.cleaned == 0)?;
        summary.cleaned += 1;
    }

    output.flush().map_err(|source| CleanupError::Io {
        context: "failed to flush output".to_string(),
        source,
    })?;
    Ok(summary)
}

/// Cleans a manifest held in memory and returns the cleaned text.
pub fn clean_str(
    input: &str,
    cleaner: &Cleaner,
    format: OutputFormat,
) -> Result<(String, StreamSummary)> {
    let mut buf = Vec::new();
    let summary = clean_stream(input.as_bytes(), &mut buf, cleaner, format)?;
    Ok((String::from_utf8_lossy(&buf).into_owned(), summary))
}

fn write_document<W: Write>(
    output: &mut W,
    doc: &Document,
    format: OutputFormat,
    first: bool,
) -> Result<()> {
    let encoded = match format {
        OutputFormat::Yaml => serde_yaml::to_string(doc).map_err(EncodeSource::from),
        OutputFormat::Json => serde_json::to_string_pretty(doc)
            .map(|s| s + "\n")
            .map_err(EncodeSource::from),
    }
    .map_err(|source| CleanupError::encode(doc.kind(), doc.name(), source))?;

    let separator = match format {
        OutputFormat::Yaml if !first => "---\n",
        _ => "",
    };
    output
        .write_all(separator.as_bytes())
        .and_then(|_| output.write_all(encoded.as_bytes()))
        .map_err(|source| CleanupError::write(doc.kind(), doc.name(), source))
}
