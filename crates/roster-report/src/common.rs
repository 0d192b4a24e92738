//! Shared CSV settings for roster exports.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use csv::{Terminator, Writer, WriterBuilder};
use roster_model::{Diagnosis, Locale};

/// UTF-8 byte order mark, so spreadsheet tools pick the right encoding.
pub const UTF8_BOM: &str = "\u{feff}";

/// Options shared by every CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub delimiter: u8,
    pub bom: bool,
    pub locale: Locale,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            bom: true,
            locale: Locale::Fr,
        }
    }
}

impl ExportOptions {
    pub fn diagnosis_label(&self, diagnosis: Diagnosis) -> &'static str {
        diagnosis.label_for(self.locale)
    }
}

pub(crate) fn csv_writer<W: Write>(mut out: W, options: &ExportOptions) -> Result<Writer<W>> {
    if options.bom {
        out.write_all(UTF8_BOM.as_bytes()).context("write BOM")?;
    }
    Ok(WriterBuilder::new()
        .delimiter(options.delimiter)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out))
}

pub(crate) fn create_file(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

pub(crate) fn or_empty(value: Option<&String>) -> &str {
    value.map(String::as_str).unwrap_or("")
}
