// src/csv.rs
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::config::consts::{CSV_HEADER, CSV_SEP};
use crate::file::ensure_parent;
use crate::scrape::Sample;

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer.
pub fn write_row<W: Write, S: AsRef<str>>(mut w: W, row: &[S], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        let cell = cell.as_ref();
        if !first { write!(w, "{}", sep)?; } else { first = false; }
        if needs_quotes(cell, sep) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/* ---------------- Session output ---------------- */

/// Append-only sample sink. The header goes out when the writer is built and
/// never again; every row is flushed so readers see it immediately.
pub struct SampleWriter<W: Write> {
    out: W,
    rows: usize,
}

impl SampleWriter<BufWriter<File>> {
    /// Create/truncate `path` (and its parent dir).
    pub fn create(path: &Path) -> io::Result<Self> {
        ensure_parent(path)?;
        let file = File::create(path)?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> SampleWriter<W> {
    pub fn new(mut out: W) -> io::Result<Self> {
        write_row(&mut out, &CSV_HEADER, CSV_SEP)?;
        out.flush()?;
        Ok(Self { out, rows: 0 })
    }

    pub fn append(&mut self, sample: &Sample) -> io::Result<()> {
        write_row(&mut self.out, &sample.to_row(), CSV_SEP)?;
        self.out.flush()?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written so far (header excluded).
    pub fn rows(&self) -> usize { self.rows }

    pub fn into_inner(self) -> W { self.out }
}
