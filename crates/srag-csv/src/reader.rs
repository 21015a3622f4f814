//! Streaming reader for semicolon-delimited extracts.
//!
//! Published extracts are frequently Latin-1 rather than UTF-8. Each field is
//! read as UTF-8 when valid and as Latin-1 otherwise, so an accented
//! municipality name keeps its letters and never costs the row.

use std::{fs::File, io::Read, path::Path};

use csv::{ByteRecord, ByteRecordsIntoIter, ReaderBuilder};

use crate::{RawRow, Result};

/// Lazily yields one [`RawRow`] per extract record.
pub struct RowIter<R: Read> {
  headers: Vec<String>,
  records: ByteRecordsIntoIter<R>,
}

impl<R: Read> RowIter<R> {
  fn to_row(&self, record: &ByteRecord) -> RawRow {
    self
      .headers
      .iter()
      .zip(record.iter())
      .map(|(h, v)| (h.clone(), decode(v)))
      .collect()
  }
}

impl<R: Read> Iterator for RowIter<R> {
  type Item = Result<RawRow>;

  fn next(&mut self) -> Option<Self::Item> {
    let record = self.records.next()?;
    Some(record.map(|r| self.to_row(&r)).map_err(Into::into))
  }
}

/// UTF-8 when valid, otherwise Latin-1 (every byte is its own code point).
fn decode(bytes: &[u8]) -> String {
  match std::str::from_utf8(bytes) {
    Ok(s) => s.to_owned(),
    Err(_) => bytes.iter().copied().map(char::from).collect(),
  }
}

fn builder() -> ReaderBuilder {
  let mut b = ReaderBuilder::new();
  b.delimiter(b';').flexible(true).has_headers(true);
  b
}

/// Start reading an extract from `reader`. The first line must be the header.
pub fn read_rows<R: Read>(reader: R) -> Result<RowIter<R>> {
  let mut rdr = builder().from_reader(reader);
  let headers = rdr
    .byte_headers()?
    .iter()
    .map(|h| decode(h).trim_start_matches('\u{feff}').trim().to_owned())
    .collect();
  Ok(RowIter { headers, records: rdr.into_byte_records() })
}

/// Open the extract at `path`.
pub fn open(path: impl AsRef<Path>) -> Result<RowIter<File>> {
  read_rows(File::open(path)?)
}

/// Count the data records in the extract at `path` without keeping them.
pub fn count_rows(path: impl AsRef<Path>) -> Result<u64> {
  let mut rdr = builder().from_reader(File::open(path)?);
  let mut record = ByteRecord::new();
  let mut count = 0;
  while rdr.read_byte_record(&mut record)? {
    count += 1;
  }
  Ok(count)
}
