//! CSV reader construction, delimiter parsing and input decoding.
//!
//! Price lists are read as raw bytes and decoded with the configured
//! `encoding_rs` encoding, so files saved by spreadsheet tools in legacy code
//! pages (`windows-1251` is common for Russian price lists) load without
//! conversion.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use encoding_rs::{Encoding, UTF_8};

use crate::error::{PriceError, Result};

pub const DEFAULT_DELIMITER: u8 = b',';

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    match label {
        Some(value) => Encoding::for_label(value.trim().as_bytes()).ok_or_else(|| {
            PriceError::Configuration(format!("Unknown input encoding '{value}'"))
        }),
        None => Ok(UTF_8),
    }
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(false)
        .from_reader(reader)
}

pub fn open_csv_reader_from_path(
    path: &Path,
    delimiter: u8,
) -> Result<csv::Reader<BufReader<File>>> {
    let file = File::open(path).map_err(|err| PriceError::io(path, err))?;
    Ok(open_csv_reader(BufReader::new(file), delimiter))
}

/// Decodes one field. A UTF-8 byte-order mark at the start is dropped; any
/// byte sequence invalid in `encoding` is an error.
pub fn decode_bytes(
    bytes: &[u8],
    encoding: &'static Encoding,
) -> std::result::Result<String, String> {
    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        Err(format!("text is not valid {}", encoding.name()))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(
    record: &csv::ByteRecord,
    encoding: &'static Encoding,
) -> std::result::Result<Vec<String>, String> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

pub fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}

pub fn parse_delimiter(value: &str) -> std::result::Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
