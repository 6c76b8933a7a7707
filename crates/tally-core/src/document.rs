//! Format Extractor - converts supported documents into canonical plain text
//!
//! Dispatches on declared MIME type to one of four converters (PDF,
//! word-processing, spreadsheet, delimited-text). No layout reconstruction
//! is attempted anywhere; the output is a flat UTF-8 string ready for the
//! structured field extractor.

use std::io::{Cursor, Read};

use async_trait::async_trait;
use calamine::{open_workbook_auto_from_rs, Reader as SpreadsheetReader};
use csv::ReaderBuilder;
use quick_xml::events::Event;
use tracing::debug;

use crate::error::{Error, Result};

/// Supported document formats, keyed by declared MIME type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    WordDocument,
    Spreadsheet,
    DelimitedText,
}

impl DocumentFormat {
    /// Map a declared MIME type onto a format.
    ///
    /// Returns None for anything outside the supported set.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime
            .split(';')
            .next()
            .unwrap_or(mime)
            .trim()
            .to_ascii_lowercase();

        match mime.as_str() {
            "application/pdf" => Some(DocumentFormat::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(DocumentFormat::WordDocument)
            }
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            | "application/vnd.ms-excel" => Some(DocumentFormat::Spreadsheet),
            "text/csv" | "application/csv" => Some(DocumentFormat::DelimitedText),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::WordDocument => "word_document",
            DocumentFormat::Spreadsheet => "spreadsheet",
            DocumentFormat::DelimitedText => "delimited_text",
        }
    }
}

/// Convert document bytes with a declared MIME type into canonical text.
pub fn extract_text_from_mime(bytes: &[u8], mime: &str) -> Result<String> {
    let format = DocumentFormat::from_mime(mime)
        .ok_or_else(|| Error::UnsupportedFormat(mime.to_string()))?;
    extract_text(bytes, format)
}

/// Convert document bytes of a known format into canonical text.
pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> Result<String> {
    let text = match format {
        DocumentFormat::Pdf => extract_pdf(bytes)?,
        DocumentFormat::WordDocument => extract_word(bytes)?,
        DocumentFormat::Spreadsheet => extract_spreadsheet(bytes)?,
        DocumentFormat::DelimitedText => extract_delimited(bytes)?,
    };
    debug!(
        format = format.as_str(),
        chars = text.len(),
        "Extracted document text"
    );
    Ok(text)
}

/// Extract the embedded text stream from a PDF, in document order.
fn extract_pdf(bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| Error::Decode(format!("PDF extraction failed: {}", e)))
}

/// Extract body text from an OOXML word-processing document.
///
/// The container is a zip archive; the body lives in word/document.xml.
/// Text nodes inside w:t runs are collected, one line per w:p paragraph.
fn extract_word(bytes: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| Error::Decode(format!("Not a word-processing container: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| Error::Decode(format!("Missing document body: {}", e)))?
        .read_to_string(&mut xml)
        .map_err(|e| Error::Decode(format!("Unreadable document body: {}", e)))?;

    let mut reader = quick_xml::Reader::from_str(&xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"w:t" => in_run_text = true,
            Ok(Event::End(ref e)) if e.name().as_ref() == b"w:t" => in_run_text = false,
            Ok(Event::End(ref e)) if e.name().as_ref() == b"w:p" => {
                if !text.ends_with('\n') && !text.is_empty() {
                    text.push('\n');
                }
            }
            Ok(Event::Text(e)) if in_run_text => {
                let content = e
                    .unescape()
                    .map_err(|e| Error::Decode(format!("Malformed document XML: {}", e)))?;
                text.push_str(&content);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(Error::Decode(format!("Malformed document XML: {}", e))),
        }
    }

    Ok(text.trim_end().to_string())
}

/// Render every sheet of a workbook as delimited text, in workbook order.
///
/// Sheets are separated by one blank line. The workbook container is
/// detected from its magic bytes, so both OOXML and legacy binary
/// workbooks decode here.
fn extract_spreadsheet(bytes: &[u8]) -> Result<String> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| Error::Decode(format!("Not a spreadsheet: {}", e)))?;

    let names = workbook.sheet_names().to_owned();
    let mut sheets = Vec::with_capacity(names.len());

    for name in names {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| Error::Decode(format!("Unreadable sheet {}: {}", name, e)))?;

        let mut lines = Vec::new();
        for row in range.rows() {
            let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            lines.push(cells.join(","));
        }
        sheets.push(lines.join("\n"));
    }

    Ok(sheets.join("\n\n"))
}

/// Re-serialize a delimited-text document as flat key/value fragments.
///
/// Each data row becomes one line of `header: value` pairs, in original
/// row order.
fn extract_delimited(bytes: &[u8]) -> Result<String> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = rdr.headers()?.clone();
    let mut lines = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let fragment: Vec<String> = headers
            .iter()
            .enumerate()
            .filter_map(|(i, header)| record.get(i).map(|value| format!("{}: {}", header, value)))
            .collect();
        lines.push(fragment.join(", "));
    }

    Ok(lines.join("\n"))
}

/// Collaborator that fetches raw document bytes by URL.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch the document, surfacing transport/storage failures as
    /// `SourceUnavailable`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// HTTP document source
#[derive(Clone, Default)]
pub struct HttpDocumentSource {
    http_client: reqwest::Client,
}

impl HttpDocumentSource {
    pub fn new() -> Self {
        Self {
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::SourceUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::SourceUnavailable(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::SourceUnavailable(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
