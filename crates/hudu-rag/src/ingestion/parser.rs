//! Multi-format file parser
//!
//! Every format has an ordered chain of parser strategies. Strategies are
//! tried in order and the first one that produces text wins; each failed
//! attempt is recorded so the final error names all of them.

use std::io::Read;
use std::path::Path;
use thiserror::Error;

use crate::error::{Error, Result};
use crate::types::{DocumentUnit, FileType};

/// Why a single strategy did not produce units
#[derive(Debug, Error)]
pub enum ParseFailure {
    /// The parser rejected the bytes
    #[error("{0}")]
    Malformed(String),
    /// The file parsed but contained no text
    #[error("no text extracted")]
    NoText,
}

/// A way of turning file bytes into document units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserStrategy {
    /// Per-page text via lopdf
    PdfPages,
    /// Whole-document text via pdf-extract
    PdfText,
    /// One unit per CSV row
    CsvRows,
    /// Paragraph extraction via docx-rs
    DocxParagraphs,
    /// Raw `word/document.xml` text scraping
    DocxXml,
}

impl ParserStrategy {
    /// Ordered strategy chain for a file type
    pub fn chain_for(file_type: FileType) -> &'static [ParserStrategy] {
        match file_type {
            FileType::Pdf => &[ParserStrategy::PdfPages, ParserStrategy::PdfText],
            FileType::Csv => &[ParserStrategy::CsvRows],
            FileType::Doc | FileType::Docx => {
                &[ParserStrategy::DocxParagraphs, ParserStrategy::DocxXml]
            }
            FileType::Image | FileType::Unknown => &[],
        }
    }

    /// Strategy name for logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            ParserStrategy::PdfPages => "pdf-pages",
            ParserStrategy::PdfText => "pdf-text",
            ParserStrategy::CsvRows => "csv-rows",
            ParserStrategy::DocxParagraphs => "docx-paragraphs",
            ParserStrategy::DocxXml => "docx-xml",
        }
    }

    /// Run this strategy
    pub fn run(
        &self,
        source: &Path,
        file_type: FileType,
        data: &[u8],
    ) -> std::result::Result<Vec<DocumentUnit>, ParseFailure> {
        let units = match self {
            ParserStrategy::PdfPages => parse_pdf_pages(source, data)?,
            ParserStrategy::PdfText => parse_pdf_text(source, data)?,
            ParserStrategy::CsvRows => parse_csv_rows(source, data)?,
            ParserStrategy::DocxParagraphs => parse_docx_paragraphs(source, file_type, data)?,
            ParserStrategy::DocxXml => parse_docx_xml(source, file_type, data)?,
        };

        if units.is_empty() {
            return Err(ParseFailure::NoText);
        }
        Ok(units)
    }
}

/// Multi-format file parser
pub struct FileParser;

impl FileParser {
    /// Parse a non-image file into document units
    ///
    /// Returns an empty vector when the file parsed but holds no text.
    pub fn parse(source: &Path, data: &[u8]) -> Result<Vec<DocumentUnit>> {
        let file_type = FileType::from_path(source);
        let filename = source
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| source.display().to_string());

        let chain = ParserStrategy::chain_for(file_type);
        if chain.is_empty() {
            return Err(Error::UnsupportedFormat(format!(
                "{} - no text parser for this file type",
                filename
            )));
        }

        let mut attempts = Vec::new();
        let mut parsed_without_text = false;

        for strategy in chain {
            match strategy.run(source, file_type, data) {
                Ok(units) => {
                    tracing::debug!(
                        "Parsed '{}' with {} ({} units)",
                        filename,
                        strategy.name(),
                        units.len()
                    );
                    return Ok(units);
                }
                Err(ParseFailure::NoText) => {
                    parsed_without_text = true;
                    attempts.push(format!("{}: {}", strategy.name(), ParseFailure::NoText));
                }
                Err(failure) => {
                    tracing::debug!("{} failed for '{}': {}", strategy.name(), filename, failure);
                    attempts.push(format!("{}: {}", strategy.name(), failure));
                }
            }
        }

        if parsed_without_text {
            return Ok(Vec::new());
        }

        Err(Error::file_parse(filename, attempts.join("; ")))
    }
}

fn parse_pdf_pages(
    source: &Path,
    data: &[u8],
) -> std::result::Result<Vec<DocumentUnit>, ParseFailure> {
    let doc = lopdf::Document::load_mem(data)
        .map_err(|e| ParseFailure::Malformed(e.to_string()))?;

    let mut units = Vec::new();
    for page_number in doc.get_pages().keys() {
        let text = doc
            .extract_text(&[*page_number])
            .map_err(|e| ParseFailure::Malformed(format!("page {}: {}", page_number, e)))?;

        if !text.trim().is_empty() {
            units.push(
                DocumentUnit::new(text, source, FileType::Pdf).with_meta("page", page_number),
            );
        }
    }

    Ok(units)
}

fn parse_pdf_text(
    source: &Path,
    data: &[u8],
) -> std::result::Result<Vec<DocumentUnit>, ParseFailure> {
    // pdf-extract panics on some malformed inputs
    let text = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data))
        .map_err(|_| ParseFailure::Malformed("extractor panicked".to_string()))?
        .map_err(|e| ParseFailure::Malformed(e.to_string()))?;

    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(vec![DocumentUnit::new(text, source, FileType::Pdf)])
}

fn parse_csv_rows(
    source: &Path,
    data: &[u8],
) -> std::result::Result<Vec<DocumentUnit>, ParseFailure> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| ParseFailure::Malformed(e.to_string()))?
        .clone();

    let mut units = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ParseFailure::Malformed(e.to_string()))?;

        let text = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| format!("{}: {}", header.trim(), value.trim()))
            .collect::<Vec<_>>()
            .join("\n");

        if record.iter().any(|value| !value.trim().is_empty()) {
            units.push(DocumentUnit::new(text, source, FileType::Csv).with_meta("row", row));
        }
    }

    Ok(units)
}

fn parse_docx_paragraphs(
    source: &Path,
    file_type: FileType,
    data: &[u8],
) -> std::result::Result<Vec<DocumentUnit>, ParseFailure> {
    let doc = docx_rs::read_docx(data).map_err(|e| ParseFailure::Malformed(e.to_string()))?;

    let mut paragraphs = Vec::new();
    for child in doc.document.children {
        if let docx_rs::DocumentChild::Paragraph(p) = child {
            let mut text = String::new();
            for child in p.children {
                if let docx_rs::ParagraphChild::Run(run) = child {
                    for child in run.children {
                        if let docx_rs::RunChild::Text(t) = child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            paragraphs.push(text);
        }
    }

    Ok(single_unit(paragraphs.join("\n"), source, file_type))
}

fn parse_docx_xml(
    source: &Path,
    file_type: FileType,
    data: &[u8],
) -> std::result::Result<Vec<DocumentUnit>, ParseFailure> {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data))
        .map_err(|e| ParseFailure::Malformed(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ParseFailure::Malformed(e.to_string()))?
        .read_to_string(&mut xml)
        .map_err(|e| ParseFailure::Malformed(e.to_string()))?;

    let mut reader = Reader::from_str(&xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_text = true,
            Ok(Event::Text(e)) if in_text => {
                let text = e
                    .unescape()
                    .map_err(|e| ParseFailure::Malformed(e.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"p" => {
                paragraphs.push(String::new());
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseFailure::Malformed(e.to_string())),
            _ => {}
        }
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    Ok(single_unit(paragraphs.join("\n"), source, file_type))
}

fn single_unit(text: String, source: &Path, file_type: FileType) -> Vec<DocumentUnit> {
    if text.trim().is_empty() {
        Vec::new()
    } else {
        vec![DocumentUnit::new(text, source, file_type)]
    }
}
