//! SIC3PRO report converter
//!
//! SIC3PRO exports its reports as HTML tables. Each table becomes a list of
//! header → cell objects; tables without data rows are dropped.
//!
//! The exports are not well-formed XML (`<br>`, `<meta>`, omitted `</td>`),
//! so the reader runs with end-name checks off and cells and rows are closed
//! implicitly when the next one opens. Excel conditional markers
//! (`<![if !supportLists]>`, `<![endif]>`) are removed before reading.

use chrono::Local;
use quick_xml::events::{BytesText, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::path::Path;
use thiserror::Error;

/// Default output of a conversion
pub const DEFAULT_OUTPUT: &str = "data/datasets/sic3pro_data.json";

const BROWSER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTML parse error at byte {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("Download of {url} failed: {message}")]
    Download { url: String, message: String },

    #[error("Download of {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConvertResult<T> = Result<T, ConvertError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionMetadata {
    pub source_file: String,
    pub conversion_date: String,
    pub tables_found: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedTable {
    pub table_index: usize,
    pub headers: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
    pub row_count: usize,
}

/// A converted report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertedReport {
    pub metadata: ConversionMetadata,
    pub tables: Vec<ConvertedTable>,
}

#[derive(Debug, Default)]
struct Cell {
    header: bool,
    text: String,
}

/// Rows of one `<table>` while it is being read
#[derive(Debug)]
struct TableBuilder {
    index: usize,
    rows: Vec<Vec<Cell>>,
    row: Option<Vec<Cell>>,
    cell: Option<Cell>,
}

impl TableBuilder {
    fn new(index: usize) -> Self {
        Self {
            index,
            rows: Vec::new(),
            row: None,
            cell: None,
        }
    }

    fn open_row(&mut self) {
        self.close_row();
        self.row = Some(Vec::new());
    }

    fn open_cell(&mut self, header: bool) {
        self.close_cell();
        if self.row.is_none() {
            self.row = Some(Vec::new());
        }
        self.cell = Some(Cell {
            header,
            text: String::new(),
        });
    }

    fn push_text(&mut self, text: &str) {
        if let Some(cell) = self.cell.as_mut() {
            cell.text.push_str(text.trim());
        }
    }

    fn close_cell(&mut self) {
        if let Some(cell) = self.cell.take() {
            self.row.get_or_insert_with(Vec::new).push(cell);
        }
    }

    fn close_row(&mut self) {
        self.close_cell();
        if let Some(row) = self.row.take() {
            self.rows.push(row);
        }
    }

    /// Header row, then one object per data row. `None` if no row has data.
    fn finish(mut self) -> Option<ConvertedTable> {
        self.close_row();

        let mut rows = self.rows.into_iter();
        let headers: Vec<String> = rows.next()?.into_iter().map(|c| c.text).collect();

        let data: Vec<Map<String, Value>> = rows
            .map(|row| {
                row.into_iter()
                    .filter(|c| !c.header)
                    .zip(headers.iter())
                    .map(|(cell, header)| (header.clone(), Value::String(cell.text)))
                    .collect::<Map<String, Value>>()
            })
            .filter(|row| !row.is_empty())
            .collect();

        if data.is_empty() {
            return None;
        }

        Some(ConvertedTable {
            table_index: self.index,
            headers,
            row_count: data.len(),
            rows: data,
        })
    }
}

/// Text with HTML entities resolved; raw text if an entity is unknown
fn decode_text(text: &BytesText<'_>) -> String {
    text.unescape()
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| String::from_utf8_lossy(text).into_owned())
}

/// Drop `<![...]>` markers that are not CDATA sections. Comments and CDATA
/// are copied through untouched.
fn strip_conditional_markers(html: &str) -> Cow<'_, str> {
    if !html.contains("<![") {
        return Cow::Borrowed(html);
    }

    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find("<!") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        let (keep, end) = if tail.starts_with("<!--") {
            (true, tail.find("-->").map(|i| i + 3))
        } else if tail.starts_with("<![CDATA[") {
            (true, tail.find("]]>").map(|i| i + 3))
        } else if tail.starts_with("<![") {
            (false, tail.find("]>").map(|i| i + 2))
        } else {
            (true, Some(2))
        };

        // Unterminated: the rest of the input belongs to it
        let end = end.unwrap_or(tail.len());
        if keep {
            out.push_str(&tail[..end]);
        }
        rest = &tail[end..];
    }

    out.push_str(rest);
    Cow::Owned(out)
}

/// Parse every table. Returns the number of `<table>` elements seen and the
/// tables that carry data.
pub fn parse_tables(html: &str) -> ConvertResult<(usize, Vec<ConvertedTable>)> {
    let html = strip_conditional_markers(html);
    let mut reader = Reader::from_str(&html);
    reader.check_end_names(false);

    let mut open: Vec<TableBuilder> = Vec::new();
    let mut finished: Vec<ConvertedTable> = Vec::new();
    let mut found = 0;

    loop {
        let event = reader.read_event().map_err(|e| ConvertError::Parse {
            position: reader.buffer_position(),
            message: e.to_string(),
        })?;

        match event {
            Event::Start(tag) => {
                let name = tag.local_name().as_ref().to_ascii_lowercase();
                match name.as_slice() {
                    b"table" => {
                        open.push(TableBuilder::new(found));
                        found += 1;
                    }
                    b"tr" => {
                        if let Some(table) = open.last_mut() {
                            table.open_row();
                        }
                    }
                    b"td" | b"th" => {
                        if let Some(table) = open.last_mut() {
                            table.open_cell(name == b"th");
                        }
                    }
                    _ => {}
                }
            }
            Event::Empty(tag) => {
                let name = tag.local_name().as_ref().to_ascii_lowercase();
                if let (b"td" | b"th", Some(table)) = (name.as_slice(), open.last_mut()) {
                    table.open_cell(name == b"th");
                    table.close_cell();
                }
            }
            Event::End(tag) => {
                let name = tag.local_name().as_ref().to_ascii_lowercase();
                match name.as_slice() {
                    b"table" => {
                        if let Some(table) = open.pop() {
                            finished.extend(table.finish());
                        }
                    }
                    b"tr" => {
                        if let Some(table) = open.last_mut() {
                            table.close_row();
                        }
                    }
                    b"td" | b"th" => {
                        if let Some(table) = open.last_mut() {
                            table.close_cell();
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(text) => {
                if let Some(table) = open.last_mut() {
                    table.push_text(&decode_text(&text));
                }
            }
            Event::CData(data) => {
                if let Some(table) = open.last_mut() {
                    table.push_text(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    // Tables left open at end of input
    while let Some(table) = open.pop() {
        finished.extend(table.finish());
    }

    finished.sort_by_key(|t| t.table_index);
    Ok((found, finished))
}

/// Convert an HTML report held in memory
pub fn convert_html(html: &str, source_file: &str) -> ConvertResult<ConvertedReport> {
    let (tables_found, tables) = parse_tables(html)?;

    Ok(ConvertedReport {
        metadata: ConversionMetadata {
            source_file: source_file.to_string(),
            conversion_date: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            tables_found,
        },
        tables,
    })
}

/// Convert an HTML file and write the JSON document to `output`
pub async fn convert_file(input: &Path, output: &Path) -> ConvertResult<ConvertedReport> {
    let html = tokio::fs::read_to_string(input)
        .await
        .map_err(|source| ConvertError::Io {
            path: input.display().to_string(),
            source,
        })?;

    let source_file = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());

    let report = convert_html(&html, &source_file)?;
    write_report(&report, output).await?;
    Ok(report)
}

/// Download a report and convert it
pub async fn convert_url(
    client: &reqwest::Client,
    url: &str,
    output: &Path,
) -> ConvertResult<ConvertedReport> {
    let html = download(client, url).await?;

    let source_file = url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty() && !s.contains(':'))
        .unwrap_or("sic3pro_report.html");

    let report = convert_html(&html, source_file)?;
    write_report(&report, output).await?;
    Ok(report)
}

/// Fetch a report page as text
pub async fn download(client: &reqwest::Client, url: &str) -> ConvertResult<String> {
    tracing::info!(url = %url, "Downloading SIC3PRO report");

    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, BROWSER_AGENT)
        .send()
        .await
        .map_err(|e| ConvertError::Download {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(ConvertError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    response.text().await.map_err(|e| ConvertError::Download {
        url: url.to_string(),
        message: e.to_string(),
    })
}

async fn write_report(report: &ConvertedReport, output: &Path) -> ConvertResult<()> {
    let io_error = |source| ConvertError::Io {
        path: output.display().to_string(),
        source,
    };

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
    }

    let body = serde_json::to_vec_pretty(report)?;
    tokio::fs::write(output, body).await.map_err(io_error)?;

    tracing::info!(
        output = %output.display(),
        tables = report.tables.len(),
        "Report converted"
    );
    Ok(())
}
