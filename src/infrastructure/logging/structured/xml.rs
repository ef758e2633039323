use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::warn;

use crate::domain::error::{LogitError, LogitResult};
use crate::domain::models::{StructuredFormat, StructuredRecord};
use crate::domain::ports::RecordSink;

const ROOT: &str = "data";
const ENTRY: &str = "log";

/// Keeps a `<data>` document with one `<log>` element per record
#[derive(Debug, Clone)]
pub struct XmlSink {
    path: PathBuf,
}

impl XmlSink {
    /// Sink writing to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Records currently in the file; a document that does not parse reads as empty
    pub fn records(&self) -> LogitResult<Vec<StructuredRecord>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(LogitError::io("read", &self.path, e)),
        };

        match parse_document(&raw) {
            Ok(records) => Ok(records),
            Err(reason) => {
                if !raw.trim().is_empty() {
                    warn!(
                        path = %self.path.display(),
                        reason = %reason,
                        "starting a fresh XML sink document"
                    );
                }
                Ok(Vec::new())
            }
        }
    }

    fn write(&self, records: &[StructuredRecord]) -> LogitResult<()> {
        let document = render_document(records)
            .map_err(|e| LogitError::io("render XML for", &self.path, io::Error::other(e)))?;
        fs::write(&self.path, document).map_err(|e| LogitError::io("write", &self.path, e))
    }
}

impl RecordSink for XmlSink {
    fn format(&self) -> StructuredFormat {
        StructuredFormat::Xml
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn append(&mut self, record: &StructuredRecord) -> LogitResult<()> {
        let mut records = self.records()?;
        records.push(record.clone());
        self.write(&records)
    }
}

fn parse_document(raw: &str) -> Result<Vec<StructuredRecord>, String> {
    let mut reader = Reader::from_str(raw);

    let mut records = Vec::new();
    let mut current: Option<StructuredRecord> = None;
    let mut field: Option<(String, String)> = None;
    let mut seen_root = false;
    let mut depth = 0usize;

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(start) => {
                let name = tag_name(&start)?;
                match depth {
                    0 if name == ROOT && !seen_root => seen_root = true,
                    1 if name == ENTRY => current = Some(StructuredRecord::new()),
                    2 => field = Some((name, String::new())),
                    _ => return Err(format!("unexpected <{name}> at depth {depth}")),
                }
                depth += 1;
            }
            Event::Empty(start) => {
                let name = tag_name(&start)?;
                match (depth, current.as_mut()) {
                    (0, _) if name == ROOT && !seen_root => {
                        seen_root = true;
                    }
                    (1, _) if name == ENTRY => records.push(StructuredRecord::new()),
                    (2, Some(record)) => record.insert(name, ""),
                    _ => return Err(format!("unexpected <{name}/> at depth {depth}")),
                }
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| e.to_string())?;
                match field.as_mut() {
                    Some((_, value)) => value.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => return Err("text outside of a field".to_string()),
                }
            }
            Event::CData(data) => {
                let Some((_, value)) = field.as_mut() else {
                    return Err("CDATA outside of a field".to_string());
                };
                value.push_str(&String::from_utf8_lossy(&data));
            }
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| "unbalanced closing tag".to_string())?;
                match depth {
                    2 => {
                        if let (Some((name, value)), Some(record)) =
                            (field.take(), current.as_mut())
                        {
                            record.insert(name, value);
                        }
                    }
                    1 => records.extend(current.take()),
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root || depth != 0 {
        return Err("document has no complete <data> root".to_string());
    }
    Ok(records)
}

fn tag_name(start: &BytesStart<'_>) -> Result<String, String> {
    std::str::from_utf8(start.name().as_ref())
        .map(str::to_string)
        .map_err(|e| e.to_string())
}

/// Map a record field name to a well-formed element name.
///
/// Characters outside letters, digits, `_`, `-` and `.` become `_`, and a
/// name that does not start with a letter or `_` gets a leading `_`. Valid
/// names are returned unchanged.
fn element_name(field: &str) -> String {
    let mut name: String = field
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if !name.starts_with(|c: char| c.is_alphabetic() || c == '_') {
        name.insert(0, '_');
    }
    name
}

fn render_document(records: &[StructuredRecord]) -> Result<Vec<u8>, quick_xml::Error> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(ROOT)))?;
    for record in records {
        writer.write_event(Event::Start(BytesStart::new(ENTRY)))?;
        for (name, value) in record.iter() {
            let name = element_name(name);
            writer.write_event(Event::Start(BytesStart::new(name.as_str())))?;
            writer.write_event(Event::Text(BytesText::new(value)))?;
            writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
        }
        writer.write_event(Event::End(BytesEnd::new(ENTRY)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(ROOT)))?;

    Ok(writer.into_inner())
}
