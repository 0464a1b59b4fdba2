use std::io::Write;
use std::sync::OnceLock;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use regex::Regex;

use crate::error::Result;
use crate::fmt::decimal_br;
use crate::models::{AggregatedRecord, Column, FieldValue};

const XML_ROOT: &str = "data";
const XML_ROW: &str = "row";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Xml,
    All,
}

impl ExportFormat {
    pub fn includes_csv(&self) -> bool {
        matches!(self, Self::Csv | Self::All)
    }

    pub fn includes_xml(&self) -> bool {
        matches!(self, Self::Xml | Self::All)
    }
}

// ---------------------------------------------------------------------------
// Delimited text
// ---------------------------------------------------------------------------

/// Semicolon-separated, BOM-prefixed UTF-8 so Excel opens it with the right
/// encoding. Amounts are written pt-BR formatted.
pub fn write_csv<W: Write>(records: &[AggregatedRecord], schema: &[Column], mut out: W) -> Result<()> {
    out.write_all("\u{feff}".as_bytes())?;
    let mut wtr = csv::WriterBuilder::new().delimiter(b';').from_writer(out);
    wtr.write_record(schema.iter().map(Column::name))?;
    for record in records {
        wtr.write_record(schema.iter().map(|col| match record.field(*col) {
            FieldValue::Text(s) => s.to_string(),
            FieldValue::Amount(d) => decimal_br(d),
        }))?;
    }
    wtr.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Markup
// ---------------------------------------------------------------------------

/// Reduce a label to a valid element name: characters outside `[A-Za-z0-9_]`
/// become `_`, and a leading digit gets a `_` prefix.
pub fn sanitize_name(name: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_]").unwrap());
    let clean = re.replace_all(name, "_").into_owned();
    match clean.chars().next() {
        None => "_".to_string(),
        Some(c) if c.is_ascii_digit() => format!("_{clean}"),
        Some(_) => clean,
    }
}

/// One `<row>` per record under a `<data>` root. Amounts stay numeric.
pub fn write_xml<W: Write>(records: &[AggregatedRecord], schema: &[Column], out: W) -> Result<()> {
    let mut writer = quick_xml::Writer::new_with_indent(out, b' ', 2);
    let names: Vec<String> = schema.iter().map(|c| sanitize_name(c.name())).collect();

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(XML_ROOT)))?;
    for record in records {
        writer.write_event(Event::Start(BytesStart::new(XML_ROW)))?;
        for (col, name) in schema.iter().zip(&names) {
            let value = match record.field(*col) {
                FieldValue::Text(s) => s.to_string(),
                FieldValue::Amount(d) => d.to_string(),
            };
            writer.write_event(Event::Start(BytesStart::new(name.as_str())))?;
            writer.write_event(Event::Text(BytesText::new(&value)))?;
            writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
        }
        writer.write_event(Event::End(BytesEnd::new(XML_ROW)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(XML_ROOT)))?;
    writer.get_mut().write_all(b"\n")?;
    Ok(())
}
