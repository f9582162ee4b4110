//! PDF encoder, compiling a generated typst table in process.

use super::{ExportError, ExportTable};
use chrono::{Datelike, Local};
use ecow::EcoVec;
use std::sync::LazyLock;
use typst::diag::{FileError, FileResult, SourceDiagnostic};
use typst::foundations::{Bytes, Datetime};
use typst::layout::PagedDocument;
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};

/// Title printed above the table.
pub const DOCUMENT_TITLE: &str = "Exported Data";

static FONTS: LazyLock<Vec<Font>> = LazyLock::new(|| {
    typst_assets::fonts()
        .flat_map(|data| Font::iter(Bytes::new(data)))
        .collect()
});

static FONT_BOOK: LazyLock<LazyHash<FontBook>> =
    LazyLock::new(|| LazyHash::new(FontBook::from_fonts(FONTS.iter())));

static LIBRARY: LazyLock<LazyHash<Library>> = LazyLock::new(|| LazyHash::new(Library::default()));

/// Escape text for use inside a typst string literal.
///
pub fn escape_typst(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Build the typst source: title, then a table with a shaded header row of
/// capitalised labels. Cells are string literals so row data is never
/// interpreted as markup.
///
pub fn build_source(table: &ExportTable) -> String {
    let mut source = format!(
        r#"#set page(paper: "a4", margin: 14mm)
#set text(size: 8pt)
#text(size: 14pt, weight: "bold", "{title}")
#v(6mm)
#table(
  columns: {columns},
  fill: (_, y) => if y == 0 {{ rgb(41, 128, 185) }},
  table.header(
"#,
        title = escape_typst(DOCUMENT_TITLE),
        columns = table.labels.len().max(1),
    );
    for label in &table.labels {
        source.push_str(&format!(
            "    text(fill: white, weight: \"bold\", \"{}\"),\n",
            escape_typst(label)
        ));
    }
    source.push_str("  ),\n");
    for row in &table.rows {
        let cells: Vec<String> = row
            .iter()
            .map(|value| format!("\"{}\"", escape_typst(value)))
            .collect();
        source.push_str(&format!("  {},\n", cells.join(", ")));
    }
    source.push_str(")\n");
    source
}

struct ExportWorld {
    source: Source,
}

impl ExportWorld {
    fn new(source_text: &str) -> Self {
        Self {
            source: Source::detached(source_text),
        }
    }
}

impl World for ExportWorld {
    fn library(&self) -> &LazyHash<Library> {
        &LIBRARY
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &FONT_BOOK
    }

    fn main(&self) -> FileId {
        self.source.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.source.id() {
            Ok(self.source.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rooted_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rooted_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        FONTS.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let today = Local::now().date_naive();
        Datetime::from_ymd(today.year(), today.month() as u8, today.day() as u8)
    }
}

/// Compile the table into PDF bytes. CPU bound; callers in async context
/// run it on a blocking thread.
///
pub fn encode(table: &ExportTable) -> Result<Vec<u8>, ExportError> {
    let world = ExportWorld::new(&build_source(table));

    let document = typst::compile::<PagedDocument>(&world)
        .output
        .map_err(|diagnostics| encode_error("typst compilation failed", &diagnostics))?;

    typst_pdf::pdf(&document, &typst_pdf::PdfOptions::default())
        .map_err(|diagnostics| encode_error("PDF export failed", &diagnostics))
}

fn encode_error(prefix: &str, diagnostics: &EcoVec<SourceDiagnostic>) -> ExportError {
    let messages: Vec<String> = diagnostics.iter().map(|d| d.message.to_string()).collect();
    ExportError::Encode {
        format: "PDF",
        message: format!("{}: {}", prefix, messages.join("; ")),
    }
}
