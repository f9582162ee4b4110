//! Spreadsheet encoder.

use super::{ExportError, ExportTable};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

const SHEET_NAME: &str = "Export";

/// Encode the table as an xlsx workbook with one sheet. The header row holds
/// the column keys.
///
pub fn encode(table: &ExportTable) -> Result<Vec<u8>, ExportError> {
    write_workbook(table).map_err(|e| ExportError::Encode {
        format: "spreadsheet",
        message: e.to_string(),
    })
}

fn write_workbook(table: &ExportTable) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    {
        let header = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;
        for (col, key) in table.columns.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, key, &header)?;
        }
        for (row, values) in table.rows.iter().enumerate() {
            for (col, value) in values.iter().enumerate() {
                worksheet.write_string(row as u32 + 1, col as u16, value)?;
            }
        }
    }
    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_zip_container() {
        let table = ExportTable {
            columns: vec!["id".to_string(), "title".to_string()],
            labels: vec!["Id".to_string(), "Title".to_string()],
            rows: vec![vec!["1".to_string(), "Pothole".to_string()]],
        };
        let bytes = encode(&table).unwrap();
        // xlsx files are zip archives
        assert_eq!(&bytes[..2], b"PK");
    }
}
