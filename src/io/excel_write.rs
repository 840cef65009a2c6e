use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use crate::error::Result;
use crate::output::SheetTable;

/// Writes the provided tables to a workbook, one worksheet per table. Data
/// is written as plain cells (header row bold) so downstream template
/// imports see ordinary values rather than an Excel table object.
pub fn write_tables(path: &Path, tables: &[SheetTable]) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    for table in tables {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(table.sheet_name.as_str())?;

        for (col_idx, header) in table.columns.iter().enumerate() {
            worksheet.write_string_with_format(0, col_idx as u16, header.as_str(), &header_format)?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                worksheet.write_string((row_idx + 1) as u32, col_idx as u16, cell.as_str())?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}
