use std::path::Path;

use crate::error::Result;
use crate::output::SheetTable;

/// Writes a table as CSV: header row first, then the data rows.
pub fn write_table(path: &Path, table: &SheetTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
