use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};

use crate::cohort::{MappingRow, MappingTable};
use crate::error::{Result, ToolError};
use crate::lecturer::LecturerDirectory;
use crate::text;

/// Reads the lecturer code table (columns: Code, User name) from the first
/// worksheet of the workbook.
pub fn read_lecturer_codes(path: &Path) -> Result<LecturerDirectory> {
    let range = read_first_sheet(path)?;
    let header = HeaderIndex::new(&range, "lecturer code table", &["Code", "User name"])?;

    let mut pairs = Vec::new();
    for row in range.rows().skip(1) {
        pairs.push((header.cell(row, "Code"), header.cell(row, "User name")));
    }
    Ok(LecturerDirectory::from_rows(pairs))
}

/// Reads the cohort mapping table (columns: Students Sets, Level, Intake,
/// Program, Groups) from the first worksheet, preserving row order.
pub fn read_mapping_table(path: &Path) -> Result<MappingTable> {
    let range = read_first_sheet(path)?;
    let header = HeaderIndex::new(
        &range,
        "cohort mapping table",
        &["Students Sets", "Level", "Intake", "Program", "Groups"],
    )?;

    let mut rows = Vec::new();
    for row in range.rows().skip(1) {
        rows.push(MappingRow {
            students_sets: header.cell(row, "Students Sets"),
            level: header.cell(row, "Level"),
            intake: header.cell(row, "Intake"),
            program: header.cell(row, "Program"),
            groups: header.cell(row, "Groups"),
        });
    }
    Ok(MappingTable::from_rows(rows))
}

fn read_first_sheet(path: &Path) -> Result<calamine::Range<DataType>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range_result = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ToolError::InvalidWorkbook("workbook has no worksheets".to_string()))?;
    range_result.map_err(ToolError::from)
}

/// Column positions resolved from a sheet's header row by normalized name.
struct HeaderIndex {
    columns: Vec<(String, usize)>,
}

impl HeaderIndex {
    fn new(range: &calamine::Range<DataType>, table: &str, required: &[&str]) -> Result<Self> {
        let mut columns = Vec::new();
        if let Some(header_row) = range.rows().next() {
            for (index, cell) in header_row.iter().enumerate() {
                let name = text::clean(&cell_to_string(cell));
                if !name.is_empty() {
                    columns.push((name, index));
                }
            }
        }

        let missing: Vec<String> = required
            .iter()
            .filter(|name| !columns.iter().any(|(found, _)| found == *name))
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(ToolError::MissingColumns {
                table: table.to_string(),
                columns: missing,
            });
        }
        Ok(Self { columns })
    }

    fn cell(&self, row: &[DataType], name: &str) -> String {
        self.columns
            .iter()
            .find(|(found, _)| found == name)
            .and_then(|(_, index)| row.get(*index))
            .map(cell_to_string)
            .unwrap_or_default()
    }
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(value) => value.clone(),
        DataType::Float(value) => value.to_string(),
        DataType::Int(value) => value.to_string(),
        DataType::Bool(value) => value.to_string(),
        DataType::Empty => String::new(),
        other => other.to_string(),
    }
}
