use std::path::Path;

use csv::StringRecord;

use crate::error::{Result, ToolError};
use crate::model::TimetableRow;
use crate::text;

/// Columns the timetable export must provide.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Activity Id",
    "Day",
    "Hour",
    "Students Sets",
    "Subject",
    "Teachers",
    "Activity Tags",
    "Room",
];

/// Reads the hourly timetable export. Column positions are derived from
/// the header row; all required columns must be present, Comments is
/// optional. Cell values are kept verbatim.
pub fn read_timetable(path: &Path) -> Result<Vec<TimetableRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(text::clean).collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !headers.iter().any(|header| header == *name))
        .map(ToString::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(ToolError::MissingColumns {
            table: "timetable".to_string(),
            columns: missing,
        });
    }

    let column = |name: &str| headers.iter().position(|header| header == name);
    let activity_id = column("Activity Id");
    let day = column("Day");
    let hour = column("Hour");
    let students_sets = column("Students Sets");
    let subject = column("Subject");
    let teachers = column("Teachers");
    let activity_tags = column("Activity Tags");
    let room = column("Room");
    let comments = column("Comments");

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(TimetableRow {
            activity_id: field(&record, activity_id),
            day: field(&record, day),
            hour: field(&record, hour),
            students_sets: field(&record, students_sets),
            subject: field(&record, subject),
            teachers: field(&record, teachers),
            activity_tags: field(&record, activity_tags),
            room: field(&record, room),
            comments: field(&record, comments),
        });
    }
    Ok(rows)
}

fn field(record: &StringRecord, index: Option<usize>) -> String {
    index
        .and_then(|column| record.get(column))
        .unwrap_or("")
        .to_string()
}
