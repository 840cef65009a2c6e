//! Output row building for the two downstream record shapes: the weekly
//! ERP export and the session-block sheets of the scheduling template.

use crate::model::{ConvertOptions, EnrichedRow, SecondaryPlacement};
use crate::session::Session;
use crate::text;

/// Column order of the weekly ERP export.
pub const WEEK_COLUMNS: [&str; 11] = [
    "Activity Id",
    "Day",
    "Hour",
    "Students Sets",
    "Group Name",
    "Subject",
    "Teachers",
    "Teacher1",
    "Activity Tags",
    "Room",
    "Comments",
];

/// Column order of the session-block sheets, matching the scheduling
/// template's header row.
pub const SESSION_BLOCK_COLUMNS: [&str; 11] = [
    "Cal Id",
    "Course",
    "Course Variant",
    "Section",
    "Room",
    "Faculty",
    "Day",
    "From Time Slot",
    "To Time Slot",
    "AcademyLocationID",
    "isAllFaculties",
];

/// Worksheet receiving the weekly export.
pub const WEEK_SHEET: &str = "ERP";
/// Worksheet receiving session-block rows, named after the template.
pub const ENTRY_SHEET: &str = "EntrySheet";
/// Worksheet receiving the secondary-teacher set when it is separated.
pub const SECONDARY_SHEET: &str = "CBS2";

/// A table that will be materialised as a worksheet or CSV file.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub sheet_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    fn new(sheet_name: &str, columns: &[&str]) -> Self {
        Self {
            sheet_name: sheet_name.to_string(),
            columns: columns.iter().map(ToString::to_string).collect(),
            rows: Vec::new(),
        }
    }
}

/// Serialises enriched rows in the fixed weekly column order. Every column
/// is always present; absent values are empty strings.
pub fn week_table(rows: &[EnrichedRow]) -> SheetTable {
    let mut table = SheetTable::new(WEEK_SHEET, &WEEK_COLUMNS);
    for row in rows {
        table.rows.push(vec![
            row.activity_id.clone(),
            row.day.clone(),
            row.hour.clone(),
            row.students_sets.clone(),
            row.group_name.clone(),
            row.subject.clone(),
            row.teachers.clone(),
            row.teacher1.clone(),
            row.activity_tags.clone(),
            row.room.clone(),
            row.comments.clone(),
        ]);
    }
    table
}

/// Infers the Course Variant from the Activity Tags text by uppercase
/// substring match. First matching rule wins: LAB, then TUT, then LEC.
pub fn infer_course_variant(activity_tags: &str) -> &'static str {
    let tags = text::clean(activity_tags).to_uppercase();
    if tags.contains("LAB") {
        "Lab"
    } else if tags.contains("TUT") {
        "Tutorial"
    } else if tags.contains("LEC") {
        "Lecture"
    } else {
        ""
    }
}

/// Builds the session-block tables: the entry sheet plus, when the
/// secondary placement is [`SecondaryPlacement::Separate`], the
/// secondary-teacher sheet.
pub fn session_block_tables(
    sessions: &[Session],
    options: &ConvertOptions,
) -> (SheetTable, Option<SheetTable>) {
    let mut primary = SheetTable::new(ENTRY_SHEET, &SESSION_BLOCK_COLUMNS);
    let mut secondary = match options.secondary {
        SecondaryPlacement::Separate => {
            Some(SheetTable::new(SECONDARY_SHEET, &SESSION_BLOCK_COLUMNS))
        }
        _ => None,
    };

    for session in sessions {
        primary
            .rows
            .push(block_cells(session, &session.row.teachers, options));

        let teacher1 = text::clean(&session.row.teacher1);
        if teacher1.is_empty() {
            continue;
        }
        match options.secondary {
            SecondaryPlacement::Skip => {}
            SecondaryPlacement::Append => {
                primary.rows.push(block_cells(session, &teacher1, options));
            }
            SecondaryPlacement::Separate => {
                if let Some(table) = secondary.as_mut() {
                    table.rows.push(block_cells(session, &teacher1, options));
                }
            }
        }
    }

    (primary, secondary)
}

fn block_cells(session: &Session, faculty: &str, options: &ConvertOptions) -> Vec<String> {
    let row = &session.row;
    vec![
        String::new(), // Cal Id, assigned downstream
        text::clean(&row.subject),
        infer_course_variant(&row.activity_tags).to_string(),
        text::clean(&row.group_name),
        text::clean(&row.room),
        text::clean(faculty),
        text::clean(&row.day),
        session.from_slot(),
        session.to_slot(),
        String::new(), // AcademyLocationID, caller-supplied elsewhere
        options.all_faculties.to_string(),
    ]
}
