use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One hourly row of the timetable export, as read from the CSV source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimetableRow {
    pub activity_id: String,
    pub day: String,
    /// Time-of-day text such as "08:30". May be blank.
    pub hour: String,
    /// Encoded cohort string, entries joined by `+`.
    pub students_sets: String,
    pub subject: String,
    /// Lecturer codes joined by `+`.
    pub teachers: String,
    pub activity_tags: String,
    pub room: String,
    pub comments: String,
}

/// An hourly row after lecturer resolution and group decoding. Field names
/// follow the weekly export shape: `teachers` carries the resolved primary
/// name and `teacher1` the secondary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRow {
    pub activity_id: String,
    pub day: String,
    pub hour: String,
    pub students_sets: String,
    pub group_name: String,
    pub subject: String,
    pub teachers: String,
    pub teacher1: String,
    pub activity_tags: String,
    pub room: String,
    pub comments: String,
}

/// Placement of the duplicated session-block row carrying the secondary
/// teacher as Faculty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecondaryPlacement {
    /// Do not emit a duplicate row.
    Skip,
    /// Emit the duplicate right after the base row, in the same sheet.
    Append,
    /// Route duplicates into their own sheet.
    Separate,
}

/// Value written into the `isAllFaculties` column of session-block rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AllFaculties {
    False,
    True,
}

impl fmt::Display for AllFaculties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllFaculties::False => write!(f, "FALSE"),
            AllFaculties::True => write!(f, "TRUE"),
        }
    }
}

/// Configuration for one conversion run. Deserializable from a JSON options
/// file; unspecified fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Intake label prefixed onto rendered group names, e.g. "L5 Jan 26".
    pub intake_label: String,
    /// Replace the intake prefix embedded in mapping-table labels with
    /// [`ConvertOptions::intake_label`].
    pub force_intake: bool,
    /// Append third-and-later lecturers into the Comments column.
    pub extras_to_comments: bool,
    /// Where duplicated secondary-teacher session rows go.
    pub secondary: SecondaryPlacement,
    /// Default for the `isAllFaculties` column.
    pub all_faculties: AllFaculties,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            intake_label: "L5 Jan 26".to_string(),
            force_intake: false,
            extras_to_comments: true,
            secondary: SecondaryPlacement::Append,
            all_faculties: AllFaculties::False,
        }
    }
}

/// Non-fatal anomalies collected over one run. The run completes and the
/// affected rows keep best-effort values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Lecturer codes present in the timetable but absent from the code
    /// table, rendered verbatim in the output.
    pub unknown_codes: BTreeSet<String>,
    /// Number of teacher entries beyond the two output slots.
    pub overflow_teachers: usize,
    /// Hour values that could not be parsed as a time of day.
    pub skipped_hours: usize,
    /// Sessions formed by the aggregation step, when it ran.
    pub sessions_formed: usize,
}
