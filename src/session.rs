//! Session aggregation: collapses hourly timetable rows into contiguous
//! time blocks with a start and end boundary.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveTime};

use crate::model::EnrichedRow;

/// Time-of-day format used by the timetable's Hour column.
const HOUR_FORMAT: &str = "%H:%M";

/// One scheduled class occurrence spanning one or more hourly slots.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Representative row for the block. All key fields are identical
    /// across the grouped rows by construction.
    pub row: EnrichedRow,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Session {
    /// Span start formatted for the scheduling template.
    pub fn from_slot(&self) -> String {
        self.start.format("%H:%M:%S").to_string()
    }

    /// Span end formatted for the scheduling template.
    pub fn to_slot(&self) -> String {
        self.end.format("%H:%M:%S").to_string()
    }
}

/// Result of aggregating hourly rows.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub sessions: Vec<Session>,
    /// Non-blank Hour values that could not be parsed as a time of day.
    pub skipped_hours: usize,
}

/// Parses an Hour cell; blank or malformed values yield None.
pub fn parse_hour(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), HOUR_FORMAT).ok()
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct SessionKey {
    activity_id: String,
    day: String,
    students_sets: String,
    group_name: String,
    subject: String,
    room: String,
    teachers: String,
    teacher1: String,
    activity_tags: String,
}

impl SessionKey {
    fn of(row: &EnrichedRow) -> Self {
        Self {
            activity_id: row.activity_id.clone(),
            day: row.day.clone(),
            students_sets: row.students_sets.clone(),
            group_name: row.group_name.clone(),
            subject: row.subject.clone(),
            room: row.room.clone(),
            teachers: row.teachers.clone(),
            teacher1: row.teacher1.clone(),
            activity_tags: row.activity_tags.clone(),
        }
    }
}

/// Groups rows by the nine-field session key and folds their hours into
/// one span per group: start = earliest hour, end = latest hour plus one
/// hour (wrapping at midnight). Groups without a single parseable hour are
/// dropped silently; individually malformed values only exclude their own
/// row from the span and are counted in the result.
pub fn aggregate(rows: &[EnrichedRow]) -> Aggregation {
    let mut groups: BTreeMap<SessionKey, Vec<&EnrichedRow>> = BTreeMap::new();
    for row in rows {
        groups.entry(SessionKey::of(row)).or_default().push(row);
    }

    let mut aggregation = Aggregation::default();
    for members in groups.values() {
        let mut hours: BTreeSet<NaiveTime> = BTreeSet::new();
        for row in members {
            let value = row.hour.trim();
            if value.is_empty() {
                continue;
            }
            match parse_hour(value) {
                Some(hour) => {
                    hours.insert(hour);
                }
                None => aggregation.skipped_hours += 1,
            }
        }

        let (Some(first), Some(last)) = (hours.first(), hours.last()) else {
            continue;
        };
        aggregation.sessions.push(Session {
            row: members[0].clone(),
            start: *first,
            end: *last + Duration::hours(1),
        });
    }

    aggregation
}
