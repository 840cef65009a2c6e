//! Cohort/group decoding: turns encoded "Students Sets" strings into
//! structured program → group-number associations and renders the group
//! name labels used by both downstream formats.
//!
//! Two strategies are tried in order: an exact lookup against an external
//! mapping table, then a small segment parser over the encoded string
//! itself. When both come up empty the caller-visible label falls back to
//! the intake label plus the normalized raw text.

use std::collections::{BTreeMap, BTreeSet};

use regex::{NoExpand, Regex};

use crate::text;

/// Program identifier → ascending distinct group numbers, decoded from one
/// row's Students Sets value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CohortSet {
    groups: BTreeMap<String, BTreeSet<u32>>,
}

impl CohortSet {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn insert(&mut self, program: &str, group: u32) {
        self.groups
            .entry(program.to_string())
            .or_default()
            .insert(group);
    }

    /// Program identifiers in output order: SE first, then CS, then the
    /// remaining programs alphabetically.
    pub fn programs(&self) -> Vec<&str> {
        let mut programs: Vec<&str> = self.groups.keys().map(String::as_str).collect();
        programs.sort_by(|a, b| {
            program_rank(a)
                .cmp(&program_rank(b))
                .then_with(|| a.cmp(b))
        });
        programs
    }

    /// Ascending distinct group numbers for a program.
    pub fn numbers(&self, program: &str) -> Vec<u32> {
        self.groups
            .get(program)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }
}

fn program_rank(program: &str) -> u8 {
    match program {
        "SE" => 0,
        "CS" => 1,
        _ => 2,
    }
}

/// One row of the external cohort mapping table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingRow {
    /// Literal Students Sets text the row applies to.
    pub students_sets: String,
    pub level: String,
    pub intake: String,
    pub program: String,
    /// Group numbers as free text, e.g. "1,2,21".
    pub groups: String,
}

/// Mapping-table lookup keyed by the normalized Students Sets text. Rows
/// keep their table order, so "first match wins" is well defined.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    rows: BTreeMap<String, Vec<MappingRow>>,
}

impl MappingTable {
    pub fn from_rows(rows: Vec<MappingRow>) -> Self {
        let mut table: BTreeMap<String, Vec<MappingRow>> = BTreeMap::new();
        for mut row in rows {
            row.students_sets = text::clean(&row.students_sets);
            if row.students_sets.is_empty() {
                continue;
            }
            table.entry(row.students_sets.clone()).or_default().push(row);
        }
        Self { rows: table }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn lookup(&self, students_sets: &str) -> Option<&[MappingRow]> {
        self.rows.get(students_sets).map(Vec::as_slice)
    }
}

/// Renders group-name labels from encoded Students Sets strings.
#[derive(Debug)]
pub struct GroupDecoder {
    intake_label: String,
    force_intake: bool,
    mapping: Option<MappingTable>,
    intake_prefix: Regex,
}

impl GroupDecoder {
    pub fn new(
        intake_label: impl Into<String>,
        force_intake: bool,
        mapping: Option<MappingTable>,
    ) -> Self {
        Self {
            intake_label: intake_label.into(),
            force_intake,
            mapping,
            // Mapping-table labels open with "<level> <term> <year>", e.g.
            // "L5 Jan 25"; the override swaps that prefix out.
            intake_prefix: Regex::new(r"^L\d+\s+\S+\s+\d+").expect("hard-coded pattern compiles"),
        }
    }

    /// Decodes one Students Sets value into its rendered group-name label.
    /// The mapping table wins over pattern decoding; when both come up
    /// empty the normalized raw text is prefixed with the intake label. An
    /// empty input yields "".
    pub fn label(&self, students_sets: &str) -> String {
        let normalized = text::clean(students_sets);
        if normalized.is_empty() {
            return String::new();
        }

        if let Some(label) = self.mapping_label(&normalized) {
            return label;
        }

        let groups = decode_pattern(&normalized);
        if !groups.is_empty() {
            return self.render_pattern(&groups);
        }

        format!("{} {normalized}", self.intake_label)
    }

    fn mapping_label(&self, normalized: &str) -> Option<String> {
        let rows = self.mapping.as_ref()?.lookup(normalized)?;
        let first = rows.first()?;
        let level = text::clean(&first.level);
        let intake = text::clean(&first.intake);

        // First row per program wins; later duplicates are ignored.
        let mut segments: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let program = text::clean(&row.program).to_uppercase();
            if program.is_empty() {
                continue;
            }
            segments
                .entry(program)
                .or_insert_with(|| text::clean(&row.groups));
        }
        if segments.is_empty() {
            return None;
        }

        let mut programs: Vec<&str> = segments.keys().map(String::as_str).collect();
        programs.sort_by(|a, b| {
            program_rank(a)
                .cmp(&program_rank(b))
                .then_with(|| a.cmp(b))
        });

        let rendered: Vec<String> = programs
            .iter()
            .map(|program| {
                let segment = format!("{level} {intake} {program}- {}", segments[*program]);
                self.apply_intake_override(segment)
            })
            .collect();
        Some(rendered.join(" / "))
    }

    fn apply_intake_override(&self, segment: String) -> String {
        if !self.force_intake {
            return segment;
        }
        self.intake_prefix
            .replace(&segment, NoExpand(&self.intake_label))
            .into_owned()
    }

    fn render_pattern(&self, groups: &CohortSet) -> String {
        groups
            .programs()
            .iter()
            .map(|program| {
                let numbers: Vec<String> = groups
                    .numbers(program)
                    .iter()
                    .map(u32::to_string)
                    .collect();
                format!("{} {program}- {}", self.intake_label, numbers.join(","))
            })
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

/// Decodes a `+`-joined Students Sets string with the segment grammar.
/// Unparseable segments are skipped; the result may be empty.
pub fn decode_pattern(students_sets: &str) -> CohortSet {
    let mut set = CohortSet::default();
    for segment in students_sets.split('+') {
        if let Some((program, number)) = parse_segment(segment) {
            set.insert(&program, number);
        }
    }
    set
}

/// Parses one segment such as "L5 CS -G1": a level marker (`L` followed by
/// digits), a program code (uppercase letters or `&`, at least two
/// characters), an optional dash, an optional single-letter group prefix
/// (G/A/C/..., discarded), and the group number digits. Matching is case
/// insensitive; trailing text is ignored.
fn parse_segment(segment: &str) -> Option<(String, u32)> {
    let upper = segment.to_uppercase();
    let bytes = upper.as_bytes();
    let mut pos = 0;

    skip_whitespace(bytes, &mut pos);

    // Level marker, with at least one digit after the L.
    if bytes.get(pos) != Some(&b'L') {
        return None;
    }
    let mut cursor = pos + 1;
    while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
        cursor += 1;
    }
    if cursor == pos + 1 {
        return None;
    }
    pos = cursor;
    skip_whitespace(bytes, &mut pos);

    let program_start = pos;
    while pos < bytes.len() && (bytes[pos].is_ascii_uppercase() || bytes[pos] == b'&') {
        pos += 1;
    }
    if pos - program_start < 2 {
        return None;
    }
    let program = upper[program_start..pos].to_string();

    skip_whitespace(bytes, &mut pos);
    if bytes.get(pos) == Some(&b'-') {
        pos += 1;
        skip_whitespace(bytes, &mut pos);
    }

    // Single-letter group prefix directly in front of the digits.
    if pos < bytes.len()
        && bytes[pos].is_ascii_uppercase()
        && bytes.get(pos + 1).is_some_and(|b| b.is_ascii_digit())
    {
        pos += 1;
    }

    let digits_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos == digits_start {
        return None;
    }
    let number: u32 = upper[digits_start..pos].parse().ok()?;

    Some((program, number))
}

fn skip_whitespace(bytes: &[u8], pos: &mut usize) {
    while *pos < bytes.len() && bytes[*pos].is_ascii_whitespace() {
        *pos += 1;
    }
}
