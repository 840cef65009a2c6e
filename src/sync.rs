//! Run orchestration: reads the input tables, enriches the hourly rows,
//! aggregates sessions, and writes whichever outputs were requested.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::cohort::GroupDecoder;
use crate::error::{Result, ToolError};
use crate::io::{csv_read, csv_write, excel_read, excel_write};
use crate::lecturer::LecturerDirectory;
use crate::model::{ConvertOptions, EnrichedRow, RunReport, TimetableRow};
use crate::output;
use crate::session;
use crate::text;

/// File targets for one conversion run. Any subset may be requested, but
/// at least one must be.
#[derive(Debug, Clone, Default)]
pub struct OutputPaths {
    pub week_csv: Option<PathBuf>,
    pub week_xlsx: Option<PathBuf>,
    pub sessions_xlsx: Option<PathBuf>,
}

impl OutputPaths {
    pub fn is_empty(&self) -> bool {
        self.week_csv.is_none() && self.week_xlsx.is_none() && self.sessions_xlsx.is_none()
    }
}

/// Converts one timetable export end to end. Schema problems abort before
/// any output file is written; content anomalies are collected into the
/// returned [`RunReport`].
#[instrument(
    level = "info",
    skip_all,
    fields(timetable = %timetable.display(), codes = %codes.display())
)]
pub fn convert(
    timetable: &Path,
    codes: &Path,
    mapping: Option<&Path>,
    outputs: &OutputPaths,
    options: &ConvertOptions,
) -> Result<RunReport> {
    if outputs.is_empty() {
        return Err(ToolError::NoOutput);
    }

    let rows = csv_read::read_timetable(timetable)?;
    info!(row_count = rows.len(), "timetable rows loaded");

    let directory = excel_read::read_lecturer_codes(codes)?;
    info!(code_count = directory.len(), "lecturer directory built");

    let mapping_table = match mapping {
        Some(path) => {
            let table = excel_read::read_mapping_table(path)?;
            info!(entry_count = table.len(), "cohort mapping table loaded");
            Some(table)
        }
        None => None,
    };

    let decoder = GroupDecoder::new(
        options.intake_label.clone(),
        options.force_intake,
        mapping_table,
    );
    let (enriched, mut report) = enrich_rows(&rows, &directory, &decoder, options);

    if !report.unknown_codes.is_empty() {
        warn!(
            codes = ?report.unknown_codes,
            "lecturer codes missing from the code table; kept verbatim"
        );
    }

    let week = output::week_table(&enriched);
    if let Some(path) = &outputs.week_csv {
        csv_write::write_table(path, &week)?;
        info!(path = %path.display(), "weekly CSV written");
    }
    if let Some(path) = &outputs.week_xlsx {
        excel_write::write_tables(path, std::slice::from_ref(&week))?;
        info!(path = %path.display(), "weekly workbook written");
    }

    if let Some(path) = &outputs.sessions_xlsx {
        let aggregation = session::aggregate(&enriched);
        report.skipped_hours = aggregation.skipped_hours;
        report.sessions_formed = aggregation.sessions.len();

        if aggregation.skipped_hours > 0 {
            warn!(
                skipped = aggregation.skipped_hours,
                "hour values were not parseable as HH:MM"
            );
        }
        if aggregation.sessions.is_empty() && !enriched.is_empty() {
            return Err(ToolError::NoSessions);
        }

        let (entry, secondary) = output::session_block_tables(&aggregation.sessions, options);
        let mut tables = vec![entry];
        tables.extend(secondary);
        excel_write::write_tables(path, &tables)?;
        info!(
            path = %path.display(),
            session_count = report.sessions_formed,
            "session-block workbook written"
        );
    }

    Ok(report)
}

/// Resolves lecturer codes and renders group names for every row. Pure:
/// identical inputs produce identical outputs.
pub fn enrich_rows(
    rows: &[TimetableRow],
    directory: &LecturerDirectory,
    decoder: &GroupDecoder,
    options: &ConvertOptions,
) -> (Vec<EnrichedRow>, RunReport) {
    let mut report = RunReport::default();
    let mut enriched = Vec::with_capacity(rows.len());

    for row in rows {
        let resolved = directory.resolve(&row.teachers);
        report.unknown_codes.extend(resolved.unknown.iter().cloned());
        report.overflow_teachers += resolved.overflow.len();

        let mut comments = text::clean(&row.comments);
        if options.extras_to_comments && !resolved.overflow.is_empty() {
            let extras = format!("Extra lecturers: {}", resolved.overflow.join(" + "));
            comments = if comments.is_empty() {
                extras
            } else {
                format!("{comments} | {extras}")
            };
        }

        let students_sets = text::clean(&row.students_sets);
        let group_name = decoder.label(&students_sets);

        enriched.push(EnrichedRow {
            activity_id: row.activity_id.clone(),
            day: row.day.clone(),
            hour: row.hour.clone(),
            students_sets,
            group_name,
            subject: row.subject.clone(),
            teachers: resolved.primary,
            teacher1: resolved.secondary,
            activity_tags: row.activity_tags.clone(),
            room: row.room.clone(),
            comments,
        });
    }

    (enriched, report)
}
