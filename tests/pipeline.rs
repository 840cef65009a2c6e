use timetable_tools::cohort::{GroupDecoder, MappingRow, MappingTable, decode_pattern};
use timetable_tools::lecturer::LecturerDirectory;
use timetable_tools::model::{AllFaculties, ConvertOptions, EnrichedRow, SecondaryPlacement};
use timetable_tools::output::{
    SESSION_BLOCK_COLUMNS, WEEK_COLUMNS, infer_course_variant, session_block_tables, week_table,
};
use timetable_tools::session::{aggregate, parse_hour};
use timetable_tools::text;

fn sample_directory() -> LecturerDirectory {
    LecturerDirectory::from_rows(vec![
        ("BALA".to_string(), "Alice Lee".to_string()),
        ("SHK".to_string(), "Sam Kim".to_string()),
    ])
}

fn enriched(hour: &str) -> EnrichedRow {
    EnrichedRow {
        activity_id: "1".to_string(),
        day: "Mon".to_string(),
        hour: hour.to_string(),
        students_sets: "L5 CS -G1".to_string(),
        group_name: "L5 Jan 26 CS- 1".to_string(),
        subject: "Algebra".to_string(),
        teachers: "Alice Lee".to_string(),
        teacher1: "Sam Kim".to_string(),
        activity_tags: "LEC".to_string(),
        room: "R1".to_string(),
        comments: String::new(),
    }
}

#[test]
fn clean_collapses_whitespace_and_trims() {
    assert_eq!(text::clean("  a   b "), "a b");
    assert_eq!(text::clean("\t x \n y \t"), "x y");
    assert_eq!(text::clean(""), "");
    assert_eq!(text::clean_opt(None), "");
    assert_eq!(text::clean_opt(Some("  a  b ")), "a b");
}

#[test]
fn clean_is_idempotent() {
    let messy = "  L5   CS  -G1 ";
    assert_eq!(text::clean(&text::clean(messy)), text::clean(messy));
}

#[test]
fn resolver_maps_first_two_codes_into_slots() {
    let resolved = sample_directory().resolve("BALA+SHK");
    assert_eq!(resolved.primary, "Alice Lee");
    assert_eq!(resolved.secondary, "Sam Kim");
    assert!(resolved.overflow.is_empty());
    assert!(resolved.unknown.is_empty());
}

#[test]
fn resolver_keeps_unknown_codes_verbatim() {
    let resolved = sample_directory().resolve("BALA+SHK+XYZ");
    assert_eq!(resolved.primary, "Alice Lee");
    assert_eq!(resolved.secondary, "Sam Kim");
    assert_eq!(resolved.overflow, vec!["XYZ".to_string()]);
    assert_eq!(resolved.unknown, vec!["XYZ".to_string()]);
}

#[test]
fn resolver_handles_empty_input() {
    let resolved = sample_directory().resolve("");
    assert_eq!(resolved.primary, "");
    assert_eq!(resolved.secondary, "");
    assert!(resolved.overflow.is_empty());
    assert!(resolved.unknown.is_empty());
}

#[test]
fn resolver_is_case_insensitive_on_codes() {
    let resolved = sample_directory().resolve(" bala + shk ");
    assert_eq!(resolved.primary, "Alice Lee");
    assert_eq!(resolved.secondary, "Sam Kim");
}

#[test]
fn directory_keeps_first_occurrence_and_drops_blanks() {
    let directory = LecturerDirectory::from_rows(vec![
        ("BALA".to_string(), "Alice Lee".to_string()),
        ("bala ".to_string(), "Someone Else".to_string()),
        ("NONAME".to_string(), "  ".to_string()),
    ]);
    assert_eq!(directory.len(), 1);
    assert_eq!(directory.get("bala"), Some("Alice Lee"));
    assert_eq!(directory.get("NONAME"), None);
}

#[test]
fn pattern_decoding_accumulates_groups_per_program() {
    let set = decode_pattern("L5 CS -G1+L5 CS -G2+L5 CS -G21+L5 SE -G10");
    assert_eq!(set.programs(), vec!["SE", "CS"]);
    assert_eq!(set.numbers("CS"), vec![1, 2, 21]);
    assert_eq!(set.numbers("SE"), vec![10]);
}

#[test]
fn pattern_decoding_deduplicates_group_numbers() {
    let set = decode_pattern("L5 CS -G2+L5 CS -G2");
    assert_eq!(set.numbers("CS"), vec![2]);
}

#[test]
fn pattern_decoding_accepts_grammar_variations() {
    // Other single-letter prefixes, missing dashes, ampersand programs,
    // lowercase input.
    assert_eq!(decode_pattern("L5 CS -A3").numbers("CS"), vec![3]);
    assert_eq!(decode_pattern("L5 SE G4").numbers("SE"), vec![4]);
    assert_eq!(decode_pattern("L5 AI&DS -G7").numbers("AI&DS"), vec![7]);
    assert_eq!(decode_pattern("l5 cs -g9").numbers("CS"), vec![9]);
}

#[test]
fn pattern_decoding_skips_unrecognized_segments() {
    assert!(decode_pattern("Whole class evening").is_empty());
    assert!(decode_pattern("").is_empty());
    let set = decode_pattern("L5 CS -G1+garbage 123");
    assert_eq!(set.programs(), vec!["CS"]);
}

#[test]
fn label_orders_se_before_cs_with_ascending_numbers() {
    let decoder = GroupDecoder::new("L5 Jan 26", false, None);
    assert_eq!(
        decoder.label("L5 CS -G1+L5 CS -G2+L5 SE -G10"),
        "L5 Jan 26 SE- 10 / L5 Jan 26 CS- 1,2"
    );
}

#[test]
fn label_falls_back_to_normalized_raw_text() {
    let decoder = GroupDecoder::new("L5 Jan 26", false, None);
    assert_eq!(decoder.label("Evening  batch"), "L5 Jan 26 Evening batch");
    assert_eq!(decoder.label("   "), "");
}

fn sample_mapping() -> MappingTable {
    MappingTable::from_rows(vec![
        MappingRow {
            students_sets: "L5 CS -G1+L5 SE -G10".to_string(),
            level: "L5".to_string(),
            intake: "Jan 25".to_string(),
            program: "CS".to_string(),
            groups: "1".to_string(),
        },
        MappingRow {
            students_sets: "L5 CS -G1+L5 SE -G10".to_string(),
            level: "L5".to_string(),
            intake: "Jan 25".to_string(),
            program: "SE".to_string(),
            groups: "10".to_string(),
        },
    ])
}

#[test]
fn mapping_table_wins_over_pattern_decoding() {
    let decoder = GroupDecoder::new("L5 Jan 26", false, Some(sample_mapping()));
    assert_eq!(
        decoder.label("L5 CS -G1+L5 SE -G10"),
        "L5 Jan 25 SE- 10 / L5 Jan 25 CS- 1"
    );
}

#[test]
fn mapping_misses_fall_through_to_pattern_decoding() {
    let decoder = GroupDecoder::new("L5 Jan 26", false, Some(sample_mapping()));
    assert_eq!(decoder.label("L5 CS -G7"), "L5 Jan 26 CS- 7");
}

#[test]
fn intake_override_replaces_mapping_prefix() {
    let decoder = GroupDecoder::new("L5 Jan 26", true, Some(sample_mapping()));
    assert_eq!(
        decoder.label("L5 CS -G1+L5 SE -G10"),
        "L5 Jan 26 SE- 10 / L5 Jan 26 CS- 1"
    );
}

#[test]
fn intake_override_leaves_unmatched_prefixes_alone() {
    let table = MappingTable::from_rows(vec![MappingRow {
        students_sets: "Foundation block".to_string(),
        level: "Foundation".to_string(),
        intake: "Spring".to_string(),
        program: "FD".to_string(),
        groups: "1".to_string(),
    }]);
    let decoder = GroupDecoder::new("L5 Jan 26", true, Some(table));
    assert_eq!(decoder.label("Foundation block"), "Foundation Spring FD- 1");
}

#[test]
fn mapping_duplicate_program_rows_keep_first() {
    let table = MappingTable::from_rows(vec![
        MappingRow {
            students_sets: "L5 CS -G1".to_string(),
            level: "L5".to_string(),
            intake: "Jan 25".to_string(),
            program: "CS".to_string(),
            groups: "1".to_string(),
        },
        MappingRow {
            students_sets: "L5 CS -G1".to_string(),
            level: "L5".to_string(),
            intake: "Jan 25".to_string(),
            program: "CS".to_string(),
            groups: "99".to_string(),
        },
    ]);
    let decoder = GroupDecoder::new("L5 Jan 26", false, Some(table));
    assert_eq!(decoder.label("L5 CS -G1"), "L5 Jan 25 CS- 1");
}

#[test]
fn hours_parse_as_times_of_day() {
    assert!(parse_hour("08:30").is_some());
    assert!(parse_hour(" 14:00 ").is_some());
    assert!(parse_hour("evening").is_none());
    assert!(parse_hour("").is_none());
}

#[test]
fn aggregation_merges_consecutive_hours_into_one_span() {
    let rows = vec![enriched("08:00"), enriched("09:00"), enriched("10:00")];
    let aggregation = aggregate(&rows);
    assert_eq!(aggregation.sessions.len(), 1);
    let session = &aggregation.sessions[0];
    assert_eq!(session.from_slot(), "08:00:00");
    assert_eq!(session.to_slot(), "11:00:00");
    assert_eq!(aggregation.skipped_hours, 0);
}

#[test]
fn aggregation_deduplicates_repeated_hours() {
    let rows = vec![enriched("08:00"), enriched("08:00")];
    let aggregation = aggregate(&rows);
    assert_eq!(aggregation.sessions.len(), 1);
    assert_eq!(aggregation.sessions[0].to_slot(), "09:00:00");
}

#[test]
fn aggregation_drops_groups_without_parseable_hours() {
    let rows = vec![enriched(""), enriched("   ")];
    let aggregation = aggregate(&rows);
    assert!(aggregation.sessions.is_empty());
    assert_eq!(aggregation.skipped_hours, 0);
}

#[test]
fn aggregation_counts_malformed_hours_but_keeps_the_session() {
    let rows = vec![enriched("08:00"), enriched("nope")];
    let aggregation = aggregate(&rows);
    assert_eq!(aggregation.sessions.len(), 1);
    assert_eq!(aggregation.sessions[0].to_slot(), "09:00:00");
    assert_eq!(aggregation.skipped_hours, 1);
}

#[test]
fn aggregation_separates_rows_with_different_keys() {
    let mut other = enriched("08:00");
    other.room = "R2".to_string();
    let rows = vec![enriched("08:00"), other];
    let aggregation = aggregate(&rows);
    assert_eq!(aggregation.sessions.len(), 2);
}

#[test]
fn course_variant_rules_apply_in_order() {
    assert_eq!(infer_course_variant("LEC"), "Lecture");
    assert_eq!(infer_course_variant("weekly lab"), "Lab");
    assert_eq!(infer_course_variant("TUTORIAL"), "Tutorial");
    assert_eq!(infer_course_variant("LAB & LEC"), "Lab");
    assert_eq!(infer_course_variant(""), "");
    assert_eq!(infer_course_variant("seminar"), "");
}

#[test]
fn week_table_uses_the_fixed_column_order() {
    let table = week_table(&[enriched("08:30")]);
    assert_eq!(table.sheet_name, "ERP");
    assert_eq!(table.columns, WEEK_COLUMNS);
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0][0], "1");
    assert_eq!(table.rows[0][4], "L5 Jan 26 CS- 1");
    assert_eq!(table.rows[0][7], "Sam Kim");
}

#[test]
fn session_blocks_append_the_secondary_teacher_inline() {
    let aggregation = aggregate(&[enriched("08:30")]);
    let options = ConvertOptions::default();
    let (primary, secondary) = session_block_tables(&aggregation.sessions, &options);

    assert_eq!(primary.sheet_name, "EntrySheet");
    assert_eq!(primary.columns, SESSION_BLOCK_COLUMNS);
    assert!(secondary.is_none());
    assert_eq!(primary.rows.len(), 2);

    let base = &primary.rows[0];
    assert_eq!(base[0], ""); // Cal Id
    assert_eq!(base[1], "Algebra");
    assert_eq!(base[2], "Lecture");
    assert_eq!(base[3], "L5 Jan 26 CS- 1");
    assert_eq!(base[5], "Alice Lee");
    assert_eq!(base[7], "08:30:00");
    assert_eq!(base[8], "09:30:00");
    assert_eq!(base[9], ""); // AcademyLocationID
    assert_eq!(base[10], "FALSE");
    assert_eq!(primary.rows[1][5], "Sam Kim");
}

#[test]
fn session_blocks_route_the_secondary_teacher_to_its_own_sheet() {
    let aggregation = aggregate(&[enriched("08:30")]);
    let options = ConvertOptions {
        secondary: SecondaryPlacement::Separate,
        all_faculties: AllFaculties::True,
        ..ConvertOptions::default()
    };
    let (primary, secondary) = session_block_tables(&aggregation.sessions, &options);

    assert_eq!(primary.rows.len(), 1);
    assert_eq!(primary.rows[0][10], "TRUE");
    let secondary = secondary.expect("secondary sheet present");
    assert_eq!(secondary.sheet_name, "CBS2");
    assert_eq!(secondary.rows.len(), 1);
    assert_eq!(secondary.rows[0][5], "Sam Kim");
}

#[test]
fn session_blocks_can_skip_the_secondary_teacher() {
    let aggregation = aggregate(&[enriched("08:30")]);
    let options = ConvertOptions {
        secondary: SecondaryPlacement::Skip,
        ..ConvertOptions::default()
    };
    let (primary, secondary) = session_block_tables(&aggregation.sessions, &options);
    assert_eq!(primary.rows.len(), 1);
    assert!(secondary.is_none());
}

#[test]
fn options_deserialize_from_json_with_defaults() {
    let options: ConvertOptions = serde_json::from_str(
        r#"{"intake_label": "L6 Sep 26", "secondary": "separate", "all_faculties": "TRUE"}"#,
    )
    .expect("options parsed");
    assert_eq!(options.intake_label, "L6 Sep 26");
    assert_eq!(options.secondary, SecondaryPlacement::Separate);
    assert_eq!(options.all_faculties, AllFaculties::True);
    // Unspecified fields keep the defaults.
    assert!(options.extras_to_comments);
    assert!(!options.force_intake);
}
