use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use timetable_tools::model::{AllFaculties, ConvertOptions, SecondaryPlacement};
use timetable_tools::sync::{self, OutputPaths};
use timetable_tools::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging()?;
    match cli.command {
        Command::Convert(args) => execute_convert(args),
    }
}

fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn execute_convert(args: ConvertArgs) -> Result<()> {
    let inputs = [
        Some(&args.timetable),
        Some(&args.codes),
        args.mapping.as_ref(),
        args.options.as_ref(),
    ];
    for input in inputs.into_iter().flatten() {
        if !input.exists() {
            return Err(ToolError::MissingInput(input.clone()));
        }
    }

    let options = args.resolve_options()?;
    let outputs = OutputPaths {
        week_csv: args.week_csv.clone(),
        week_xlsx: args.week_xlsx.clone(),
        sessions_xlsx: args.sessions_xlsx.clone(),
    };

    let report = sync::convert(
        &args.timetable,
        &args.codes,
        args.mapping.as_deref(),
        &outputs,
        &options,
    )?;

    if !report.unknown_codes.is_empty() {
        let codes: Vec<String> = report.unknown_codes.iter().cloned().collect();
        eprintln!(
            "warning: lecturer codes not found in the code table (kept as-is): {}",
            codes.join(", ")
        );
    }
    if report.overflow_teachers > 0 && !options.extras_to_comments {
        eprintln!(
            "warning: {} lecturer entries beyond Teacher1 were dropped (pass --extras-to-comments true to keep them in Comments)",
            report.overflow_teachers
        );
    }
    if report.skipped_hours > 0 {
        eprintln!(
            "warning: {} Hour values could not be parsed as HH:MM and were excluded from session spans",
            report.skipped_hours
        );
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Convert hourly timetable exports into ERP and scheduling-template outputs."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert one timetable export into the requested outputs.
    Convert(ConvertArgs),
}

#[derive(clap::Args)]
struct ConvertArgs {
    /// Hourly timetable export (CSV).
    #[arg(long)]
    timetable: PathBuf,

    /// Lecturer code workbook (columns: Code, User name).
    #[arg(long)]
    codes: PathBuf,

    /// Cohort mapping workbook (columns: Students Sets, Level, Intake,
    /// Program, Groups).
    #[arg(long)]
    mapping: Option<PathBuf>,

    /// JSON file with conversion options; explicit flags win over it.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Intake label prefixed onto rendered group names.
    #[arg(long)]
    intake: Option<String>,

    /// Force the intake label over the one embedded in mapping-table
    /// labels.
    #[arg(long)]
    force_intake: bool,

    /// Append third-and-later lecturers into the Comments column.
    #[arg(long)]
    extras_to_comments: Option<bool>,

    /// Where duplicated session-block rows for the secondary teacher go.
    #[arg(long, value_enum)]
    secondary: Option<SecondaryArg>,

    /// Default value for the isAllFaculties column.
    #[arg(long, value_enum)]
    all_faculties: Option<AllFacultiesArg>,

    /// Weekly export CSV path.
    #[arg(long)]
    week_csv: Option<PathBuf>,

    /// Weekly export workbook path.
    #[arg(long)]
    week_xlsx: Option<PathBuf>,

    /// Session-block workbook path.
    #[arg(long)]
    sessions_xlsx: Option<PathBuf>,
}

impl ConvertArgs {
    fn resolve_options(&self) -> Result<ConvertOptions> {
        let mut options = match &self.options {
            Some(path) => load_options(path)?,
            None => ConvertOptions::default(),
        };

        if let Some(intake) = &self.intake {
            options.intake_label = intake.clone();
        }
        options.force_intake = options.force_intake || self.force_intake;
        if let Some(extras) = self.extras_to_comments {
            options.extras_to_comments = extras;
        }
        if let Some(secondary) = self.secondary {
            options.secondary = secondary.into();
        }
        if let Some(all_faculties) = self.all_faculties {
            options.all_faculties = all_faculties.into();
        }
        Ok(options)
    }
}

fn load_options(path: &PathBuf) -> Result<ConvertOptions> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SecondaryArg {
    Skip,
    Append,
    Separate,
}

impl From<SecondaryArg> for SecondaryPlacement {
    fn from(arg: SecondaryArg) -> Self {
        match arg {
            SecondaryArg::Skip => SecondaryPlacement::Skip,
            SecondaryArg::Append => SecondaryPlacement::Append,
            SecondaryArg::Separate => SecondaryPlacement::Separate,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum AllFacultiesArg {
    True,
    False,
}

impl From<AllFacultiesArg> for AllFaculties {
    fn from(arg: AllFacultiesArg) -> Self {
        match arg {
            AllFacultiesArg::True => AllFaculties::True,
            AllFacultiesArg::False => AllFaculties::False,
        }
    }
}
