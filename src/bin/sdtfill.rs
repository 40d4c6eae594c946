//! Command-line front end for filling report templates.

use clap::Parser;
use sdtfill::data::{self, ConsultantDirectory, ValueMap};
use sdtfill::report;
use std::path::PathBuf;
use std::process::ExitCode;

/// Fill tagged content controls in a Word report template from Excel data.
#[derive(Parser, Debug)]
#[command(name = "sdtfill", version, about)]
struct Cli {
    /// Report workbook with the Tags/Werte columns
    #[arg(long, value_name = "XLSX")]
    data: PathBuf,

    /// Word template whose content controls are filled
    #[arg(long, value_name = "DOCX")]
    template: PathBuf,

    /// Output path; derived from the building address when omitted
    #[arg(long, value_name = "DOCX")]
    output: Option<PathBuf>,

    /// Worksheet to read from the report workbook
    #[arg(long, value_name = "NAME")]
    sheet: Option<String>,

    /// Consultant directory workbook
    #[arg(long, value_name = "XLSX", requires = "consultant")]
    consultants: Option<PathBuf>,

    /// Consultant to select from the directory by name
    #[arg(long, value_name = "NAME", requires = "consultants")]
    consultant: Option<String>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        },
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let mut values = ValueMap::new();

    if let (Some(path), Some(name)) = (&cli.consultants, &cli.consultant) {
        let directory =
            ConsultantDirectory::from_path(path).map_err(|e| e.to_string())?;
        let record = directory
            .select(name)
            .ok_or_else(|| format!("consultant '{name}' not found in directory"))?;
        record.apply(&mut values);
    }

    // Workbook entries overwrite consultant fields on key collisions.
    let loaded = data::load_values_from_path(&cli.data, cli.sheet.as_deref())
        .map_err(|e| e.to_string())?;
    values.extend(loaded);

    let output = match &cli.output {
        Some(path) => path.clone(),
        None => PathBuf::from(format!("{}.docx", report::suggest_file_name(&values))),
    };

    let outcome = report::fill_report(&cli.template, &values, &output)
        .map_err(|e| e.to_string())?;

    println!("Report written to {}", output.display());
    if !outcome.missing.is_empty() {
        eprintln!("Unfilled placeholders:");
        for tag in outcome.missing.iter() {
            eprintln!("  {tag}");
        }
    }

    Ok(())
}
