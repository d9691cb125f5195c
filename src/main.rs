use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use dti_explorer::session::{DashboardView, Detail, Session};
use dti_explorer::stats::{fmt_stat, Overview};
use dti_explorer::{ColumnMap, Selection};

#[derive(Parser)]
#[command(
    name = "dti-explorer",
    about = "Query company digital transformation index data by company and year"
)]
struct Cli {
    /// Dataset file (.csv, .json or .parquet).
    file: PathBuf,

    /// Company identifier (stock code). Without it only the overview is shown.
    #[arg(long)]
    company: Option<String>,

    /// Year for the detail view. Omit for the all-years view.
    #[arg(long, requires = "company")]
    year: Option<i32>,

    /// Header mapping: `canonical`, `annual-report`, or a JSON file.
    /// Detected from the headers when omitted.
    #[arg(long)]
    columns: Option<String>,

    /// Print JSON instead of text.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mapping = match cli.columns.as_deref() {
        None => None,
        Some("canonical") => Some(ColumnMap::canonical()),
        Some("annual-report") => Some(ColumnMap::annual_report()),
        Some(path) => {
            let path = PathBuf::from(path);
            if !path.exists() {
                bail!("column map {} not found", path.display());
            }
            Some(ColumnMap::from_json_file(&path)?)
        }
    };

    let session = Session::load(&cli.file, mapping.as_ref())?;

    match cli.company {
        None => {
            let overview = Overview::compute(session.index());
            if cli.json {
                let out = serde_json::json!({
                    "overview": overview,
                    "choices": session.choices(),
                    "structure": session.structure(),
                    "distribution": session.distribution(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print_overview(&overview);
                let structure = session.structure();
                println!("\nColumns ({}):", structure.columns.len());
                for col in &structure.columns {
                    println!("  - {} ({} distinct)", col.name, col.distinct_values);
                }
            }
        }
        Some(company_id) => {
            let selection = Selection {
                company_id,
                year: cli.year,
            };
            let view = session.view(&selection);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_view(&view);
            }
        }
    }

    Ok(())
}

fn print_overview(o: &Overview) {
    println!("Records:   {}", o.record_count);
    println!("Companies: {}", o.company_count);
    match o.year_range {
        Some((first, last)) => println!("Years:     {first}-{last}"),
        None => println!("Years:     N/A"),
    }
    println!("Mean index: {}", fmt_stat(o.mean_index));
    println!("Max index:  {}", fmt_stat(o.max_index));
    println!("Min index:  {}", fmt_stat(o.min_index));
}

fn print_view(view: &DashboardView) {
    print_overview(&view.overview);

    let name = view.company_name.as_deref().unwrap_or("unknown company");
    println!("\n{name} ({})", view.selection.company_id);
    println!("{}", view.history_statistics);

    if view.series.is_empty() {
        println!("No data for this company.");
    } else {
        println!("\nyear  index  technology  application");
        for i in 0..view.series.len() {
            println!(
                "{}  {:.2}  {:.2}  {:.2}",
                view.series.years[i],
                view.series.digital_transformation_index[i],
                view.series.technology_dimension[i],
                view.series.application_dimension[i],
            );
        }
    }

    match (&view.detail, view.selection.year) {
        (Detail::Found(detail), _) => {
            println!("\nKeyword frequencies, {}:", detail.record.year);
            for (category, count) in &detail.frequencies {
                println!("  {category}: {count}");
            }
        }
        (Detail::Absent, Some(year)) => println!("\nNo record for {year}."),
        _ => {}
    }
}
