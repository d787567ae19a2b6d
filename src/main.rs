use anyhow::{bail, Context, Result};
use std::path::Path;
use std::time::Instant;
use tft_s16_tables::{
    cli::{Cli, Commands},
    config::Settings,
    filter::resolve_datasets,
    logging::init_logging,
    pipeline::{build_canonical_tables, explode_file, normalize_file, process_dataset, split_file},
    schema::ALL_TABLES,
    split::SplitSpec,
    ui::{ConsoleUi, Ui},
    validate::{validate_dirs, ValidateOptions},
    writer::load_into_sqlite,
};

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Split {
            input,
            output,
            column,
            prefix,
            arity,
            delimiter,
            overflow,
            force,
        } => {
            if arity == 0 {
                bail!("--arity must be at least 1");
            }
            let prefix = prefix.unwrap_or_else(|| column.clone());
            let spec = SplitSpec::new(column, prefix, arity)
                .with_delimiter(delimiter)
                .with_overflow(overflow.into());

            let mut ui = ConsoleUi::new();
            let summary = split_file(&input, &output, &spec, force, &mut ui)
                .with_context(|| format!("Failed to split {:?}", input))?;
            ui.finish(&format!(
                "Wrote {:?} ({} rows, columns: {})",
                summary.output,
                summary.rows,
                summary.header.join(", ")
            ));
        }

        Commands::Process {
            data_dir,
            include,
            exclude,
            overflow,
            force,
        } => {
            let start = Instant::now();
            let tables = resolve_datasets(include, exclude)?;
            let settings = Settings::new(data_dir)
                .with_force(force)
                .with_overflow(overflow.into());

            let mut ui = ConsoleUi::new();
            let summaries = process_dataset(&settings, &tables, &mut ui)
                .context("Failed to process data directory")?;

            let rows: u64 = summaries.iter().map(|s| s.rows).sum();
            ui.finish(&format!(
                "Wrote {} split tables ({} rows) to {:?} in {:.1}s",
                summaries.len(),
                rows,
                settings.processed_dir(),
                start.elapsed().as_secs_f64()
            ));
        }

        Commands::Normalize {
            input,
            output,
            column,
            delimiter,
            force,
        } => {
            let mut ui = ConsoleUi::new();
            let rows = normalize_file(&input, &output, &column, &delimiter, force, &mut ui)
                .with_context(|| format!("Failed to normalize {:?}", input))?;
            ui.finish(&format!("Wrote {:?} ({} rows)", output, rows));
        }

        Commands::Explode {
            input,
            output,
            column,
            value_name,
            delimiter,
            force,
        } => {
            let mut ui = ConsoleUi::new();
            let rows = explode_file(
                &input,
                &output,
                &column,
                &delimiter,
                value_name.as_deref(),
                force,
                &mut ui,
            )
            .with_context(|| format!("Failed to explode {:?}", input))?;
            ui.finish(&format!("Wrote {:?} ({} rows)", output, rows));
        }

        Commands::Canonical {
            data_dir,
            label,
            win_threshold,
        } => {
            let settings = Settings::new(data_dir);
            let mut ui = ConsoleUi::new();
            let summary = build_canonical_tables(&settings, &label, win_threshold, &mut ui)
                .context("Failed to build canonical tables")?;
            ui.finish(&format!(
                "Wrote {} tables to {:?}",
                summary.files.len(),
                summary.output_dir
            ));
        }

        Commands::Validate {
            data_dir,
            include,
            exclude,
            expected_participants,
            strict,
            json,
        } => {
            let tables = resolve_datasets(include, exclude)?;
            let settings = Settings::new(data_dir);
            let opts = ValidateOptions {
                expected_participants,
                strict,
            };

            let [raw, processed] = settings.data_dirs();
            let dirs: [&Path; 2] = [&raw, &processed];
            let mut ui = ConsoleUi::new();
            let report = validate_dirs(&dirs, &tables, &opts, &mut ui)?;

            if json {
                ui.finish(&serde_json::to_string_pretty(&report)?);
            } else {
                for file in &report.files {
                    for error in &file.errors {
                        ui.log(format!("ERROR {}: {}", file.file, error));
                    }
                    for warning in &file.warnings {
                        ui.log(format!("WARN  {}: {}", file.file, warning));
                    }
                }
                ui.finish(&format!(
                    "Checked {} files: {} errors, {} warnings",
                    report.files.len(),
                    report.error_count(),
                    report.warning_count()
                ));
            }

            if !report.is_ok() {
                bail!("validation failed");
            }
        }

        Commands::Load {
            output_db,
            data_dir,
            include,
            exclude,
        } => {
            let start = Instant::now();
            let tables = resolve_datasets(include, exclude)?;
            let settings = Settings::new(data_dir);

            let [raw, processed] = settings.data_dirs();
            let dirs: [&Path; 2] = [&raw, &processed];
            let mut ui = ConsoleUi::new();
            let record_count = load_into_sqlite(&dirs, &output_db, &tables, &mut ui)?;

            ui.finish(&format!(
                "Created {:?} ({} records) in {:.1}s",
                output_db,
                record_count,
                start.elapsed().as_secs_f64()
            ));
        }

        Commands::ListDatasets => {
            println!("Available datasets:\n");
            for table in ALL_TABLES {
                println!("  {:14} {}", table.name, table.file_pattern());
            }
        }
    }

    Ok(())
}
