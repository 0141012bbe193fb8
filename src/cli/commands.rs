use crate::cli::args::{Cli, Commands};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{Table, COLUMN_CATALOG};
use crate::processors::{CleaningPipeline, CleaningReport};
use crate::readers::{ParameterClassReader, SiteReader};
use crate::utils::filename::{default_clean_filename, default_columns_filename};
use crate::utils::progress::ProgressReporter;
use crate::writers::{CsvExporter, ParquetWriter};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Process {
            input,
            sheet,
            output_file,
            metadata_file,
            config,
            parameter_classes,
            sites,
            parquet,
            compression,
            report,
            strict_units,
            validate_only,
        } => {
            let config = load_config(config.as_deref(), sheet.as_deref(), strict_units)?;
            // Fail on a bad compression name before doing any work
            let parquet_writer = match parquet {
                Some(path) => Some((ParquetWriter::new().with_compression(&compression)?, path)),
                None => None,
            };

            println!("Cleaning shellfish tissue data...");
            println!("Input: {} (sheet '{}')", input.display(), config.sheet_name);

            let mut pipeline = CleaningPipeline::new(config);
            if let Some(path) = parameter_classes {
                println!("Parameter classes: {}", path.display());
                pipeline = pipeline.with_parameter_classes(ParameterClassReader::read(&path)?);
            }
            if let Some(path) = sites {
                println!("Site locations: {}", path.display());
                pipeline = pipeline.with_sites(SiteReader::new().read_sites_map(&path)?);
            }

            let (table, cleaning_report) = clean(&pipeline, &input).await?;

            if let Some(path) = report {
                cleaning_report.write_json(&path)?;
                println!("Report written to {}", path.display());
            }

            if validate_only {
                println!("Validation complete - no output files written");
                return Ok(());
            }

            let output_file = output_file.unwrap_or_else(default_clean_filename);
            let metadata_file = metadata_file.unwrap_or_else(default_columns_filename);

            println!("Writing {} rows to {}...", table.len(), output_file.display());
            CsvExporter::new().export(&table, &output_file, &metadata_file)?;
            println!("Column descriptions written to {}", metadata_file.display());

            if let Some((writer, path)) = parquet_writer {
                writer.write_table(&table, &path)?;
                let file_info = writer.get_file_info(&path)?;
                println!("\n{}", file_info.summary());
            }

            println!("Processing complete!");
        }

        Commands::Validate {
            input,
            sheet,
            config,
        } => {
            let config = load_config(config.as_deref(), sheet.as_deref(), false)?;

            println!("Validating shellfish tissue data...");
            println!("Input: {} (sheet '{}')", input.display(), config.sheet_name);

            let pipeline = CleaningPipeline::new(config);
            let (_table, report) = clean(&pipeline, &input).await?;

            let unmatched = report.exceptions.unmatched().count();
            let unmapped = report.units.unmapped_rows();
            if report.integrity.is_clean() && unmatched == 0 && unmapped == 0 {
                println!("✅ All data passed validation checks");
            } else {
                println!(
                    "⚠️  Found {} integrity issues, {} unmatched exclusions, {} rows with unmapped units",
                    report.integrity.duplicate_records + report.integrity.violations.len(),
                    unmatched,
                    unmapped
                );
            }
        }

        Commands::Columns => {
            println!("Output columns:");
            for entry in COLUMN_CATALOG {
                let note = if entry.optional { " (optional)" } else { "" };
                println!("  {:<16} {}{}", entry.name, entry.description, note);
            }
        }
    }

    Ok(())
}

/// Run the pipeline behind a spinner and print the report.
async fn clean(pipeline: &CleaningPipeline, input: &Path) -> Result<(Table, CleaningReport)> {
    let progress = ProgressReporter::new_spinner("Reading source sheet...", false);

    let (table, report) = pipeline.run(input, Some(&progress)).await?;

    progress.finish_with_message(&format!(
        "Cleaned {} rows down to {}",
        report.loaded_rows, report.output_rows
    ));
    println!("\n{}", report.generate_summary());

    Ok((table, report))
}

fn load_config(path: Option<&Path>, sheet: Option<&str>, strict_units: bool) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::load(path)?;
    if let Some(sheet) = sheet {
        config = config.with_sheet_name(sheet);
    }
    if strict_units {
        config = config.with_strict_units(true);
    }
    Ok(config)
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    // A subscriber may already be installed when embedded; keep that one
    let _ = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    Ok(())
}
