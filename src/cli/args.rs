use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shellfish-cleaner")]
#[command(about = "Cleaning pipeline for shellfish tissue contaminant data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean a monitoring workbook and write the cleaned table
    Process {
        #[arg(short, long, help = "Input workbook (.xlsx, .xls, .xlsb, .ods) or CSV export")]
        input: PathBuf,

        #[arg(short, long, help = "Sheet to read [default: from configuration]")]
        sheet: Option<String>,

        #[arg(
            short,
            long,
            help = "Cleaned CSV path [default: output/shellfish-tissue-clean-{YYMMDD}.csv]"
        )]
        output_file: Option<PathBuf>,

        #[arg(
            short,
            long,
            help = "Column description CSV path [default: output/shellfish-tissue-columns-{YYMMDD}.csv]"
        )]
        metadata_file: Option<PathBuf>,

        #[arg(long, help = "TOML file layered over the built-in configuration")]
        config: Option<PathBuf>,

        #[arg(long, help = "Workbook or CSV mapping PARAMETER to CLASS")]
        parameter_classes: Option<PathBuf>,

        #[arg(long, help = "Delimited site location file")]
        sites: Option<PathBuf>,

        #[arg(long, help = "Also write the cleaned table as Parquet")]
        parquet: Option<PathBuf>,

        #[arg(short, long, default_value = "snappy")]
        compression: String,

        #[arg(long, help = "Write the cleaning report as JSON")]
        report: Option<PathBuf>,

        #[arg(long, default_value = "false", help = "Fail on unit labels with no conversion")]
        strict_units: bool,

        #[arg(long, default_value = "false")]
        validate_only: bool,
    },

    /// Run the pipeline and print the report without writing output
    Validate {
        #[arg(short, long, help = "Input workbook or CSV export")]
        input: PathBuf,

        #[arg(short, long)]
        sheet: Option<String>,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the output column catalogue
    Columns,
}
