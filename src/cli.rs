use crate::report::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "deadreq",
    version,
    about = "Flags Query/Command types without genuine production usage",
    after_help = r#"Examples:
  deadreq analyze --sln ./Billing.sln
  deadreq analyze --sln ./Billing.sln --format json --threads 4
  deadreq projects --sln ./Billing.sln
  deadreq candidates --sln ./Billing.sln --format json
"#
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Classify every candidate and print the isolated set.
    Analyze {
        /// Solution file; prompted for on stdin when omitted.
        #[arg(long)]
        sln: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
        /// Worker threads for classification; defaults to the CPU count.
        #[arg(long)]
        threads: Option<usize>,
        /// Include documents ignored by .gitignore.
        #[arg(long)]
        no_ignore: bool,
    },
    /// List the solution's projects with their labels.
    Projects {
        /// Solution file; prompted for on stdin when omitted.
        #[arg(long)]
        sln: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
        /// Include documents ignored by .gitignore.
        #[arg(long)]
        no_ignore: bool,
    },
    /// List the collected candidate set and load coverage.
    Candidates {
        /// Solution file; prompted for on stdin when omitted.
        #[arg(long)]
        sln: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
        /// Include documents ignored by .gitignore.
        #[arg(long)]
        no_ignore: bool,
    },
}
