use crate::core::presenter::OutputFormat;
use crate::domain::model::DetailKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "gbizinfo")]
#[command(version, about = "Query the gBizINFO company registry")]
pub struct CliConfig {
    /// TOML config file (falls back to GBIZINFO_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log HTTP requests and responses as JSON")]
    pub debug: bool,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search companies by name
    Search {
        name: String,
        /// Page number (1-based)
        from: Option<u32>,
        /// Results per page
        size: Option<u32>,
    },
    /// Composite search with a JSON filter
    Find {
        #[arg(long, help = r#"Filter as camelCase JSON, e.g. '{"prefecture":"13"}'"#)]
        filter: String,
    },
    /// Fetch per-company information by corporate number
    Lookup {
        #[arg(value_enum)]
        kind: DetailKind,
        corporate_number: String,
    },
    /// Companies updated within a period
    Updates {
        #[arg(long, help = "Start date (YYYYMMDD)")]
        from: String,
        #[arg(long, help = "End date (YYYYMMDD)")]
        to: String,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long, value_enum, default_value_t = DetailKind::Basic)]
        kind: DetailKind,
    },
}
