use analytics::{ProfitLevel, TrendPeriod};
use clap::{Parser, Subcommand, ValueEnum};
use configuration::{Config, OutputFormat, SourceKind};
use std::path::PathBuf;

/// Descriptive reports over an online retailer's sales table.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file. Defaults to `config.toml` in the working directory, if present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Where to read the sales table from.
    #[arg(long, value_enum, global = true)]
    pub source: Option<SourceKind>,

    /// Path of a file export. Implies `--source csv`.
    #[arg(long, global = true)]
    pub csv: Option<PathBuf>,

    /// How reports are printed.
    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Size of the most-profitable-customers ranking.
    #[arg(long, global = true)]
    pub top: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Count missing and unparseable values per column.
    Audit,
    /// List the shipping delay of every record.
    Delays {
        /// Only records shipped on the day they were ordered.
        #[arg(long)]
        same_day: bool,
    },
    /// Minimum, maximum and average delay per state.
    Delivery,
    /// Order counts over time.
    Trends {
        #[arg(long, value_enum, default_value_t = Period::Yearly)]
        period: Period,
    },
    /// Sales, profit and margin per product category.
    Profitability {
        #[arg(long, value_enum, default_value_t = Level::Category)]
        level: Level,
    },
    /// Customer counts, repeat customers and the most profitable customers.
    Customers,
    /// The single-row KPI summary.
    Kpi,
    /// Every report at once.
    All,
    /// Rewrite the date columns of the database table to YYYY-MM-DD.
    NormalizeDates,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Period {
    Yearly,
    Quarterly,
    Monthly,
}

impl From<Period> for TrendPeriod {
    fn from(period: Period) -> Self {
        match period {
            Period::Yearly => TrendPeriod::Yearly,
            Period::Quarterly => TrendPeriod::Quarterly,
            Period::Monthly => TrendPeriod::Monthly,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Category,
    SubCategory,
}

impl From<Level> for ProfitLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Category => ProfitLevel::Category,
            Level::SubCategory => ProfitLevel::SubCategory,
        }
    }
}

impl Cli {
    /// Command-line flags win over the configuration file and environment.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(kind) = self.source {
            config.source.kind = kind;
        }
        if let Some(path) = &self.csv {
            config.source.kind = SourceKind::Csv;
            config.source.csv_path = path.clone();
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(top) = self.top {
            config.reports.top_customers = top;
        }
    }
}
