//! Command-line argument definitions

use clap::{Parser, Subcommand, ValueEnum};
use tracing::warn;

use crate::cli::commands::bom::BomArgs;
use crate::cli::commands::catalog::CatalogCommands;
use crate::cli::commands::category::CategoryCommands;
use crate::cli::commands::completions::CompletionsArgs;
use crate::cli::commands::cost::CostCommands;
use crate::cli::commands::fixed::FixedCommands;
use crate::cli::commands::hw::HwCommands;
use crate::cli::commands::init::InitArgs;
use crate::cli::commands::installments::InstallmentsArgs;
use crate::cli::commands::labor::LaborCommands;
use crate::cli::commands::piece::PieceCommands;
use crate::cli::commands::proposal::ProposalCommands;
use crate::cli::commands::rate::RateCommands;
use crate::cli::commands::reset::ResetArgs;
use crate::cli::commands::service::ServiceCommands;
use crate::cli::commands::settings::SettingsCommands;
use crate::cli::commands::stats::StatsArgs;

#[derive(Parser, Debug)]
#[command(name = "jqt")]
#[command(version, about = "Joinery Quote Toolkit - cost and price custom furniture jobs")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted by every subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'o', global = true, default_value = "auto")]
    pub output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl GlobalOpts {
    /// Replace `auto` with the configured `default_format`, if any
    pub fn apply_default_format(&mut self, configured: Option<&str>) {
        if self.output != OutputFormat::Auto {
            return;
        }
        let Some(name) = configured else {
            return;
        };
        match <OutputFormat as ValueEnum>::from_str(name, true) {
            Ok(format) => self.output = format,
            Err(_) => warn!(format = name, "ignoring unknown default_format in config"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table for lists, summary for single records
    Auto,
    Table,
    Json,
    Yaml,
    Csv,
    /// Full IDs only, one per line
    Id,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new quote project in the current directory
    Init(InitArgs),

    /// Cut pieces on the cutting sheet
    #[command(subcommand)]
    Piece(PieceCommands),

    /// Hardware fitted to this job (copied from the catalog)
    #[command(subcommand)]
    Hw(HwCommands),

    /// Standard hardware bundles fitted to every job
    #[command(subcommand)]
    Fixed(FixedCommands),

    /// Materials and hardware catalog
    #[command(subcommand)]
    Catalog(CatalogCommands),

    /// Labor rates (minutes per unit of work)
    #[command(subcommand)]
    Labor(LaborCommands),

    /// Fixed monthly costs
    #[command(subcommand)]
    Cost(CostCommands),

    /// Card installment fee tiers
    #[command(subcommand)]
    Rate(RateCommands),

    /// Additional services billed with the job
    #[command(subcommand)]
    Service(ServiceCommands),

    /// Product categories and their ideal margins
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Margin, overhead and company settings
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Compute costs, price and profitability
    Stats(StatsArgs),

    /// Bill of materials
    Bom(BomArgs),

    /// Card installment options for the current price
    Installments(InstallmentsArgs),

    /// Saved proposals
    #[command(subcommand)]
    Proposal(ProposalCommands),

    /// Start a new quote, keeping catalogs and settings
    Reset(ResetArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(output: OutputFormat) -> GlobalOpts {
        GlobalOpts { output, verbose: 0 }
    }

    #[test]
    fn test_default_format_fills_auto() {
        let mut g = opts(OutputFormat::Auto);
        g.apply_default_format(Some("JSON"));
        assert_eq!(g.output, OutputFormat::Json);
    }

    #[test]
    fn test_explicit_format_beats_config() {
        let mut g = opts(OutputFormat::Csv);
        g.apply_default_format(Some("json"));
        assert_eq!(g.output, OutputFormat::Csv);
    }

    #[test]
    fn test_unknown_default_format_is_ignored() {
        let mut g = opts(OutputFormat::Auto);
        g.apply_default_format(Some("xml"));
        assert_eq!(g.output, OutputFormat::Auto);
        g.apply_default_format(None);
        assert_eq!(g.output, OutputFormat::Auto);
    }
}
