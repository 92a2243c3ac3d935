//! `jqt rate` command - Card installment fee tiers

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::helpers::{confirm, mutate, num, open_store};
use crate::cli::output::print_list;
use crate::cli::GlobalOpts;
use crate::entities::card_rate::ANCHOR_INSTALLMENTS;

#[derive(Subcommand, Debug)]
pub enum RateCommands {
    /// Set the fee for an installment count (adds or replaces)
    Add(AddArgs),

    /// List card tiers
    List,

    /// Remove a tier by installment count (e.g. 3x) or ID
    Rm(RmArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Number of installments
    pub installments: u32,

    /// Fee percent charged by the card processor
    pub fee: f64,
}

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    /// Installment count with an x suffix (3x), RATE@N, or ID
    pub reference: String,

    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Tabled, Serialize)]
struct RateRow {
    #[tabled(rename = "INSTALLMENTS")]
    installments: String,
    #[tabled(rename = "FEE %")]
    fee_percent: String,
    #[tabled(rename = "ANCHOR")]
    anchor: String,
}

pub fn run(cmd: RateCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        RateCommands::Add(args) => run_add(args),
        RateCommands::List => run_list(global),
        RateCommands::Rm(args) => run_rm(args),
    }
}

fn run_add(args: AddArgs) -> Result<()> {
    mutate(|store| Ok(store.set_card_rate(args.installments, args.fee)?.installments))?;
    println!(
        "{} Set {}x card fee to {}%",
        style("✓").green(),
        style(args.installments).cyan(),
        args.fee
    );
    Ok(())
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let (_, store) = open_store()?;
    let tiers = store.card_rates();
    let rows: Vec<RateRow> = tiers
        .iter()
        .map(|t| RateRow {
            installments: format!("{}x", t.installments),
            fee_percent: num(t.fee_percent),
            anchor: if t.installments == ANCHOR_INSTALLMENTS {
                "*".to_string()
            } else {
                String::new()
            },
        })
        .collect();
    let ids: Vec<String> = tiers.iter().map(|t| t.id.to_string()).collect();
    print_list(tiers, &rows, &ids, global.output, "card tiers")
}

fn run_rm(args: RmArgs) -> Result<()> {
    if !confirm(&format!("Remove card tier {}?", args.reference), args.yes)? {
        println!("{}", style("Cancelled").dim());
        return Ok(());
    }
    let (_, tier) = mutate(|store| Ok(store.remove_card_rate(&args.reference)?))?;
    println!(
        "{} Removed {}x card tier",
        style("✓").green(),
        style(tier.installments).cyan()
    );
    Ok(())
}
