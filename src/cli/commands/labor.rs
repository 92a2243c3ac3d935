//! `jqt labor` command - Labor rates

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::helpers::{confirm, display_ref, mutate, num, open_store, print_done};
use crate::cli::output::print_list;
use crate::cli::GlobalOpts;
use crate::core::store::LaborPatch;
use crate::entities::labor::{LaborRate, ShopCategory};

#[derive(Subcommand, Debug)]
pub enum LaborCommands {
    /// Add a labor rate
    Add(AddArgs),

    /// List labor rates
    List,

    /// Change a labor rate
    Update(UpdateArgs),

    /// Remove a labor rate
    Rm(RmArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Activity description (matched by keyword, e.g. "Cut", "Welding")
    pub description: String,

    /// Minutes per unit of work
    #[arg(long, short = 'm')]
    pub minutes: f64,

    /// wood_shop, metal_shop, glass_shop or other
    #[arg(long, short = 's')]
    pub shop: Option<ShopCategory>,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Labor rate ID or short ID (LAB@N)
    pub id: String,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, short = 'm')]
    pub minutes: Option<f64>,

    #[arg(long, short = 's')]
    pub shop: Option<ShopCategory>,
}

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    /// Labor rate ID or short ID (LAB@N)
    pub id: String,

    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Tabled, Serialize)]
struct LaborRow {
    #[tabled(rename = "SHORT")]
    short: String,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
    #[tabled(rename = "SHOP")]
    shop: String,
    #[tabled(rename = "MIN/UNIT")]
    minutes: String,
}

pub fn run(cmd: LaborCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        LaborCommands::Add(args) => run_add(args),
        LaborCommands::List => run_list(global),
        LaborCommands::Update(args) => run_update(args),
        LaborCommands::Rm(args) => run_rm(args),
    }
}

fn run_add(args: AddArgs) -> Result<()> {
    let rate = LaborRate::new(args.description, args.minutes, args.shop);
    let label = rate.description.clone();
    let (store, id) = mutate(|store| Ok(store.add_labor_rate(rate)?.id))?;
    print_done("Added", "labor rate", &display_ref(&store, &id), &label);
    Ok(())
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let (_, store) = open_store()?;
    let rates = store.labor_rates();
    let rows: Vec<LaborRow> = rates
        .iter()
        .map(|r| LaborRow {
            short: display_ref(&store, &r.id),
            description: r.description.clone(),
            shop: r
                .category
                .map(|c| c.to_string())
                .unwrap_or_else(|| "wood_shop".to_string()),
            minutes: num(r.minutes_per_unit),
        })
        .collect();
    let ids: Vec<String> = rates.iter().map(|r| r.id.to_string()).collect();
    print_list(rates, &rows, &ids, global.output, "labor rates")
}

fn run_update(args: UpdateArgs) -> Result<()> {
    let patch = LaborPatch {
        description: args.description,
        minutes_per_unit: args.minutes,
        category: args.shop,
    };
    let (store, id) = mutate(|store| Ok(store.update_labor_rate(&args.id, patch)?.id))?;
    print_done("Updated", "labor rate", &display_ref(&store, &id), "");
    Ok(())
}

fn run_rm(args: RmArgs) -> Result<()> {
    if !confirm(&format!("Remove labor rate {}?", args.id), args.yes)? {
        println!("{}", style("Cancelled").dim());
        return Ok(());
    }
    let (_, rate) = mutate(|store| Ok(store.remove_labor_rate(&args.id)?))?;
    print_done("Removed", "labor rate", &args.id, &rate.description);
    Ok(())
}
