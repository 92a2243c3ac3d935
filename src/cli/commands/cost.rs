//! `jqt cost` command - Fixed monthly costs

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::helpers::{confirm, display_ref, mutate, num, open_store, print_done};
use crate::cli::output::print_list;
use crate::cli::GlobalOpts;
use crate::core::store::CostPatch;
use crate::entities::cost::{CostClass, FixedCostLine};

#[derive(Subcommand, Debug)]
pub enum CostCommands {
    /// Add a monthly fixed cost
    Add(AddArgs),

    /// List fixed costs
    List,

    /// Change a fixed cost
    Update(UpdateArgs),

    /// Remove a fixed cost
    Rm(RmArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    pub description: String,

    /// Monthly amount
    #[arg(long, short = 'a')]
    pub amount: f64,

    /// direct (shop wages), indirect (office wages) or expense
    #[arg(long, short = 'c', default_value = "expense")]
    pub class: CostClass,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Fixed cost ID or short ID (FCST@N)
    pub id: String,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, short = 'a')]
    pub amount: Option<f64>,

    #[arg(long, short = 'c')]
    pub class: Option<CostClass>,
}

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    /// Fixed cost ID or short ID (FCST@N)
    pub id: String,

    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Tabled, Serialize)]
struct CostRow {
    #[tabled(rename = "SHORT")]
    short: String,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
    #[tabled(rename = "CLASS")]
    class: String,
    #[tabled(rename = "MONTHLY")]
    value: String,
}

pub fn run(cmd: CostCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CostCommands::Add(args) => run_add(args),
        CostCommands::List => run_list(global),
        CostCommands::Update(args) => run_update(args),
        CostCommands::Rm(args) => run_rm(args),
    }
}

fn run_add(args: AddArgs) -> Result<()> {
    let cost = FixedCostLine::new(args.description, args.class, args.amount);
    let label = cost.description.clone();
    let (store, id) = mutate(|store| Ok(store.add_fixed_cost(cost)?.id))?;
    print_done("Added", "fixed cost", &display_ref(&store, &id), &label);
    Ok(())
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let (_, store) = open_store()?;
    let costs = store.fixed_costs();
    let rows: Vec<CostRow> = costs
        .iter()
        .map(|c| CostRow {
            short: display_ref(&store, &c.id),
            description: c.description.clone(),
            class: c.class.to_string(),
            value: num(c.value),
        })
        .collect();
    let ids: Vec<String> = costs.iter().map(|c| c.id.to_string()).collect();
    print_list(costs, &rows, &ids, global.output, "fixed costs")
}

fn run_update(args: UpdateArgs) -> Result<()> {
    let patch = CostPatch {
        description: args.description,
        class: args.class,
        value: args.amount,
    };
    let (store, id) = mutate(|store| Ok(store.update_fixed_cost(&args.id, patch)?.id))?;
    print_done("Updated", "fixed cost", &display_ref(&store, &id), "");
    Ok(())
}

fn run_rm(args: RmArgs) -> Result<()> {
    if !confirm(&format!("Remove fixed cost {}?", args.id), args.yes)? {
        println!("{}", style("Cancelled").dim());
        return Ok(());
    }
    let (_, cost) = mutate(|store| Ok(store.remove_fixed_cost(&args.id)?))?;
    print_done("Removed", "fixed cost", &args.id, &cost.description);
    Ok(())
}
