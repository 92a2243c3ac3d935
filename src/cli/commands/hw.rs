//! `jqt hw` command - Hardware fitted to this job

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::helpers::{confirm, display_ref, mutate, num, open_store, print_done};
use crate::cli::output::print_list;
use crate::cli::GlobalOpts;
use crate::core::store::HardwarePatch;
use crate::entities::material::Unit;

#[derive(Subcommand, Debug)]
pub enum HwCommands {
    /// Add hardware from the catalog
    Add(AddArgs),

    /// List project hardware
    List,

    /// Change quantity, price or install time of a line
    Update(UpdateArgs),

    /// Remove a hardware line
    Rm(RmArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Catalog entry ID or short ID (MAT@N)
    pub catalog: String,

    /// Quantity fitted
    #[arg(long, short = 'q', default_value_t = 1.0)]
    pub quantity: f64,

    /// Linear meterage, for rod or rail stock
    #[arg(long)]
    pub meterage: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Hardware line ID or short ID (HW@N)
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub unit: Option<Unit>,

    #[arg(long, short = 'p')]
    pub price: Option<f64>,

    #[arg(long, short = 'q')]
    pub quantity: Option<f64>,

    /// Install minutes per unit
    #[arg(long)]
    pub minutes: Option<f64>,

    #[arg(long)]
    pub meterage: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    /// Hardware line ID or short ID (HW@N)
    pub id: String,

    /// Skip confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Tabled, Serialize)]
pub(crate) struct HardwareRow {
    #[tabled(rename = "SHORT")]
    pub short: String,
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "UNIT")]
    pub unit: String,
    #[tabled(rename = "PRICE")]
    pub price: String,
    #[tabled(rename = "QTY")]
    pub quantity: f64,
    #[tabled(rename = "MIN/UNIT")]
    pub minutes: f64,
    #[tabled(rename = "TOTAL")]
    pub total: String,
}

pub fn run(cmd: HwCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        HwCommands::Add(args) => run_add(args),
        HwCommands::List => run_list(global),
        HwCommands::Update(args) => run_update(args),
        HwCommands::Rm(args) => run_rm(args),
    }
}

fn run_add(args: AddArgs) -> Result<()> {
    let (store, id) = mutate(|store| {
        Ok(store
            .add_project_hardware(&args.catalog, args.quantity, args.meterage)?
            .id)
    })?;
    if let Some(line) = store.project_hardware().iter().find(|h| h.id == id) {
        print_done("Added", "hardware", &display_ref(&store, &id), &line.name);
        println!(
            "   {} x {} {} = {}",
            line.quantity,
            num(line.unit_price),
            line.unit,
            num(line.unit_price * line.quantity)
        );
    }
    Ok(())
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let (_, store) = open_store()?;
    let lines = store.project_hardware();
    let rows: Vec<HardwareRow> = lines
        .iter()
        .map(|h| HardwareRow {
            short: display_ref(&store, &h.id),
            name: h.name.clone(),
            unit: h.unit.to_string(),
            price: num(h.unit_price),
            quantity: h.quantity,
            minutes: h.install_minutes,
            total: num(h.unit_price * h.quantity),
        })
        .collect();
    let ids: Vec<String> = lines.iter().map(|h| h.id.to_string()).collect();
    print_list(lines, &rows, &ids, global.output, "hardware lines")
}

fn run_update(args: UpdateArgs) -> Result<()> {
    let patch = HardwarePatch {
        name: args.name,
        unit: args.unit,
        unit_price: args.price,
        quantity: args.quantity,
        install_minutes: args.minutes,
        meterage: args.meterage,
    };
    let (store, id) = mutate(|store| Ok(store.update_project_hardware(&args.id, patch)?.id))?;
    print_done("Updated", "hardware", &display_ref(&store, &id), "");
    Ok(())
}

fn run_rm(args: RmArgs) -> Result<()> {
    if !confirm(&format!("Remove hardware line {}?", args.id), args.yes)? {
        println!("{}", style("Cancelled").dim());
        return Ok(());
    }
    let (_, line) = mutate(|store| Ok(store.remove_project_hardware(&args.id)?))?;
    print_done("Removed", "hardware", &args.id, &line.name);
    Ok(())
}
