//! `jqt fixed` command - Standard hardware bundles

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::commands::hw::HardwareRow;
use crate::cli::helpers::{confirm, display_ref, mutate, num, open_store, print_done};
use crate::cli::output::print_list;
use crate::cli::GlobalOpts;
use crate::core::store::HardwarePatch;
use crate::entities::hardware::FixedHardwareLine;
use crate::entities::material::Unit;

#[derive(Subcommand, Debug)]
pub enum FixedCommands {
    /// Add a fixed hardware line
    Add(AddArgs),

    /// List fixed hardware
    List,

    /// Change a fixed hardware line
    Update(UpdateArgs),

    /// Remove a fixed hardware line
    Rm(RmArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Line name
    pub name: String,

    #[arg(long, default_value = "unit")]
    pub unit: Unit,

    #[arg(long, short = 'p', default_value_t = 0.0)]
    pub price: f64,

    #[arg(long, short = 'q', default_value_t = 0.0)]
    pub quantity: f64,

    /// Install minutes per unit
    #[arg(long, default_value_t = 0.0)]
    pub minutes: f64,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Fixed hardware ID or short ID (FHW@N)
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub unit: Option<Unit>,

    #[arg(long, short = 'p')]
    pub price: Option<f64>,

    #[arg(long, short = 'q')]
    pub quantity: Option<f64>,

    #[arg(long)]
    pub minutes: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    /// Fixed hardware ID or short ID (FHW@N)
    pub id: String,

    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: FixedCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        FixedCommands::Add(args) => run_add(args),
        FixedCommands::List => run_list(global),
        FixedCommands::Update(args) => run_update(args),
        FixedCommands::Rm(args) => run_rm(args),
    }
}

fn run_add(args: AddArgs) -> Result<()> {
    let line = FixedHardwareLine::new(args.name, args.unit, args.price, args.quantity, args.minutes);
    let (store, id) = mutate(|store| Ok(store.add_fixed_hardware(line)?.id))?;
    let name = store
        .fixed_hardware()
        .iter()
        .find(|h| h.id == id)
        .map(|h| h.name.as_str())
        .unwrap_or_default();
    print_done("Added", "fixed hardware", &display_ref(&store, &id), name);
    Ok(())
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let (_, store) = open_store()?;
    let lines = store.fixed_hardware();
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
    print_list(lines, &rows, &ids, global.output, "fixed hardware lines")
}

fn run_update(args: UpdateArgs) -> Result<()> {
    let patch = HardwarePatch {
        name: args.name,
        unit: args.unit,
        unit_price: args.price,
        quantity: args.quantity,
        install_minutes: args.minutes,
        meterage: None,
    };
    let (store, id) = mutate(|store| Ok(store.update_fixed_hardware(&args.id, patch)?.id))?;
    print_done("Updated", "fixed hardware", &display_ref(&store, &id), "");
    Ok(())
}

fn run_rm(args: RmArgs) -> Result<()> {
    if !confirm(&format!("Remove fixed hardware {}?", args.id), args.yes)? {
        println!("{}", style("Cancelled").dim());
        return Ok(());
    }
    let (_, line) = mutate(|store| Ok(store.remove_fixed_hardware(&args.id)?))?;
    print_done("Removed", "fixed hardware", &args.id, &line.name);
    Ok(())
}
