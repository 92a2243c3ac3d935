//! `jqt catalog` command - Materials and hardware catalog

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::helpers::{confirm, display_ref, mutate, num, open_store, print_done};
use crate::cli::output::print_list;
use crate::cli::GlobalOpts;
use crate::core::store::MaterialPatch;
use crate::engine::classify::classify_family;
use crate::entities::material::{MaterialCatalogEntry, MaterialKind, Unit};

#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    /// Add a catalog entry
    Add(AddArgs),

    /// List catalog entries
    List(ListArgs),

    /// Change a catalog entry
    Update(UpdateArgs),

    /// Remove a catalog entry
    Rm(RmArgs),

    /// Add any default materials and labor rates that are missing
    Backfill,
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Entry name (pieces match it exactly)
    pub name: String,

    #[arg(long, short = 'u', default_value = "m2")]
    pub unit: Unit,

    #[arg(long, short = 'p')]
    pub price: f64,

    /// raw_material or hardware
    #[arg(long, short = 'k', default_value = "raw_material")]
    pub kind: MaterialKind,

    /// Install minutes per unit (hardware)
    #[arg(long)]
    pub minutes: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only show this kind
    #[arg(long, short = 'k')]
    pub kind: Option<MaterialKind>,

    /// Case-insensitive substring match on name
    #[arg(long, short = 's')]
    pub search: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Catalog ID or short ID (MAT@N)
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, short = 'u')]
    pub unit: Option<Unit>,

    #[arg(long, short = 'p')]
    pub price: Option<f64>,

    #[arg(long, short = 'k')]
    pub kind: Option<MaterialKind>,

    #[arg(long)]
    pub minutes: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    /// Catalog ID or short ID (MAT@N)
    pub id: String,

    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Tabled, Serialize)]
struct CatalogRow {
    #[tabled(rename = "SHORT")]
    short: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "KIND")]
    kind: String,
    #[tabled(rename = "FAMILY")]
    family: String,
    #[tabled(rename = "UNIT")]
    unit: String,
    #[tabled(rename = "PRICE")]
    price: String,
}

pub fn run(cmd: CatalogCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CatalogCommands::Add(args) => run_add(args),
        CatalogCommands::List(args) => run_list(args, global),
        CatalogCommands::Update(args) => run_update(args),
        CatalogCommands::Rm(args) => run_rm(args),
        CatalogCommands::Backfill => run_backfill(),
    }
}

fn run_add(args: AddArgs) -> Result<()> {
    let mut entry = MaterialCatalogEntry::new(args.name, args.unit, args.price, args.kind);
    entry.install_minutes = args.minutes;
    let label = entry.name.clone();
    let (store, id) = mutate(|store| Ok(store.add_material(entry)?.id))?;
    print_done("Added", "catalog entry", &display_ref(&store, &id), &label);
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (_, store) = open_store()?;
    let needle = args.search.as_deref().map(str::to_lowercase);

    let entries: Vec<&MaterialCatalogEntry> = store
        .catalog()
        .iter()
        .filter(|e| args.kind.is_none_or(|k| e.kind == k))
        .filter(|e| {
            needle
                .as_deref()
                .is_none_or(|n| e.name.to_lowercase().contains(n))
        })
        .collect();

    let rows: Vec<CatalogRow> = entries
        .iter()
        .map(|e| CatalogRow {
            short: display_ref(&store, &e.id),
            name: e.name.clone(),
            kind: e.kind.to_string(),
            family: match e.kind {
                MaterialKind::RawMaterial => classify_family(&e.name).to_string(),
                MaterialKind::Hardware => "-".to_string(),
            },
            unit: e.unit.to_string(),
            price: num(e.unit_price),
        })
        .collect();
    let ids: Vec<String> = entries.iter().map(|e| e.id.to_string()).collect();
    print_list(&entries, &rows, &ids, global.output, "catalog entries")
}

fn run_update(args: UpdateArgs) -> Result<()> {
    let patch = MaterialPatch {
        name: args.name,
        unit: args.unit,
        unit_price: args.price,
        kind: args.kind,
        install_minutes: args.minutes,
    };
    let (store, id) = mutate(|store| Ok(store.update_material(&args.id, patch)?.id))?;
    print_done("Updated", "catalog entry", &display_ref(&store, &id), "");
    Ok(())
}

fn run_rm(args: RmArgs) -> Result<()> {
    if !confirm(&format!("Remove catalog entry {}?", args.id), args.yes)? {
        println!("{}", style("Cancelled").dim());
        return Ok(());
    }
    let (_, entry) = mutate(|store| Ok(store.remove_material(&args.id)?))?;
    print_done("Removed", "catalog entry", &args.id, &entry.name);
    Ok(())
}

fn run_backfill() -> Result<()> {
    let (_, (materials, labor)) = mutate(|store| Ok(store.backfill_defaults()))?;
    println!(
        "{} Added {} catalog entries and {} labor rates",
        style("✓").green(),
        style(materials).cyan(),
        style(labor).cyan()
    );
    Ok(())
}
