//! `jqt category` command - Product categories

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::helpers::{confirm, display_ref, mutate, num, open_store, print_done};
use crate::cli::output::print_list;
use crate::cli::GlobalOpts;
use crate::entities::settings::ProductCategory;

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// Add a product category
    Add(AddArgs),

    /// List product categories
    List,

    /// Remove a product category by name or ID
    Rm(RmArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    pub name: String,

    /// Ideal profit margin percent
    #[arg(long, short = 'm')]
    pub margin: f64,
}

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    /// Category name, ID or short ID (CAT@N)
    pub reference: String,

    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Tabled, Serialize)]
struct CategoryRow {
    #[tabled(rename = "SHORT")]
    short: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "MARGIN %")]
    margin: String,
    #[tabled(rename = "SELECTED")]
    selected: String,
}

pub fn run(cmd: CategoryCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CategoryCommands::Add(args) => run_add(args),
        CategoryCommands::List => run_list(global),
        CategoryCommands::Rm(args) => run_rm(args),
    }
}

fn run_add(args: AddArgs) -> Result<()> {
    let category = ProductCategory::new(args.name, args.margin);
    let label = category.name.clone();
    let (store, id) = mutate(|store| Ok(store.add_category(category)?.id))?;
    print_done("Added", "category", &display_ref(&store, &id), &label);
    Ok(())
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let (_, store) = open_store()?;
    let selected = &store.settings().product_category;
    let categories = store.categories();
    let rows: Vec<CategoryRow> = categories
        .iter()
        .map(|c| CategoryRow {
            short: display_ref(&store, &c.id),
            name: c.name.clone(),
            margin: num(c.ideal_margin),
            selected: if &c.name == selected {
                "*".to_string()
            } else {
                String::new()
            },
        })
        .collect();
    let ids: Vec<String> = categories.iter().map(|c| c.id.to_string()).collect();
    print_list(categories, &rows, &ids, global.output, "categories")
}

fn run_rm(args: RmArgs) -> Result<()> {
    if !confirm(&format!("Remove category {}?", args.reference), args.yes)? {
        println!("{}", style("Cancelled").dim());
        return Ok(());
    }
    let (_, category) = mutate(|store| Ok(store.remove_category(&args.reference)?))?;
    print_done("Removed", "category", &args.reference, &category.name);
    Ok(())
}
