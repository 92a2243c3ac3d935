//! `jqt service` command - Additional services

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::helpers::{confirm, display_ref, mutate, num, open_store, print_done};
use crate::cli::output::print_list;
use crate::cli::GlobalOpts;
use crate::entities::cost::AdditionalServiceLine;

#[derive(Subcommand, Debug)]
pub enum ServiceCommands {
    /// Add a service (freight, installation, design...)
    Add(AddArgs),

    /// List services
    List,

    /// Remove a service
    Rm(RmArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    pub description: String,

    #[arg(long, short = 'a')]
    pub amount: f64,
}

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    /// Service ID or short ID (SVC@N)
    pub id: String,

    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Tabled, Serialize)]
struct ServiceRow {
    #[tabled(rename = "SHORT")]
    short: String,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
    #[tabled(rename = "AMOUNT")]
    value: String,
}

pub fn run(cmd: ServiceCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ServiceCommands::Add(args) => run_add(args),
        ServiceCommands::List => run_list(global),
        ServiceCommands::Rm(args) => run_rm(args),
    }
}

fn run_add(args: AddArgs) -> Result<()> {
    let service = AdditionalServiceLine::new(args.description, args.amount);
    let label = service.description.clone();
    let (store, id) = mutate(|store| Ok(store.add_service(service)?.id))?;
    print_done("Added", "service", &display_ref(&store, &id), &label);
    Ok(())
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let (_, store) = open_store()?;
    let services = store.services();
    let rows: Vec<ServiceRow> = services
        .iter()
        .map(|s| ServiceRow {
            short: display_ref(&store, &s.id),
            description: s.description.clone(),
            value: num(s.value),
        })
        .collect();
    let ids: Vec<String> = services.iter().map(|s| s.id.to_string()).collect();
    print_list(services, &rows, &ids, global.output, "services")
}

fn run_rm(args: RmArgs) -> Result<()> {
    if !confirm(&format!("Remove service {}?", args.id), args.yes)? {
        println!("{}", style("Cancelled").dim());
        return Ok(());
    }
    let (_, service) = mutate(|store| Ok(store.remove_service(&args.id)?))?;
    print_done("Removed", "service", &args.id, &service.description);
    Ok(())
}
