//! `jqt reset` command - Start a new project

use console::style;
use miette::Result;

use crate::cli::helpers::{confirm, mutate};

#[derive(clap::Args, Debug)]
pub struct ResetArgs {
    /// Skip confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Clear pieces, project hardware and services; catalogs stay
pub fn run(args: ResetArgs) -> Result<()> {
    if !confirm("Clear the current project? Catalogs and rates are kept.", args.yes)? {
        println!("{}", style("Cancelled").dim());
        return Ok(());
    }
    mutate(|store| {
        store.reset_project();
        Ok(())
    })?;
    println!("{} Project cleared", style("✓").green());
    Ok(())
}
