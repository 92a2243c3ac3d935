//! `jqt init` command - Initialize a new quote project

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::core::project::{Project, ProjectError, PROJECT_DIR};
use crate::core::store::EntityStore;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Start with empty catalogs instead of the workshop defaults
    #[arg(long)]
    pub empty: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let cwd = std::env::current_dir().into_diagnostic()?;

    let store = if args.empty {
        EntityStore::default()
    } else {
        EntityStore::with_defaults()
    };

    match Project::init(&cwd, &store) {
        Ok(project) => {
            println!(
                "{} Initialized jqt project at {}",
                style("✓").green(),
                style(project.root().display()).cyan()
            );
            println!();
            println!("Created:");
            println!("  {}/config.yaml", PROJECT_DIR);
            println!("  {}", project.store_path().display());
            println!("  {}/", project.proposals_dir().display());
            if !args.empty {
                println!();
                println!(
                    "Seeded {} catalog entries, {} labor rates, {} fixed costs and {} card tiers.",
                    store.catalog().len(),
                    store.labor_rates().len(),
                    store.fixed_costs().len(),
                    store.card_rates().len()
                );
            }
            println!();
            println!("Next: {}", style("jqt piece add --material \"MDF White 15mm\" --length 600 --width 400").yellow());
            Ok(())
        }
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} Project already exists at {}",
                style("!").yellow(),
                path.display()
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
