//! `jqt settings` command - Margin, overhead and company settings

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{mutate, num, open_store};
use crate::cli::output::{print_json, print_yaml};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::store::SettingsPatch;
use crate::entities::settings::Settings;

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show current settings
    Show,

    /// Change one or more settings
    Set(SetArgs),
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Profit margin percent applied over total cost
    #[arg(long, short = 'm')]
    pub margin: Option<f64>,

    /// Extra cost added to every quote
    #[arg(long)]
    pub extra: Option<f64>,

    /// Productive employees
    #[arg(long)]
    pub employees: Option<f64>,

    /// Working hours per employee per month
    #[arg(long)]
    pub hours: Option<f64>,

    /// Select a product category (adopts its ideal margin)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    #[arg(long)]
    pub company_name: Option<String>,

    #[arg(long)]
    pub company_email: Option<String>,

    #[arg(long)]
    pub company_phone: Option<String>,

    #[arg(long)]
    pub company_address: Option<String>,

    /// Default warranty text printed on proposals
    #[arg(long)]
    pub warranty: Option<String>,
}

pub fn run(cmd: SettingsCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        SettingsCommands::Show => run_show(global),
        SettingsCommands::Set(args) => run_set(args, global),
    }
}

fn run_show(global: &GlobalOpts) -> Result<()> {
    let (_, store) = open_store()?;
    print_settings(store.settings(), global.output)
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    let patch = SettingsPatch {
        profit_margin: args.margin,
        extra_cost: args.extra,
        employees: args.employees,
        monthly_hours: args.hours,
        company_name: args.company_name,
        company_email: args.company_email,
        company_phone: args.company_phone,
        company_address: args.company_address,
        warranty_terms: args.warranty,
    };
    let category = args.category;
    let (store, ()) = mutate(|store| {
        store.update_settings(patch)?;
        // Category last so its ideal margin wins over --margin
        if let Some(name) = &category {
            store.select_category(name);
        }
        Ok(())
    })?;
    println!("{} Updated settings", style("✓").green());
    print_settings(store.settings(), global.output)
}

fn print_settings(settings: &Settings, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(settings),
        OutputFormat::Yaml => print_yaml(settings),
        _ => {
            println!("{}", style("─".repeat(50)).dim());
            println!("{}: {}%", style("Profit margin").bold(), num(settings.profit_margin));
            println!("{}: {}", style("Extra cost").bold(), num(settings.extra_cost));
            println!(
                "{}: {} x {} h = {} h/month",
                style("Capacity").bold(),
                settings.employees,
                settings.monthly_hours,
                settings.capacity_hours()
            );
            if !settings.product_category.is_empty() {
                println!("{}: {}", style("Category").bold(), settings.product_category);
            }
            if !settings.company.name.is_empty() {
                println!("{}: {}", style("Company").bold(), style(&settings.company.name).yellow());
            }
            println!("{}", style("─".repeat(50)).dim());
            Ok(())
        }
    }
}
