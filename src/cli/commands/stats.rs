//! `jqt stats` command - Costs, price and profitability

use console::style;
use miette::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::helpers::{num, open_store};
use crate::cli::output::{print_csv, print_json, print_table, print_yaml};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::engine::pricing::MarginHealth;
use crate::engine::stats::ProjectStats;

#[derive(clap::Args, Debug)]
pub struct StatsArgs {
    /// Show per-activity labor minutes
    #[arg(long, short = 'l')]
    pub labor: bool,
}

#[derive(Tabled, Serialize)]
struct LaborRow {
    #[tabled(rename = "ACTIVITY")]
    activity: String,
    #[tabled(rename = "QTY")]
    quantity: String,
    #[tabled(rename = "MIN/UNIT")]
    minutes_per_unit: String,
    #[tabled(rename = "MINUTES")]
    minutes: String,
}

pub fn run(args: StatsArgs, global: &GlobalOpts) -> Result<()> {
    let (_, store) = open_store()?;
    let outcome = store.compute()?;
    let stats = &outcome.stats;

    match global.output {
        OutputFormat::Json => print_json(stats),
        OutputFormat::Yaml => print_yaml(stats),
        OutputFormat::Csv => print_csv(&labor_rows(stats)),
        OutputFormat::Id => {
            println!("{:.2}", stats.sales_price);
            Ok(())
        }
        OutputFormat::Auto | OutputFormat::Table => {
            print_summary(stats, &Config::load());
            if args.labor {
                println!();
                print_table(&labor_rows(stats));
            }
            Ok(())
        }
    }
}

fn labor_rows(stats: &ProjectStats) -> Vec<LaborRow> {
    stats
        .labor
        .iter()
        .map(|l| LaborRow {
            activity: l.activity.clone(),
            quantity: num(l.quantity),
            minutes_per_unit: num(l.minutes_per_unit),
            minutes: num(l.minutes),
        })
        .collect()
}

fn print_summary(s: &ProjectStats, config: &Config) {
    let money = |v: f64| config.money(v);
    let rule = || println!("{}", style("─".repeat(50)).dim());
    let line = |label: &str, value: String| println!("  {:<24} {:>20}", label, value);

    rule();
    println!("{}", style("Physical").bold());
    line("Area", format!("{} m2", num(s.total_area_m2())));
    line("Perimeter", format!("{} m", num(s.total_perimeter_m())));
    line("Edge band", format!("{} m", num(s.total_edge_length_m())));
    line("Fasteners", format!("{}", s.total_fasteners));
    line("Metal pieces", format!("{}", s.metal_pieces));

    println!("{}", style("Materials").bold());
    line("Wood", money(s.wood_cost));
    line("Metal (incl. paint)", money(s.metal_cost));
    line("Glass", money(s.glass_cost));
    line("Edge band", money(s.total_tape_cost));
    line("Hardware", money(s.total_component_cost));

    println!("{}", style("Fabrication").bold());
    line("Labor time", format!("{} h", num(s.total_labor_hours())));
    line("Labor rate", format!("{}/h", money(s.labor_rate)));
    line("Labor", money(s.total_labor_cost));
    line("Overhead", money(s.total_fixed_cost));
    line("Services", money(s.total_services_cost));
    line("Extra", money(s.extra_cost));

    rule();
    line("Total cost", money(s.total_cost));
    line("Margin", format!("{}%", num(s.profit_margin)));
    line("Card fee (anchor)", format!("{}%", num(s.fee_percent)));
    println!(
        "  {:<24} {:>20}",
        style("Sales price").bold(),
        style(money(s.sales_price)).green().bold()
    );
    line("Fee amount", money(s.fee_amount));
    line("Profit", money(s.profit));

    let health = s.margin_health();
    let rating = format!("{}% ({})", num(s.realized_margin), health);
    let rating = match health {
        MarginHealth::Loss => style(rating).red(),
        MarginHealth::Low => style(rating).yellow(),
        MarginHealth::Healthy => style(rating).green(),
        MarginHealth::Excellent => style(rating).cyan(),
    };
    println!("  {:<24} {:>20}", "Realized margin", rating);
    line("ROI", format!("{}%", num(s.roi)));
    rule();
}
