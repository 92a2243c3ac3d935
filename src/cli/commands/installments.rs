//! `jqt installments` command - Card payment options

use console::style;
use miette::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::helpers::{num, open_store};
use crate::cli::output::{print_csv, print_json, print_table, print_yaml};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::engine::installments::{simulate, InstallmentTable};

#[derive(clap::Args, Debug)]
pub struct InstallmentsArgs {
    /// Simulate from this price instead of the computed sales price
    #[arg(long, short = 'p')]
    pub price: Option<f64>,
}

#[derive(Tabled, Serialize)]
struct InstallmentRowView {
    #[tabled(rename = "INSTALLMENTS")]
    installments: String,
    #[tabled(rename = "FEE %")]
    fee_percent: String,
    #[tabled(rename = "TOTAL")]
    total: String,
    #[tabled(rename = "PER INSTALLMENT")]
    installment_value: String,
}

pub fn run(args: InstallmentsArgs, global: &GlobalOpts) -> Result<()> {
    let (_, store) = open_store()?;
    let price = match args.price {
        Some(price) => price,
        None => store.compute()?.stats.sales_price,
    };
    let table = simulate(price, store.card_rates());
    print_installments(&table, global.output, &Config::load())
}

pub(crate) fn print_installments(table: &InstallmentTable, format: OutputFormat, config: &Config) -> Result<()> {
    let rows: Vec<InstallmentRowView> = table
        .rows
        .iter()
        .map(|r| InstallmentRowView {
            installments: format!("{}x", r.installments),
            fee_percent: num(r.fee_percent),
            total: num(r.total),
            installment_value: num(r.installment_value),
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(table),
        OutputFormat::Yaml => print_yaml(table),
        OutputFormat::Csv => print_csv(&rows),
        OutputFormat::Id => {
            println!("{:.2}", table.cash_price);
            Ok(())
        }
        OutputFormat::Auto | OutputFormat::Table => {
            println!(
                "{} {}   {} {}",
                style("Price:").bold(),
                config.money(table.sales_price),
                style("Cash:").bold(),
                style(config.money(table.cash_price)).green()
            );
            if rows.is_empty() {
                println!("No card tiers configured.");
            } else {
                print_table(&rows);
            }
            Ok(())
        }
    }
}
