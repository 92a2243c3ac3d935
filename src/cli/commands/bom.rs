//! `jqt bom` command - Bill of materials

use console::style;
use miette::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::helpers::{num, open_store};
use crate::cli::output::{print_csv, print_json, print_table, print_yaml};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::engine::bom::{self, BomCategory, BomLine};

#[derive(clap::Args, Debug)]
pub struct BomArgs {
    /// Only show one category
    #[arg(long, short = 'c', value_parser = parse_category)]
    pub category: Option<BomCategory>,
}

fn parse_category(s: &str) -> Result<BomCategory, String> {
    match s.to_lowercase().replace('-', "_").as_str() {
        "raw_material" | "raw" => Ok(BomCategory::RawMaterial),
        "edge_band" | "edge" => Ok(BomCategory::EdgeBand),
        "hardware" => Ok(BomCategory::Hardware),
        "generated" | "auto" => Ok(BomCategory::Generated),
        _ => Err(format!(
            "Invalid BOM category: {}. Use raw_material, edge_band, hardware, or generated",
            s
        )),
    }
}

#[derive(Tabled, Serialize)]
struct BomRow {
    #[tabled(rename = "CATEGORY")]
    category: String,
    #[tabled(rename = "ITEM")]
    name: String,
    #[tabled(rename = "QTY")]
    quantity: String,
    #[tabled(rename = "UNIT")]
    unit: String,
    #[tabled(rename = "UNIT PRICE")]
    unit_price: String,
    #[tabled(rename = "TOTAL")]
    total: String,
    #[tabled(rename = "NOTE")]
    note: String,
}

impl From<&BomLine> for BomRow {
    fn from(line: &BomLine) -> Self {
        let note = match (line.auto_generated, line.price_fallback) {
            (true, true) => "auto, default price",
            (true, false) => "auto",
            (false, true) => "default price",
            (false, false) => "",
        };
        Self {
            category: line.category.to_string(),
            name: line.name.clone(),
            quantity: num(line.quantity),
            unit: line.unit.to_string(),
            unit_price: num(line.unit_price),
            total: num(line.total),
            note: note.to_string(),
        }
    }
}

pub fn run(args: BomArgs, global: &GlobalOpts) -> Result<()> {
    let (_, store) = open_store()?;
    let outcome = store.compute()?;

    let lines: Vec<BomLine> = outcome
        .bom
        .into_iter()
        .filter(|l| args.category.is_none_or(|c| l.category == c))
        .collect();
    let rows: Vec<BomRow> = lines.iter().map(BomRow::from).collect();

    match global.output {
        OutputFormat::Json => print_json(&lines),
        OutputFormat::Yaml => print_yaml(&lines),
        OutputFormat::Csv => print_csv(&rows),
        OutputFormat::Id => {
            for line in &lines {
                println!("{}", line.name);
            }
            Ok(())
        }
        OutputFormat::Auto | OutputFormat::Table => {
            if rows.is_empty() {
                println!("Bill of materials is empty.");
                return Ok(());
            }
            print_table(&rows);
            println!(
                "{} {}",
                style("Total:").bold(),
                style(Config::load().money(bom::total(&lines))).green()
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category("edge-band").unwrap(), BomCategory::EdgeBand);
        assert_eq!(parse_category("AUTO").unwrap(), BomCategory::Generated);
        assert!(parse_category("nails").is_err());
    }
}
