//! Output formatting utilities

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::OutputFormat;

/// Determine the effective output format based on context
pub fn effective_format(format: OutputFormat, is_list: bool) -> OutputFormat {
    match format {
        OutputFormat::Auto => {
            if is_list {
                OutputFormat::Table
            } else {
                OutputFormat::Yaml
            }
        }
        other => other,
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
    Ok(())
}

pub fn print_yaml<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    print!("{}", serde_yml::to_string(value).into_diagnostic()?);
    Ok(())
}

pub fn print_csv<R: Serialize>(rows: &[R]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        wtr.serialize(row).into_diagnostic()?;
    }
    wtr.flush().into_diagnostic()?;
    Ok(())
}

pub fn print_table<R: Tabled>(rows: &[R]) {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}

/// Print a collection
///
/// JSON and YAML show the full records; table and CSV show `rows`.
pub fn print_list<E, R>(records: &[E], rows: &[R], ids: &[String], format: OutputFormat, noun: &str) -> Result<()>
where
    E: Serialize,
    R: Serialize + Tabled,
{
    match effective_format(format, true) {
        OutputFormat::Json => print_json(records),
        OutputFormat::Yaml => print_yaml(records),
        OutputFormat::Csv => print_csv(rows),
        OutputFormat::Id => {
            for id in ids {
                println!("{}", id);
            }
            Ok(())
        }
        OutputFormat::Table | OutputFormat::Auto => {
            if rows.is_empty() {
                println!("No {} found.", noun);
            } else {
                print_table(rows);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_resolves_by_context() {
        assert_eq!(effective_format(OutputFormat::Auto, true), OutputFormat::Table);
        assert_eq!(effective_format(OutputFormat::Auto, false), OutputFormat::Yaml);
        assert_eq!(effective_format(OutputFormat::Csv, false), OutputFormat::Csv);
    }
}
