use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use crate::table::Table;

/// Display style options for output formatting
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum DisplayStyle {
    /// Display data in a formatted table
    #[default]
    Table,
    /// Display data in JSON format
    Json,
}

/// Trait for types that can be displayed as a table row in terminal
pub trait TerminalDisplay {
    /// Returns the column titles for table display
    fn table_titles() -> Vec<&'static str>;
    /// Converts the instance into a row of strings for table display
    fn table_row(self) -> Vec<String>;
}

pub fn pretty_json<T: Serialize>(o: T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&o)?);
    Ok(())
}

pub fn display_list<T>(items: Vec<T>, style: DisplayStyle) -> Result<()>
where
    T: Serialize + TerminalDisplay,
{
    match style {
        DisplayStyle::Table => {
            if items.is_empty() {
                println!("<empty list>");
                return Ok(());
            }
            let mut table = Table::with_capacity(items.len() + 1);
            table.add(T::table_titles().iter().map(|s| s.to_string()).collect());
            for item in items {
                table.add(item.table_row());
            }
            table.show();
            Ok(())
        }
        DisplayStyle::Json => pretty_json(items),
    }
}
