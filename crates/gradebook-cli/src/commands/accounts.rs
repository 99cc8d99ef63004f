//! The `gradebook accounts` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use gradebook_core::Role;

pub fn execute(config_path: Option<PathBuf>, role_filter: Option<String>) -> Result<()> {
    let role_filter: Option<Role> = role_filter
        .map(|r| r.parse().map_err(|e: String| anyhow::anyhow!("{e}")))
        .transpose()?;
    let opened = super::open(config_path)?;

    let rows: Vec<_> = opened
        .store
        .accounts()
        .into_iter()
        .filter(|a| role_filter.map_or(true, |r| a.role() == r))
        .collect();

    if rows.is_empty() {
        println!("No accounts registered.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Role", "Login", "Name"]);
    for account in &rows {
        table.add_row(vec![
            Cell::new(account.id.raw()),
            Cell::new(account.role()),
            Cell::new(&account.login),
            Cell::new(&account.name),
        ]);
    }
    println!("{table}");
    println!("{} account(s)", rows.len());

    Ok(())
}
