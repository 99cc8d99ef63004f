//! Subcommand implementations.

use std::path::PathBuf;

use anyhow::Result;

use gradebook_core::config::load_config_from;
use gradebook_core::persistence::FlatFileGateway;
use gradebook_core::Store;

pub mod accounts;
pub mod init;
pub mod register;
pub mod session;

/// A store loaded from the configured account files.
pub struct Opened {
    pub gateway: FlatFileGateway,
    pub store: Store,
}

/// Load config and accounts, creating the data files on first use.
///
/// A file that fails to load is reported; the accounts from the other file
/// stay available, and saving is refused until the broken file is fixed.
pub fn open(config_path: Option<PathBuf>) -> Result<Opened> {
    let config = load_config_from(config_path.as_deref())?;
    let gateway = FlatFileGateway::from_config(&config);
    if let Err(e) = gateway.ensure_files() {
        eprintln!("warning: {e}");
    }
    let mut store = Store::with_options(config.store_options());
    match store.load_from(&gateway) {
        Err(e) if e.is_persistence() => {
            eprintln!("warning: {e}; changes will not be saved until it is fixed");
        }
        Err(e) => eprintln!("warning: {e}"),
        Ok(_) => {}
    }
    Ok(Opened { gateway, store })
}
