//! The `gradebook register` command.

use std::path::PathBuf;

use anyhow::Result;

use gradebook_core::Role;

pub fn execute(
    config_path: Option<PathBuf>,
    role: String,
    login: String,
    password: String,
    name: String,
) -> Result<()> {
    let role: Role = role.parse().map_err(|e: String| anyhow::anyhow!("{e}"))?;
    let mut opened = super::open(config_path)?;

    let id = match role {
        Role::Teacher => opened.store.register_teacher(&login, &password, &name)?.0,
        Role::Student => opened.store.register_student(&login, &password, &name)?.0,
    };
    opened.store.save_to(&opened.gateway)?;

    println!("Registered {role} '{name}' with ID {id}.");
    Ok(())
}
