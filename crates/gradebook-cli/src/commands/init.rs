//! The `gradebook init` command.

use std::path::{Path, PathBuf};

use anyhow::Result;

use gradebook_core::config::{load_config_from, CONFIG_FILE_NAME};
use gradebook_core::persistence::FlatFileGateway;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    if config_path.is_none() {
        if Path::new(CONFIG_FILE_NAME).exists() {
            println!("{CONFIG_FILE_NAME} already exists, skipping.");
        } else {
            std::fs::write(CONFIG_FILE_NAME, SAMPLE_CONFIG)?;
            println!("Created {CONFIG_FILE_NAME}");
        }
    }

    let config = load_config_from(config_path.as_deref())?;
    let gateway = FlatFileGateway::from_config(&config);
    let created = gateway.ensure_files()?;
    for path in [gateway.teachers_path(), gateway.students_path()] {
        if created.iter().any(|p| p == path) {
            println!("Created {}", path.display());
        } else {
            println!("{} already exists, skipping.", path.display());
        }
    }

    println!("\nNext steps:");
    println!("  1. Run: gradebook register --role teacher --login alice --password pw --name \"Alice A\"");
    println!("  2. Run: gradebook session --script my-session.txt");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# gradebook configuration

data_dir = "data"
teachers_file = "teachers.txt"
students_file = "students.txt"
first_id = 1000
enforce_ranges = true
"#;
