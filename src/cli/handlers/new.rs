use std::path::{Path, PathBuf};

use crate::cli::commands::NewArgs;
use crate::io::config_io;
use crate::io::project_io;
use crate::io::registry::ProjectRegistry;
use crate::model::project::hyphenate;

/// Validate a project name typed by the user.
fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("project name cannot be empty".to_string());
    }
    if name.contains('/') || name.contains('\\') {
        return Err(format!(
            "invalid project name '{}': must not contain path separators",
            name
        ));
    }
    Ok(())
}

/// Directory a new project named `name` gets under `base`
pub fn project_dir_for(base: &Path, name: &str) -> PathBuf {
    base.join(hyphenate(name.trim()))
}

pub fn cmd_new(args: NewArgs, registry: &mut ProjectRegistry) -> Result<(), Box<dyn std::error::Error>> {
    validate_name(&args.name)?;
    let name = args.name.trim();

    let base = match args.path {
        Some(p) => PathBuf::from(p),
        None => config_io::read_config()?.scripts_dir,
    };
    let root = std::path::absolute(project_dir_for(&base, name))?;

    let project = project_io::create_project(name, &root)?;
    let id = registry.add(&project.name, &project.root)?;

    println!("Created project: {} ({})", project.name, id);
    println!("  {}", project.root.display());
    Ok(())
}
