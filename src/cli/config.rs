use crate::config::generate::generate_starter_config;
use crate::config::{system_config_path, user_config_path};
use std::fs;
use std::path::{Path, PathBuf};

pub fn init(stdout: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config_content = generate_starter_config();

    if stdout {
        print!("{}", config_content);
        return Ok(());
    }

    let config_path = writable_config_path().ok_or("could not determine a config location")?;

    if config_path.exists() {
        return Err(format!(
            "config already exists at {} (use --stdout to print a fresh one)",
            config_path.display()
        )
        .into());
    }

    write_config(&config_path, &config_content)?;
    println!("Wrote starter config to {}", config_path.display());
    Ok(())
}

/// Try ~/.config/cloudtrail-file/ first, falling back to /etc/cloudtrail-file/
fn writable_config_path() -> Option<PathBuf> {
    if let Some(user_config) = user_config_path() {
        if let Some(parent) = user_config.parent() {
            match fs::create_dir_all(parent) {
                Ok(_) => return Some(user_config),
                Err(_) => {
                    eprintln!("Warning: Could not create directory {}", parent.display());
                    eprintln!("Falling back to {}", system_config_path().display());
                }
            }
        }
    }

    let system_config = system_config_path();
    let parent = system_config.parent()?;
    fs::create_dir_all(parent).ok()?;
    Some(system_config)
}

fn write_config(path: &Path, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    fs::write(path, content)
        .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;
    Ok(())
}
