use anyhow::{Context, Result};
use bookshelf_core::config::{self, Config};
use toml_edit::{value, DocumentMut, Item, Table};

const VALID_KEYS: &str = "data_dir, logging.level, logging.coloured, logging.output";

/// Show the current effective configuration.
pub fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!(
        "File exists: {}\n",
        if exists { "yes" } else { "no (using defaults)" }
    );

    println!("Settings:");
    println!("  data_dir: {}", config.data_dir.display());
    println!("  logging.level: {:?}", config.logging.level());
    println!("  logging.coloured: {}", config.logging.coloured());
    println!("  logging.output: {:?}", config.logging.output());

    println!("\nPriority: CLI args > ENV vars (BOOKSHELF_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value, or print the whole file.
pub fn get_config(key: Option<String>) -> Result<()> {
    let Some(key) = key else {
        let config_path = config::config_file_path();
        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            print!("{}", contents);
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'bookshelf config init' to create it.");
        }
        return Ok(());
    };

    let config = Config::load()?;
    match key.as_str() {
        "data_dir" => println!("{}", config.data_dir.display()),
        "logging.level" => println!("{:?}", config.logging.level()),
        "logging.coloured" => println!("{}", config.logging.coloured()),
        "logging.output" => println!("{}", config.logging.output().as_str()),
        _ => anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, VALID_KEYS),
    }

    Ok(())
}

/// Set a config value, keeping the rest of the file (comments included).
pub fn set_config(key: String, new_value: String) -> Result<()> {
    let config_path = config::config_file_path();
    config::ensure_config_file()?;

    let contents = std::fs::read_to_string(&config_path).context("Failed to read config file")?;
    let updated = apply_setting(&contents, &key, &new_value)?;

    std::fs::write(&config_path, updated).context("Failed to write config file")?;

    println!("✓ Updated {} = {}", key, new_value);
    println!("  in {}", config_path.display());

    Ok(())
}

/// Apply one `key = value` edit to a config document.
fn apply_setting(contents: &str, key: &str, new_value: &str) -> Result<String> {
    let mut doc: DocumentMut = contents.parse().context("Config file is not valid TOML")?;

    match key {
        "data_dir" => {
            doc["data_dir"] = value(new_value);
        }
        "logging.level" => {
            let level = new_value.to_lowercase();
            if !["trace", "debug", "info", "warn", "error"].contains(&level.as_str()) {
                anyhow::bail!(
                    "Invalid log level: {}\n\nValid levels: trace, debug, info, warn, error",
                    new_value
                );
            }
            logging_table(&mut doc)?["level"] = value(level);
        }
        "logging.coloured" => {
            let coloured: bool = new_value
                .parse()
                .with_context(|| format!("Expected true or false, got {}", new_value))?;
            logging_table(&mut doc)?["coloured"] = value(coloured);
        }
        "logging.output" => {
            let output = new_value.to_lowercase();
            if !["stdout", "stderr"].contains(&output.as_str()) {
                anyhow::bail!(
                    "Invalid log output: {}\n\nValid outputs: stdout, stderr",
                    new_value
                );
            }
            logging_table(&mut doc)?["output"] = value(output);
        }
        _ => anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, VALID_KEYS),
    }

    Ok(doc.to_string())
}

fn logging_table(doc: &mut DocumentMut) -> Result<&mut Table> {
    doc.entry("logging")
        .or_insert(Item::Table(Table::new()))
        .as_table_mut()
        .ok_or_else(|| anyhow::anyhow!("`logging` in config file is not a table"))
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    println!("{}", config::config_file_path().display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure bookshelf.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
