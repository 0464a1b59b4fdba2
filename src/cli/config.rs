use crate::error::{RedeError, Result};
use crate::settings::{load_settings, save_settings, settings_path, Settings};

pub fn show() -> Result<()> {
    let path = settings_path();
    let settings = load_settings();
    let json = serde_json::to_string_pretty(&settings)
        .map_err(|e| RedeError::Settings(e.to_string()))?;
    let state = if path.exists() { "" } else { " (not created, showing defaults)" };
    println!("Settings:   {}{state}", path.display());
    println!("{json}");
    Ok(())
}

pub fn init(force: bool) -> Result<()> {
    let path = settings_path();
    if path.exists() && !force {
        println!("Settings already exist at {} (use --force to overwrite).", path.display());
        return Ok(());
    }
    save_settings(&Settings::default())?;
    println!("Wrote {}", path.display());
    Ok(())
}
