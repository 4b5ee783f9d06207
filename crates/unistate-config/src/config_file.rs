use std::path::PathBuf;

const LOCAL_CONFIG_FILE: &str = ".unistate.toml";

/// Locate the config file: CWD first, then the config directory
///
/// Searches for:
/// 1. `.unistate.toml` in the current working directory
/// 2. `config.toml` in the application config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    match crate::paths::app_config_path() {
        Ok(global) if global.is_file() => Some(global),
        Ok(_) => None,
        Err(e) => {
            log::debug!("No config directory available: {:#}", e);
            None
        }
    }
}
