use std::path::{Path, PathBuf};

const APP_DIR: &str = "sonicverse";

/// Portable installs keep `config.toml` beside the executable.
fn portable_dir() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    let exe_dir = exe_path.parent()?;
    if exe_dir.join("config.toml").exists() {
        Some(exe_dir.to_path_buf())
    } else {
        None
    }
}

/// Base directory for app folders; the system temp dir when the platform
/// reports none.
fn base_or_temp(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(temp_dir)
}

// On macOS and Linux, use XDG-style dotfolders under $HOME instead of
// macOS Application Support for consistency.
#[cfg(unix)]
fn data_dir_under(home: &Path) -> PathBuf {
    home.join(".local").join("share").join(APP_DIR)
}

#[cfg(unix)]
fn config_dir_under(home: &Path) -> PathBuf {
    home.join(".config").join(APP_DIR)
}

#[cfg(windows)]
fn data_dir_under(base: &Path) -> PathBuf {
    base.join(APP_DIR)
}

#[cfg(windows)]
fn config_dir_under(base: &Path) -> PathBuf {
    base.join(APP_DIR)
}

pub fn data_dir() -> PathBuf {
    if let Some(dir) = portable_dir() {
        return dir.join("data");
    }

    #[cfg(unix)]
    let base = dirs::home_dir();
    #[cfg(windows)]
    let base = dirs::data_local_dir();

    data_dir_under(&base_or_temp(base))
}

pub fn config_dir() -> PathBuf {
    if let Some(dir) = portable_dir() {
        return dir;
    }

    #[cfg(unix)]
    let base = dirs::home_dir();
    #[cfg(windows)]
    let base = dirs::config_dir();

    config_dir_under(&base_or_temp(base))
}

pub fn temp_dir() -> PathBuf {
    std::env::temp_dir()
}

pub fn log_path() -> PathBuf {
    data_dir().join("sonicverse.log")
}
