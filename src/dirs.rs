use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

/// Ensures that a directory exists at the specified path, creating it and any
/// missing parents if necessary.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

pub fn home_dir() -> Result<PathBuf> {
    let dir = std::env::var_os("HOME") // Unix/Linux/macOS
        .or_else(|| std::env::var_os("USERPROFILE")) // Windows
        .map(PathBuf::from);
    match dir {
        Some(dir) => Ok(dir),
        None => {
            bail!("could not determine home directory, please specify config path manually")
        }
    }
}

pub fn config_dir() -> Result<PathBuf> {
    if is_root() {
        return Ok(PathBuf::from("/etc/quillctl"));
    }

    let home = home_dir()?;
    Ok(home.join(".config").join("quillctl"))
}

pub fn data_dir() -> Result<PathBuf> {
    if is_root() {
        return Ok(PathBuf::from("/var/lib/quillctl"));
    }

    let home = home_dir()?;

    if cfg!(unix) {
        return Ok(home.join(".local").join("share").join("quillctl"));
    }

    if cfg!(windows) {
        return Ok(home.join("AppData").join("quillctl"));
    }

    bail!("could not determine data directory, please specify data path manually")
}

#[cfg(unix)]
fn is_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

#[cfg(windows)]
fn is_root() -> bool {
    false
}
