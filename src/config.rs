//! Hasher configuration file.
//!
//! A JSON object with any of `salt_size`, `iterations` and `algorithm`:
//! ```json
//! { "iterations": 600000, "algorithm": "sha256" }
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use crate::crypto::{Pbkdf2Params, random::secure_random};
use crate::error::{HashError, Result};

/// Location of a hasher configuration file.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    /// Creates a ConfigFile for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns `true` if the file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Returns the path to the configuration file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and validates the hasher parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, has
    /// unknown fields, or holds parameters the hasher rejects.
    pub fn load(&self) -> Result<Pbkdf2Params> {
        let data = fs::read(&self.path)?;
        let params: Pbkdf2Params = serde_json::from_slice(&data)
            .map_err(|e| HashError::Config(format!("{}: {e}", self.path.display())))?;
        params.validate()?;

        debug!(path = %self.path.display(), ?params, "loaded hasher config");
        Ok(params)
    }

    /// Like [`ConfigFile::load`], but a missing file yields the defaults.
    pub fn load_or_default(&self) -> Result<Pbkdf2Params> {
        if !self.exists() {
            debug!(path = %self.path.display(), "no hasher config, using defaults");
            return Ok(Pbkdf2Params::default());
        }
        self.load()
    }

    /// Writes `params` atomically, creating parent directories as needed.
    ///
    /// Data goes to a uniquely named temporary file next to the target, is
    /// synced, then renamed over the target.
    pub fn save(&self, params: &Pbkdf2Params) -> Result<()> {
        params.validate()?;
        let mut data = serde_json::to_vec_pretty(params).map_err(HashError::config)?;
        data.push(b'\n');

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.random_tmp_path()?;

        let mut tmp_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)?;
        tmp_file.write_all(&data)?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        #[cfg(unix)]
        if let Some(parent) = self.path.parent() {
            File::open(parent)?.sync_all()?;
        }

        Ok(())
    }

    /// Format: `filename.tmp.<randomhex>`
    fn random_tmp_path(&self) -> Result<PathBuf> {
        let mut buf = [0u8; 8];
        secure_random(&mut buf)?;

        let rand_string = buf.iter().map(|b| format!("{b:02x}")).collect::<String>();

        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| HashError::Config(format!("not a file path: {}", self.path.display())))?
            .to_string_lossy();

        Ok(self.path.with_file_name(format!("{file_name}.tmp.{rand_string}")))
    }
}

/// The per-user configuration file, `<config dir>/mcfhash/config.json`.
pub fn default_config() -> Result<ConfigFile> {
    let project_dirs = ProjectDirs::from("", "", "mcfhash")
        .ok_or_else(|| HashError::config("could not determine platform directories"))?;

    Ok(ConfigFile::new(project_dirs.config_dir().join("config.json")))
}
