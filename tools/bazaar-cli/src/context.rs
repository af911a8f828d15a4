//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use bazaar_actions::{Settings, Shop};

use crate::config::{self, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// Shop settings.
    pub settings: Settings,
    /// Settings file in use, if one was found.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config_path = match config_path {
            Some(path) => Some(resolve(&cwd, path)),
            None => Self::find_config(&cwd),
        };

        let settings = match &config_path {
            Some(path) => {
                output.debug(&format!("Using config {}", path.display()));
                config::load(path)?
            }
            None => Settings::default().with_env(),
        };

        Ok(Self {
            settings,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in CONFIG_NAMES {
                let candidate = current.join(name);
                if candidate.exists() {
                    return Some(candidate);
                }
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Open the shop described by the settings.
    pub async fn shop(&self) -> Result<Shop> {
        Shop::open(self.settings.clone())
            .await
            .context("Failed to open the store")
    }

    /// Directory holding the config file, or the working directory.
    pub fn project_dir(&self) -> PathBuf {
        self.config_path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.cwd.clone())
    }

    /// File the admin session token is kept in between invocations.
    pub fn session_file(&self) -> PathBuf {
        self.project_dir().join(".bazaar").join("session")
    }

    /// Token from the last `admin login`, if any.
    pub fn read_session(&self) -> Result<Option<String>> {
        let path = self.session_file();
        if !path.exists() {
            return Ok(None);
        }
        let token = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read session file: {}", path.display()))?;
        let token = token.trim();
        Ok((!token.is_empty()).then(|| token.to_string()))
    }

    pub fn write_session(&self, token: &str) -> Result<()> {
        let path = self.session_file();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        std::fs::write(&path, token)
            .with_context(|| format!("Failed to write session file: {}", path.display()))
    }

    pub fn clear_session(&self) -> Result<()> {
        let path = self.session_file();
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove session file: {}", path.display()))?;
        }
        Ok(())
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        resolve(&self.cwd, path)
    }
}

fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
