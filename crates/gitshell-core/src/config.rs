//! Executor configuration, loadable from `gitshell.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default shell interpreter used for shell-interpreted commands.
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Default git binary used by the git facade.
pub const DEFAULT_GIT_BINARY: &str = "/usr/bin/git";

/// Construction-time options for an [`Executor`](crate::Executor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Initial working directory for commands.
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    /// Drain output line by line and echo it live.
    #[serde(default)]
    pub stream_output: bool,

    /// Skip execution of every command.
    #[serde(default)]
    pub dry_run: bool,

    /// Interpreter for shell-interpreted commands.
    #[serde(default = "default_shell")]
    pub shell: PathBuf,

    /// Git binary used by the git facade.
    #[serde(default = "default_git_binary")]
    pub git_binary: PathBuf,
}

impl ExecutorConfig {
    /// Config rooted at `working_dir` with every other option defaulted.
    #[must_use]
    pub fn at(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            ..Self::default()
        }
    }

    /// Load config from a TOML file.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns error if the file can't be read, parsed, or fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a TOML file.
    ///
    /// # Errors
    /// Returns error if serialization or write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| std::io::Error::other(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check that the interpreter and git paths are usable values.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] for empty paths.
    pub fn validate(&self) -> Result<()> {
        if self.shell.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("shell path is empty".into()));
        }
        if self.git_binary.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("git binary path is empty".into()));
        }
        if self.working_dir.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("working directory is empty".into()));
        }
        Ok(())
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            working_dir: default_working_dir(),
            stream_output: false,
            dry_run: false,
            shell: default_shell(),
            git_binary: default_git_binary(),
        }
    }
}

fn default_working_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn default_shell() -> PathBuf {
    PathBuf::from(DEFAULT_SHELL)
}

fn default_git_binary() -> PathBuf {
    PathBuf::from(DEFAULT_GIT_BINARY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ExecutorConfig::default();
        assert_eq!(config.shell, PathBuf::from("/bin/sh"));
        assert_eq!(config.git_binary, PathBuf::from("/usr/bin/git"));
        assert!(!config.stream_output);
        assert!(!config.dry_run);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gitshell.toml");

        let config = ExecutorConfig {
            working_dir: temp.path().to_path_buf(),
            stream_output: true,
            dry_run: true,
            shell: "/bin/bash".into(),
            git_binary: "/opt/git/bin/git".into(),
        };

        config.save(&path).unwrap();
        let loaded = ExecutorConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gitshell.toml");
        fs::write(&path, "stream_output = true\n").unwrap();

        let loaded = ExecutorConfig::load(&path).unwrap();
        assert!(loaded.stream_output);
        assert_eq!(loaded.shell, PathBuf::from(DEFAULT_SHELL));
    }

    #[test]
    fn test_missing_config_returns_default() {
        let config = ExecutorConfig::load("/nonexistent/path/gitshell.toml").unwrap();
        assert_eq!(config.shell, PathBuf::from(DEFAULT_SHELL));
    }

    #[test]
    fn test_empty_shell_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gitshell.toml");
        fs::write(&path, "shell = \"\"\n").unwrap();

        let err = ExecutorConfig::load(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
