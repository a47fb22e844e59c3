use std::path::{Path, PathBuf};

/// Prefix Homebrew gives its Python kegs in the `opt` directory.
pub const HOMEBREW_PREFIX_TOKEN: &str = "python@";

/// Locations of the two providers on this machine.
#[derive(Debug, Clone)]
pub struct Tools {
    /// pyenv executable, looked up on `PATH` when not absolute.
    pub pyenv: PathBuf,
    /// Homebrew `opt` directory holding `python@X.Y` kegs.
    pub brew_opt: PathBuf,
}

impl Tools {
    pub fn homebrew_bin(&self, name: &str) -> PathBuf {
        self.brew_opt.join(name).join("bin")
    }

    pub fn homebrew_python(&self, name: &str) -> PathBuf {
        self.homebrew_bin(name).join("python3")
    }

    pub fn pyenv(&self) -> &Path {
        &self.pyenv
    }
}

/// Where an interpreter was discovered.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Source {
    VersionManager,
    PackageManagerDir,
}

/// The interpreter an entry names, carried alongside the display text so
/// nothing has to parse the title back apart.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Interpreter {
    /// A bare pyenv version, e.g. `3.11.4`.
    Pyenv(String),
    /// A Homebrew keg directory name, e.g. `python@3.12`.
    Homebrew(String),
}

impl Interpreter {
    pub fn source(&self) -> Source {
        match self {
            Interpreter::Pyenv(_) => Source::VersionManager,
            Interpreter::Homebrew(_) => Source::PackageManagerDir,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VersionEntry {
    pub title: String,
    pub description: String,
    pub interpreter: Interpreter,
    /// The version `pyenv version-name` currently reports.
    pub active: bool,
}

impl VersionEntry {
    pub fn pyenv(version: impl Into<String>) -> Self {
        let version = version.into();
        Self {
            title: format!("pyenv {version}"),
            description: "Pyenv version".to_string(),
            interpreter: Interpreter::Pyenv(version),
            active: false,
        }
    }

    pub fn homebrew(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            description: "Homebrew version".to_string(),
            interpreter: Interpreter::Homebrew(name),
            active: false,
        }
    }

    pub fn source(&self) -> Source {
        self.interpreter.source()
    }
}

/// Combine both sources into one list: pyenv entries first, each source in
/// its own order. Duplicates are kept.
pub fn combine(pyenv: Vec<String>, homebrew: Vec<String>) -> Vec<VersionEntry> {
    pyenv
        .into_iter()
        .map(VersionEntry::pyenv)
        .chain(homebrew.into_iter().map(VersionEntry::homebrew))
        .collect()
}

/// Flag the pyenv entries whose version equals `current`.
pub fn mark_active(entries: &mut [VersionEntry], current: Option<&str>) {
    let Some(current) = current else { return };
    for e in entries.iter_mut() {
        e.active = matches!(&e.interpreter, Interpreter::Pyenv(v) if v == current);
    }
}
