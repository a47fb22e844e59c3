use std::path::Path;

use tracing::debug;

use crate::{
    error::{Result, SourceError},
    model::HOMEBREW_PREFIX_TOKEN,
    shell::Shell,
};

/// Split command output into its non-empty trimmed lines, keeping order.
fn bare_lines(stdout: &str) -> Vec<String> {
    stdout
        .trim()
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Versions reported by `pyenv versions --bare`, in pyenv's order.
pub fn list_version_manager_versions(shell: &dyn Shell, pyenv: &Path) -> Result<Vec<String>> {
    let args = ["versions", "--bare"];
    let command = format!("{} {}", pyenv.display(), args.join(" "));

    let out = shell.run(pyenv, &args).map_err(|e| SourceError::ExternalCommand {
        command: command.clone(),
        reason: e.to_string(),
    })?;
    if !out.success {
        return Err(SourceError::ExternalCommand {
            command,
            reason: "exited with non-zero status".to_string(),
        });
    }

    let versions = bare_lines(&out.stdout);
    debug!(count = versions.len(), "pyenv versions");
    Ok(versions)
}

/// What `pyenv version-name` reports as active. Any failure means no
/// marker, never an error.
pub fn current_version_manager_version(shell: &dyn Shell, pyenv: &Path) -> Option<String> {
    match shell.run(pyenv, &["version-name"]) {
        Ok(out) if out.success => {
            let name = out.stdout.trim();
            (!name.is_empty()).then(|| name.to_string())
        }
        Ok(_) => {
            debug!("pyenv version-name exited with non-zero status");
            None
        }
        Err(e) => {
            debug!(error = %e, "could not run pyenv version-name");
            None
        }
    }
}

/// `python@*` entries of the Homebrew `opt` directory, in read order.
pub fn list_package_manager_versions(dir: &Path) -> Result<Vec<String>> {
    let fs_err = |source| SourceError::Filesystem { path: dir.to_path_buf(), source };

    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(fs_err)? {
        let entry = entry.map_err(fs_err)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(HOMEBREW_PREFIX_TOKEN) {
            out.push(name);
        }
    }
    debug!(count = out.len(), dir = %dir.display(), "homebrew versions");
    Ok(out)
}
