use tracing::warn;

use crate::{
    model::{Interpreter, Tools},
    shell::Shell,
};

/// Shown in place of the package listing when `pip list` cannot be run.
pub const PACKAGES_SENTINEL: &str = "Error retrieving packages";

/// `pip list` output for `interpreter`, or [`PACKAGES_SENTINEL`] on any
/// failure. Errors are logged, never returned.
pub fn list_packages(shell: &dyn Shell, tools: &Tools, interpreter: &Interpreter) -> String {
    let result = match interpreter {
        // PYENV_VERSION makes `pyenv exec` use the selected version rather
        // than whichever one is currently global
        Interpreter::Pyenv(version) => shell.run_with_env(
            tools.pyenv(),
            &["exec", "python", "-m", "pip", "list"],
            &[("PYENV_VERSION", version.as_str())],
        ),
        Interpreter::Homebrew(name) => {
            shell.run(&tools.homebrew_python(name), &["-m", "pip", "list"])
        }
    };

    match result {
        Ok(out) if out.success => out.stdout,
        Ok(_) => {
            warn!(?interpreter, "pip list exited with non-zero status");
            PACKAGES_SENTINEL.to_string()
        }
        Err(e) => {
            warn!(?interpreter, error = %e, "could not run pip list");
            PACKAGES_SENTINEL.to_string()
        }
    }
}
