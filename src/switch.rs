use tracing::{info, warn};

use crate::{
    model::{Interpreter, Tools},
    shell::{SearchPath, Shell},
};

pub const SWITCH_ERROR: &str = "Error switching pyenv version";

/// Make `interpreter` the active Python and describe the outcome.
///
/// Only the pyenv branch outlives this process: `pyenv global` writes pyenv's
/// own version file. The Homebrew branch prepends the keg's `bin` directory
/// to this process's `PATH`, which children inherit but the calling shell
/// never sees. No external command runs for Homebrew.
pub fn switch_version(
    shell: &dyn Shell,
    path: &mut dyn SearchPath,
    tools: &Tools,
    interpreter: &Interpreter,
) -> String {
    match interpreter {
        Interpreter::Pyenv(version) => match shell.run(tools.pyenv(), &["global", version.as_str()]) {
            Ok(out) if out.success => {
                info!(%version, "pyenv global updated");
                format!("Switched to pyenv Python {version}")
            }
            Ok(_) => {
                warn!(%version, "pyenv global exited with non-zero status");
                SWITCH_ERROR.to_string()
            }
            Err(e) => {
                warn!(%version, error = %e, "could not run pyenv global");
                SWITCH_ERROR.to_string()
            }
        },
        Interpreter::Homebrew(name) => {
            let bin = tools.homebrew_bin(name);
            if let Err(e) = path.prepend(&bin) {
                // The keg path is still reported; PATH is left untouched.
                warn!(bin = %bin.display(), error = %e, "could not update PATH");
            }
            format!("Switched to Homebrew Python {name}")
        }
    }
}
