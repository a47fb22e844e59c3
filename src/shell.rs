//! Side effects the switcher needs: running external programs and editing
//! this process's `PATH`. Both sit behind traits so tests can record calls
//! instead of performing them.

use std::{env, ffi::OsString, io, path::Path, process::Command};

use tracing::debug;

/// Captured result of a finished command. stderr is not kept.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Captured {
    pub success: bool,
    pub stdout: String,
}

pub trait Shell {
    /// Run `program` with `args` to completion, adding `env` on top of the
    /// inherited environment. `Err` only when the program could not be
    /// started at all.
    fn run_with_env(&self, program: &Path, args: &[&str], env: &[(&str, &str)]) -> io::Result<Captured>;

    fn run(&self, program: &Path, args: &[&str]) -> io::Result<Captured> {
        self.run_with_env(program, args, &[])
    }
}

pub struct SystemShell;

impl Shell for SystemShell {
    fn run_with_env(&self, program: &Path, args: &[&str], env: &[(&str, &str)]) -> io::Result<Captured> {
        debug!(program = %program.display(), ?args, ?env, "running");
        let mut command = Command::new(program);
        command.args(args);
        for (key, value) in env {
            command.env(key, value);
        }
        let output = command.output()?;
        Ok(Captured {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

pub trait SearchPath {
    /// Put `dir` in front of the executable search path.
    fn prepend(&mut self, dir: &Path) -> io::Result<()>;
}

/// Edits the real `PATH` of this process. Children spawned afterwards
/// inherit it; the invoking shell never sees it.
pub struct ProcessSearchPath;

impl SearchPath for ProcessSearchPath {
    fn prepend(&mut self, dir: &Path) -> io::Result<()> {
        let current = env::var_os("PATH").unwrap_or_default();
        let joined = prepend_to(dir, &current)?;
        debug!(path = ?joined, "updating PATH");
        // SAFETY: called from the main thread after the picker has returned;
        // nothing else reads or writes the environment concurrently.
        unsafe { env::set_var("PATH", joined) };
        Ok(())
    }
}

/// Build a search path value with `dir` first, followed by `current`.
pub fn prepend_to(dir: &Path, current: &OsString) -> io::Result<OsString> {
    let rest = env::split_paths(current).filter(|p| !p.as_os_str().is_empty());
    env::join_paths(std::iter::once(dir.to_path_buf()).chain(rest))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
}

#[cfg(test)]
pub mod fake {
    use std::{
        cell::RefCell,
        collections::HashMap,
        path::PathBuf,
    };

    use super::*;

    /// Records every invocation and answers from a canned table keyed by
    /// the full command line, written shell-style with any env overrides
    /// first (`KEY=value program args`). Unknown commands fail to spawn.
    #[derive(Default)]
    pub struct FakeShell {
        pub replies: HashMap<String, Captured>,
        pub calls: RefCell<Vec<String>>,
    }

    impl FakeShell {
        pub fn reply(mut self, line: &str, success: bool, stdout: &str) -> Self {
            self.replies.insert(
                line.to_string(),
                Captured { success, stdout: stdout.to_string() },
            );
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl Shell for FakeShell {
        fn run_with_env(&self, program: &Path, args: &[&str], env: &[(&str, &str)]) -> io::Result<Captured> {
            let mut line = String::new();
            for (key, value) in env {
                line.push_str(&format!("{key}={value} "));
            }
            line.push_str(&program.display().to_string());
            for arg in args {
                line.push(' ');
                line.push_str(arg);
            }
            self.calls.borrow_mut().push(line.clone());
            self.replies
                .get(&line)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, line))
        }
    }

    #[derive(Default)]
    pub struct FakeSearchPath {
        pub prepended: Vec<PathBuf>,
    }

    impl SearchPath for FakeSearchPath {
        fn prepend(&mut self, dir: &Path) -> io::Result<()> {
            self.prepended.push(dir.to_path_buf());
            Ok(())
        }
    }
}
