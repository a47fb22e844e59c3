use std::{env, path::PathBuf};

use clap::Parser;

use crate::model::Tools;

const DEFAULT_BREW_OPT: &str = "/opt/homebrew/opt";

#[derive(Parser, Debug)]
#[command(
    name = "pyswitch",
    version,
    about = "Pick an installed Python, list its packages and make it active",
    after_help = "Only pyenv selections persist: `pyenv global` is run for them. \
                  Homebrew selections only change PATH for this process and its children."
)]
pub struct Cli {
    /// pyenv executable to use
    #[arg(long, value_name = "CMD", default_value = "pyenv")]
    pub pyenv: PathBuf,

    /// Homebrew opt directory (default: $HOMEBREW_PREFIX/opt or /opt/homebrew/opt)
    #[arg(long, value_name = "DIR")]
    pub brew_opt: Option<PathBuf>,

    /// Skim color scheme, e.g. "dark", "light", "none", or a custom spec
    /// like: dark,current_bg:24,matched:#00FF00
    #[arg(long = "color", value_name = "SPEC")]
    pub color_spec: Option<String>,

    /// Disable per-source coloring of list rows
    #[arg(long)]
    pub no_seg_colors: bool,

    /// Print the discovered interpreters and exit
    #[arg(long)]
    pub list: bool,
}

impl Cli {
    pub fn tools(&self) -> Tools {
        Tools {
            pyenv: self.pyenv.clone(),
            brew_opt: self.brew_opt.clone().unwrap_or_else(|| {
                default_brew_opt(env::var("HOMEBREW_PREFIX").ok().as_deref())
            }),
        }
    }
}

fn default_brew_opt(homebrew_prefix: Option<&str>) -> PathBuf {
    if let Some(prefix) = homebrew_prefix
        && !prefix.trim().is_empty()
    {
        return PathBuf::from(prefix).join("opt");
    }
    PathBuf::from(DEFAULT_BREW_OPT)
}
