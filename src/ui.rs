use std::{borrow::Cow, io::Write};

use anyhow::{Result, anyhow};
use skim::prelude::*;
use skim_tuikit::prelude::{Attr, Color, Effect};
use tracing::debug;

use crate::{
    inspect::list_packages,
    model::{Source, Tools, VersionEntry},
    shell::{SearchPath, Shell},
    switch::switch_version,
};

const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";
const SEPARATOR: &str = "-------------------------------------------------";

/// How one round of the list widget ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PickOutcome {
    /// `q`, `Esc` or `Ctrl-C`.
    Abort,
    /// Enter, with the highlighted row if there was one.
    Accept(Option<usize>),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Session {
    Listing,
    Confirmed(VersionEntry),
    Quit,
}

impl Session {
    pub fn step(entries: &[VersionEntry], outcome: PickOutcome) -> Session {
        match outcome {
            PickOutcome::Abort => Session::Quit,
            PickOutcome::Accept(Some(idx)) => match entries.get(idx) {
                Some(entry) => Session::Confirmed(entry.clone()),
                None => Session::Listing,
            },
            // Confirm with nothing highlighted does nothing.
            PickOutcome::Accept(None) => Session::Listing,
        }
    }
}

/// Anything that can show the entries and report how the user left.
pub trait Chooser {
    fn choose(&mut self, entries: &[VersionEntry]) -> Result<PickOutcome>;
}

/// Show the list until the user confirms an entry or quits.
pub fn run_session(chooser: &mut dyn Chooser, entries: &[VersionEntry]) -> Result<Option<VersionEntry>> {
    loop {
        let outcome = chooser.choose(entries)?;
        debug!(?outcome, "picker returned");
        match Session::step(entries, outcome) {
            Session::Listing => continue,
            Session::Confirmed(entry) => return Ok(Some(entry)),
            Session::Quit => return Ok(None),
        }
    }
}

/// Print the packages of `entry`, then switch to it.
pub fn confirm(
    out: &mut dyn Write,
    shell: &dyn Shell,
    path: &mut dyn SearchPath,
    tools: &Tools,
    entry: &VersionEntry,
) -> std::io::Result<()> {
    let packages = list_packages(shell, tools, &entry.interpreter);

    write!(out, "{CLEAR_SCREEN}")?;
    writeln!(out, "Packages for {} :\n", entry.title)?;
    writeln!(out, "{packages}")?;
    writeln!(out, "\n{SEPARATOR}\n")?;

    let status = switch_version(shell, path, tools, &entry.interpreter);
    writeln!(out, "{status}")?;
    out.flush()
}

pub struct Picker {
    color_spec: Option<String>,
    seg_colors: bool,
}

struct VersionItem {
    text: String,
    display: AnsiString<'static>,
    id: String,
    index: usize,
}

impl SkimItem for VersionItem {
    fn text(&self) -> Cow<str> { Cow::Borrowed(&self.text) }
    fn output(&self) -> Cow<str> { Cow::Borrowed(&self.id) }
    fn get_index(&self) -> usize { self.index }
    fn set_index(&mut self, index: usize) { self.index = index; }

    fn display<'a>(&'a self, context: DisplayContext<'a>) -> AnsiString<'a> {
        // Keep our segment colors, overlay the match highlight on top
        let mut ret = self.display.clone();
        let matched: Vec<(Attr, (u32, u32))> = match context.matches {
            Matches::CharIndices(indices) => indices
                .iter()
                .map(|&idx| (context.highlight_attr, (idx as u32, idx as u32 + 1)))
                .collect(),
            Matches::CharRange(start, end) => vec![(context.highlight_attr, (start as u32, end as u32))],
            Matches::ByteRange(start, end) => {
                let ch_start = context.text[..start].chars().count();
                let ch_end = ch_start + context.text[start..end].chars().count();
                vec![(context.highlight_attr, (ch_start as u32, ch_end as u32))]
            }
            Matches::None => vec![],
        };
        ret.override_attrs(matched);
        ret
    }
}

impl Picker {
    pub fn new(color_spec: Option<String>, seg_colors: bool) -> Self {
        Self { color_spec, seg_colors }
    }

    fn options(&self) -> Result<SkimOptions> {
        let mut options = SkimOptionsBuilder::default()
            .height("60%".to_string())
            .multi(false)
            .reverse(true)
            .prompt("Select a Python version> ".to_string())
            .bind(vec!["q:abort".to_string()])
            .build()
            .map_err(|e| anyhow!("invalid picker options: {e}"))?;

        // Prefer CLI value, else dark unless NO_COLOR is set
        if let Some(spec) = &self.color_spec {
            options.color = Some(spec.clone());
        } else if std::env::var("NO_COLOR").is_err() {
            options.color = Some("dark".to_string());
        }
        Ok(options)
    }
}

impl Chooser for Picker {
    fn choose(&mut self, entries: &[VersionEntry]) -> Result<PickOutcome> {
        let (tx, rx): (SkimItemSender, SkimItemReceiver) = unbounded();

        let seg_colors = self.seg_colors && std::env::var("NO_COLOR").is_err();
        for (i, e) in entries.iter().enumerate() {
            let (text, display) = build_colored_line(e, seg_colors);
            let item = VersionItem { text, display, id: i.to_string(), index: i };
            let _ = tx.send(Arc::new(item));
        }
        drop(tx);

        let options = self.options()?;
        let Some(out) = Skim::run_with(&options, Some(rx)) else {
            return Ok(PickOutcome::Abort);
        };
        if out.is_abort {
            return Ok(PickOutcome::Abort);
        }
        let idx = out
            .selected_items
            .first()
            .and_then(|item| item.output().parse::<usize>().ok());
        Ok(PickOutcome::Accept(idx))
    }
}

const ACTIVE_MARK: &str = " \u{2714}";

/// Row text is `<title>  <description>`, plus a check mark on the active
/// pyenv version. The title is colored per source.
fn build_colored_line(e: &VersionEntry, seg_colors: bool) -> (String, AnsiString<'static>) {
    let sep = "  ";
    let mark = if e.active { ACTIVE_MARK } else { "" };
    let base = format!("{}{sep}{}{mark}", e.title, e.description);

    if !seg_colors {
        return (base.clone(), base.into());
    }

    let title_len = e.title.chars().count();
    let title_fg = match e.source() {
        Source::VersionManager => Color::Rgb(0xDA, 0x68, 0xEC),
        Source::PackageManagerDir => Color::AnsiValue(3),
    };
    let title_attr = Attr { fg: title_fg, bg: Color::Default, effect: Effect::BOLD };
    let desc_attr = Attr { fg: Color::AnsiValue(8), bg: Color::Default, effect: Effect::empty() };
    let mark_attr = Attr { fg: Color::AnsiValue(2), bg: Color::Default, effect: Effect::BOLD };

    let desc_start = title_len + sep.chars().count();
    let desc_end = desc_start + e.description.chars().count();
    let mark_end = desc_end + mark.chars().count();
    let mut fragments = vec![
        (title_attr, (0, title_len as u32)),
        (desc_attr, (desc_start as u32, desc_end as u32)),
    ];
    if e.active {
        fragments.push((mark_attr, (desc_end as u32, mark_end as u32)));
    }

    (base.clone(), AnsiString::new_string(base, fragments))
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, path::PathBuf};

    use super::*;
    use crate::shell::fake::{FakeSearchPath, FakeShell};

    struct Scripted(VecDeque<PickOutcome>);

    impl Chooser for Scripted {
        fn choose(&mut self, _entries: &[VersionEntry]) -> Result<PickOutcome> {
            self.0.pop_front().ok_or_else(|| anyhow!("script exhausted"))
        }
    }

    fn entries() -> Vec<VersionEntry> {
        vec![VersionEntry::pyenv("3.11.4"), VersionEntry::homebrew("python@3.12")]
    }

    fn tools() -> Tools {
        Tools { pyenv: PathBuf::from("pyenv"), brew_opt: PathBuf::from("/opt/homebrew/opt") }
    }

    #[test]
    fn step_transitions() {
        let e = entries();
        assert_eq!(Session::step(&e, PickOutcome::Abort), Session::Quit);
        assert_eq!(Session::step(&e, PickOutcome::Accept(None)), Session::Listing);
        assert_eq!(Session::step(&e, PickOutcome::Accept(Some(9))), Session::Listing);
        assert_eq!(
            Session::step(&e, PickOutcome::Accept(Some(1))),
            Session::Confirmed(VersionEntry::homebrew("python@3.12"))
        );
    }

    #[test]
    fn empty_list_confirm_is_noop_until_quit() {
        let mut chooser = Scripted(VecDeque::from([
            PickOutcome::Accept(None),
            PickOutcome::Accept(None),
            PickOutcome::Abort,
        ]));
        let picked = run_session(&mut chooser, &[]).unwrap();
        assert_eq!(picked, None);
        assert!(chooser.0.is_empty());
    }

    #[test]
    fn session_returns_confirmed_entry() {
        let mut chooser = Scripted(VecDeque::from([PickOutcome::Accept(Some(0))]));
        let picked = run_session(&mut chooser, &entries()).unwrap();
        assert_eq!(picked, Some(VersionEntry::pyenv("3.11.4")));
    }

    #[test]
    fn confirm_inspects_then_switches_pyenv() {
        let shell = FakeShell::default()
            .reply("PYENV_VERSION=3.11.4 pyenv exec python -m pip list", true, "pip 24.0")
            .reply("pyenv global 3.11.4", true, "");
        let mut path = FakeSearchPath::default();
        let mut out = Vec::new();

        confirm(&mut out, &shell, &mut path, &tools(), &VersionEntry::pyenv("3.11.4")).unwrap();

        assert_eq!(
            shell.calls(),
            ["PYENV_VERSION=3.11.4 pyenv exec python -m pip list", "pyenv global 3.11.4"]
        );
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(CLEAR_SCREEN));
        assert!(text.contains("Packages for pyenv 3.11.4 :"));
        assert!(text.trim_end().ends_with("Switched to pyenv Python 3.11.4"));
    }

    #[test]
    fn confirm_inspects_then_switches_homebrew() {
        let shell = FakeShell::default();
        let mut path = FakeSearchPath::default();
        let mut out = Vec::new();

        confirm(&mut out, &shell, &mut path, &tools(), &VersionEntry::homebrew("python@3.12")).unwrap();

        assert_eq!(shell.calls(), ["/opt/homebrew/opt/python@3.12/bin/python3 -m pip list"]);
        assert_eq!(path.prepended.len(), 1);
        let text = String::from_utf8(out).unwrap();
        let packages = text.find("Error retrieving packages").unwrap();
        let sep = text.find(SEPARATOR).unwrap();
        let switched = text.find("Switched to Homebrew Python python@3.12").unwrap();
        assert!(packages < sep && sep < switched);
    }

    #[test]
    fn plain_line_without_colors() {
        let (text, _) = build_colored_line(&VersionEntry::pyenv("3.9.1"), false);
        assert_eq!(text, "pyenv 3.9.1  Pyenv version");
    }

    #[test]
    fn active_entry_gets_check_mark() {
        let mut entry = VersionEntry::pyenv("3.11.4");
        entry.active = true;
        let (text, _) = build_colored_line(&entry, true);
        assert_eq!(text, "pyenv 3.11.4  Pyenv version \u{2714}");
    }
}
