//! Process startup: CLI parsing, config loading, processor-stack assembly,
//! and a line-oriented standard-input shell driving the dispatcher.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::config::{ConfigError, MainConfig, OUTPUT_DIR_KEY};
use crate::diragg::DirAggProcessor;
use crate::dirlist::DirListProcessor;
use crate::dispatcher::{Dispatcher, HistoryAware};
use crate::history::{HistManager, HistoryError};
use crate::launch::LaunchProcessor;
use crate::logging;
use crate::mathproc::MathProcessor;
use crate::opener::{Opener, SystemOpener};
use crate::processor::{Event, HotkeyKind, ProcessorInput, RowUpdate, SubProcessor};
use crate::quickcmd::QuickCmdProcessor;
use crate::quickwin::QuickWinProcessor;
use crate::window::{NullWindowProvider, WindowProvider};

#[derive(Debug)]
pub enum RuntimeError {
    Config(ConfigError),
    History(HistoryError),
    Logging(std::io::Error),
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(error) => write!(f, "config error: {error}"),
            Self::History(error) => write!(f, "history error: {error}"),
            Self::Logging(error) => write!(f, "logging error: {error}"),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<ConfigError> for RuntimeError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<HistoryError> for RuntimeError {
    fn from(value: HistoryError) -> Self {
        Self::History(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub config_path: PathBuf,
    pub check_only: bool,
}

pub fn parse_cli_args(args: &[String]) -> Result<CliOptions, String> {
    let mut config_path = None;
    let mut check_only = false;
    for arg in args {
        match arg.as_str() {
            "--check" => check_only = true,
            other if other.starts_with('-') => {
                return Err(format!("unknown option: {other}"));
            }
            other => {
                if config_path.is_some() {
                    return Err("expected exactly one config file argument".to_string());
                }
                config_path = Some(PathBuf::from(other));
            }
        }
    }
    let Some(config_path) = config_path else {
        return Err("usage: quickwin-core <config.yaml> [--check]".to_string());
    };
    Ok(CliOptions {
        config_path,
        check_only,
    })
}

/// Assembles the full processor stack from configuration. Sub-processors
/// that need configuration are included only when their section exists.
pub fn build_dispatcher(
    config: &MainConfig,
    provider: Box<dyn WindowProvider>,
    opener: Rc<dyn Opener>,
) -> Result<Dispatcher<HistoryAware<QuickWinProcessor>>, RuntimeError> {
    let mut subs: Vec<Box<dyn SubProcessor>> = vec![
        Box::new(MathProcessor::new()),
        Box::new(DirListProcessor::new(Rc::clone(&opener))),
    ];

    if let Some(cfg) = config.processor("diragg") {
        let locations = PathBuf::from(cfg.require("locations_file")?);
        subs.push(Box::new(DirAggProcessor::new(
            locations,
            Rc::clone(&opener),
        )?));
    }

    if let Some(cfg) = config.processor("launch") {
        let launch_dir = PathBuf::from(cfg.require("launch_dir")?);
        let histmgr = HistManager::open(&cfg.outpath("launch-hist")?, Some(0))?;
        subs.push(Box::new(HistoryAware::new(LaunchProcessor::new(
            launch_dir,
            histmgr,
            Rc::clone(&opener),
        ))));
    }

    if let Some(cfg) = config.processor("quickcmd") {
        let snippets = PathBuf::from(cfg.require("config_file")?);
        let histmgr = HistManager::open(&cfg.outpath("quickcmd-hist")?, Some(0))?;
        subs.push(Box::new(HistoryAware::new(QuickCmdProcessor::new(
            snippets, histmgr,
        )?)));
    }

    let root_cfg = match config.processor("quickwin") {
        Some(cfg) => cfg,
        None => config.common()?,
    };
    let alias_path = root_cfg.outpath("quickwin-alias")?;
    let exclude_path = root_cfg.get("exclude_file").map(PathBuf::from);
    let histmgr = HistManager::open(&root_cfg.outpath("quickwin-hist")?, None)?;
    let root = HistoryAware::new(QuickWinProcessor::new(
        alias_path,
        exclude_path,
        histmgr,
        provider,
    ));

    Ok(Dispatcher::new(root, subs))
}

pub fn run_with_options(options: CliOptions) -> Result<(), RuntimeError> {
    let config = MainConfig::load(&options.config_path)?;
    let common = config.common()?;
    let output_dir = common.require(OUTPUT_DIR_KEY)?.to_string();
    logging::init(Path::new(&output_dir)).map_err(RuntimeError::Logging)?;

    let opener: Rc<dyn Opener> = Rc::new(SystemOpener);
    let mut dispatcher = build_dispatcher(&config, Box::new(NullWindowProvider), opener)?;

    if options.check_only {
        println!("[quickwin-core] config ok: {}", options.config_path.display());
        return Ok(());
    }

    logging::info(&format!(
        "startup config_path={} output_dir={output_dir}",
        options.config_path.display()
    ));
    println!("{}", dispatcher.help_text());
    run_stdin_shell(&mut dispatcher);
    Ok(())
}

/// Minimal presentation sink for headless use: one line per event.
/// `:commit`, `:next`, `:prev`, `:into`, `:outof`, `:up`, `:down`,
/// `:hide`, and `:quit` map to shell events; any other line replaces the
/// command text.
fn run_stdin_shell(dispatcher: &mut Dispatcher<HistoryAware<QuickWinProcessor>>) {
    let mut shell = ShellState::default();
    shell.apply(dispatcher, Event::CmdChange, false);

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };
        match line.trim_end() {
            ":quit" => break,
            ":hide" => {
                shell.hide(dispatcher);
                println!("(hidden)");
            }
            ":commit" => shell.apply(dispatcher, Event::CmdChange, true),
            ":next" => shell.apply(dispatcher, Event::Hotkey(HotkeyKind::Next), false),
            ":prev" => shell.apply(dispatcher, Event::Hotkey(HotkeyKind::Prev), false),
            ":into" => shell.apply(dispatcher, Event::Hotkey(HotkeyKind::Into), false),
            ":outof" => shell.apply(dispatcher, Event::Hotkey(HotkeyKind::OutOf), false),
            ":up" => {
                shell.move_selection(-1);
                shell.apply(dispatcher, Event::MoveUp, false);
            }
            ":down" => {
                shell.move_selection(1);
                shell.apply(dispatcher, Event::MoveDown, false);
            }
            text => {
                shell.cmd = text.to_string();
                shell.apply(dispatcher, Event::CmdChange, false);
            }
        }
    }
}

#[derive(Default)]
struct ShellState {
    cmd: String,
    rows: Vec<Vec<String>>,
    selected_row: Option<usize>,
    was_hidden: bool,
    started: bool,
}

impl ShellState {
    fn hide(&mut self, dispatcher: &mut Dispatcher<HistoryAware<QuickWinProcessor>>) {
        self.cmd.clear();
        self.rows.clear();
        self.selected_row = None;
        self.was_hidden = true;
        dispatcher.reset_activation();
    }

    fn move_selection(&mut self, delta: isize) {
        if self.rows.is_empty() {
            self.selected_row = None;
            return;
        }
        let len = self.rows.len() as isize;
        let current = self.selected_row.unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(len);
        self.selected_row = Some(next as usize);
    }

    fn apply(
        &mut self,
        dispatcher: &mut Dispatcher<HistoryAware<QuickWinProcessor>>,
        mut event: Event,
        mut is_complete: bool,
    ) {
        if !self.started {
            self.was_hidden = true;
            self.started = true;
        }
        // A command replacement triggers another update, like a text-field
        // change would; bounded to avoid render loops.
        for _ in 0..4 {
            let input = ProcessorInput {
                cmd: self.cmd.clone(),
                rows: self.rows.clone(),
                selected_row: self.selected_row,
                event,
                is_complete,
                was_hidden: self.was_hidden,
                was_activated: false,
            };
            let Some(out) = dispatcher.update(&input) else {
                return;
            };
            self.was_hidden = false;
            if out.hide {
                self.hide(dispatcher);
                println!("(hidden)");
                return;
            }
            match out.rows {
                Some(RowUpdate::Hide) => {
                    self.rows.clear();
                    self.selected_row = None;
                }
                Some(RowUpdate::Show {
                    rows, selected, ..
                }) => {
                    self.rows = rows;
                    self.selected_row = if self.rows.is_empty() {
                        None
                    } else {
                        Some(selected.unwrap_or(0).min(self.rows.len() - 1))
                    };
                }
                None => {}
            }
            if let Some(text) = &out.out_text {
                println!("{text}");
            }
            self.render_rows();
            match out.cmd_text {
                Some(text) if text != self.cmd => {
                    self.cmd = text;
                    println!("> {}", self.cmd);
                    // The replacement behaves like freshly typed text.
                    event = Event::CmdChange;
                    is_complete = false;
                }
                _ => return,
            }
        }
    }

    fn render_rows(&self) {
        for (index, row) in self.rows.iter().enumerate() {
            let marker = if Some(index) == self.selected_row {
                '*'
            } else {
                ' '
            };
            println!("{marker} {}", row.join(" | "));
        }
    }
}
