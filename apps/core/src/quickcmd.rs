//! QuickCmd sub-processor: named command snippets loaded from a YAML file.
//! Selecting one replaces the command-line text with the snippet.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::{self, ConfigError};
use crate::dispatcher::HistoryHolder;
use crate::history::HistManager;
use crate::processor::{
    remove_prefix, Column, HotkeyKind, Processor, ProcessorInput, ProcessorOutput, SubProcessor,
};
use crate::strcompare;

pub const QUICKCMD_PREFIX: char = '`';

pub struct QuickCmdProcessor {
    config_path: PathBuf,
    cmds: BTreeMap<String, String>,
    histmgr: HistManager,
}

impl QuickCmdProcessor {
    pub fn new(config_path: PathBuf, histmgr: HistManager) -> Result<Self, ConfigError> {
        let mut processor = Self {
            config_path,
            cmds: BTreeMap::new(),
            histmgr,
        };
        processor.reload()?;
        Ok(processor)
    }

    pub fn reload(&mut self) -> Result<(), ConfigError> {
        self.cmds = config::load_str_map(&self.config_path)?;
        Ok(())
    }

    fn filter_rows(&self, filter_text: &str) -> Vec<Vec<String>> {
        self.cmds
            .iter()
            .filter(|(name, _)| strcompare::choice(filter_text, name))
            .map(|(name, cmd)| vec![name.clone(), cmd.clone()])
            .collect()
    }

    fn set_cmd_from_row(&self, input: &ProcessorInput) -> ProcessorOutput {
        let mut out = ProcessorOutput::default();
        out.set_cmd(input.selrow_text(1));
        out
    }

    /// On first activation, reselect the row remembered by the most recent
    /// history entry; afterwards the shell's selection is kept.
    fn initial_selnum(&mut self, input: &ProcessorInput, rows: &[Vec<String>]) -> Option<usize> {
        if !input.was_activated {
            return input.selected_row;
        }
        let remembered = self
            .histmgr
            .get_prev_entry(&QUICKCMD_PREFIX.to_string())
            .and_then(|entry| entry.row)
            .and_then(|row| {
                rows.iter()
                    .position(|candidate| candidate.first() == Some(&row))
            });
        Some(remembered.unwrap_or(0))
    }
}

impl Processor for QuickCmdProcessor {
    fn help_text(&self) -> String {
        format!("QuickCmd processor prefix: {QUICKCMD_PREFIX}\n")
    }

    fn update(&mut self, input: &ProcessorInput) -> Option<ProcessorOutput> {
        if input.selrow().is_some()
            && (input.is_complete || input.event.is_hotkey(HotkeyKind::Into))
        {
            return Some(self.set_cmd_from_row(input));
        }
        let cmdtext = remove_prefix(QUICKCMD_PREFIX, &input.cmd).to_string();
        let rows = self.filter_rows(&cmdtext);
        let selnum = self.initial_selnum(input, &rows);
        let mut out = ProcessorOutput::default();
        out.set_txt(format!("Found {} matching QuickCmds", rows.len()));
        out.show_rows(
            vec![Column::new("Name", 1), Column::new("Command", 3)],
            rows,
            selnum,
        );
        Some(out)
    }
}

impl SubProcessor for QuickCmdProcessor {
    fn claims_input(&mut self, input: &ProcessorInput) -> bool {
        input.cmd.starts_with(QUICKCMD_PREFIX)
    }
}

impl HistoryHolder for QuickCmdProcessor {
    fn history(&self) -> &HistManager {
        &self.histmgr
    }

    fn history_mut(&mut self) -> &mut HistManager {
        &mut self.histmgr
    }
}
