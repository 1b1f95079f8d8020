//! Launch sub-processor: lists the files of a configured directory and
//! opens the selected one, remembering the last launched row per command.

use std::path::PathBuf;
use std::rc::Rc;

use walkdir::WalkDir;

use crate::dispatcher::HistoryHolder;
use crate::history::HistManager;
use crate::opener::Opener;
use crate::processor::{
    Column, Event, Processor, ProcessorInput, ProcessorOutput, SubProcessor,
};
use crate::strcompare;

pub const LAUNCH_PREFIX: char = '.';

pub struct LaunchProcessor {
    launch_dir: PathBuf,
    histmgr: HistManager,
    opener: Rc<dyn Opener>,
}

impl LaunchProcessor {
    pub fn new(launch_dir: PathBuf, histmgr: HistManager, opener: Rc<dyn Opener>) -> Self {
        Self {
            launch_dir,
            histmgr,
            opener,
        }
    }

    /// Launchable files as `[stem, extension]` rows, filtered on the full
    /// file name. Walk failures degrade to an empty list.
    fn get_rows(&self, cmdtext: &str) -> Vec<Vec<String>> {
        let mut rows = Vec::new();
        let walker = WalkDir::new(&self.launch_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();
        for entry in walker.into_iter().filter_map(|entry| entry.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if !strcompare::choice(cmdtext, &name) {
                continue;
            }
            let path = entry.path();
            let stem = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            let ext = path
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy()))
                .unwrap_or_default();
            rows.push(vec![stem, ext]);
        }
        rows
    }

    fn open_selected(&self, input: &ProcessorInput) -> Option<ProcessorOutput> {
        let row = input.selrow()?;
        let (stem, ext) = (row.first()?, row.get(1)?);
        let path = self.launch_dir.join(format!("{stem}{ext}"));
        let _ = self.opener.open_path(&path);
        Some(ProcessorOutput::hidden())
    }
}

impl Processor for LaunchProcessor {
    fn help_text(&self) -> String {
        format!("Launch processor prefix: {LAUNCH_PREFIX}\n")
    }

    fn update(&mut self, input: &ProcessorInput) -> Option<ProcessorOutput> {
        if input.is_complete && input.selrow().is_some() {
            return self.open_selected(input);
        }
        if input.event != Event::CmdChange {
            return None;
        }
        let cmdtext = input.cmd[LAUNCH_PREFIX.len_utf8()..].trim_start();
        let rows = self.get_rows(cmdtext);
        let names: Vec<String> = rows
            .iter()
            .filter_map(|row| row.first().cloned())
            .collect();
        let selnum = self
            .histmgr
            .match_to_row(input.cmd.trim(), &names)
            .or(input.selected_row);
        let mut out = ProcessorOutput::default();
        out.set_txt(format!("Launch items found: {}", rows.len()));
        out.show_rows(
            vec![Column::new("Name", 3), Column::new("Ext", 1)],
            rows,
            selnum,
        );
        Some(out)
    }
}

impl SubProcessor for LaunchProcessor {
    fn claims_input(&mut self, input: &ProcessorInput) -> bool {
        input.cmd.starts_with(LAUNCH_PREFIX)
    }
}

impl HistoryHolder for LaunchProcessor {
    fn history(&self) -> &HistManager {
        &self.histmgr
    }

    fn history_mut(&mut self) -> &mut HistManager {
        &mut self.histmgr
    }
}
