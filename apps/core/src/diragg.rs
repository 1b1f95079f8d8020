//! Directory-aggregation sub-processor: collects child directories from a
//! configured set of parent locations, grouped into categories, and opens
//! the selected one.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use walkdir::WalkDir;

use crate::config::{self, ConfigError};
use crate::opener::Opener;
use crate::processor::{
    Column, HotkeyKind, Processor, ProcessorInput, ProcessorOutput, SubProcessor,
};
use crate::strcompare;

pub const DIRAGG_PREFIX: char = '>';

pub struct DirAggProcessor {
    locations_path: PathBuf,
    categories: BTreeMap<String, Vec<String>>,
    category: Option<String>,
    opener: Rc<dyn Opener>,
}

impl DirAggProcessor {
    pub fn new(locations_path: PathBuf, opener: Rc<dyn Opener>) -> Result<Self, ConfigError> {
        let mut processor = Self {
            locations_path,
            categories: BTreeMap::new(),
            category: None,
            opener,
        };
        processor.reload()?;
        Ok(processor)
    }

    /// Re-reads the locations file and drops back to the category view.
    pub fn reload(&mut self) -> Result<(), ConfigError> {
        self.categories = config::load_list_map(&self.locations_path)?;
        self.category = None;
        Ok(())
    }

    fn filter_categories(&self, filter_text: &str) -> Vec<String> {
        self.categories
            .keys()
            .filter(|name| strcompare::choice(filter_text, name))
            .cloned()
            .collect()
    }

    fn show_available_categories(
        &mut self,
        input: &ProcessorInput,
        cmdtext: &str,
    ) -> Option<ProcessorOutput> {
        if input.selrow().is_some()
            && (input.is_complete || input.event.is_hotkey(HotkeyKind::Into))
        {
            self.category = Some(input.selrow_text(0));
            let mut out = ProcessorOutput::default();
            out.set_cmd(DIRAGG_PREFIX.to_string());
            return Some(out);
        }
        let categories = self.filter_categories(cmdtext);
        let mut out = ProcessorOutput::default();
        out.show_rows(
            vec![Column::new("Name", 1)],
            categories.into_iter().map(|name| vec![name]).collect(),
            input.selected_row,
        );
        out.set_txt("Select a DirAgg category");
        Some(out)
    }

    fn show_selected_category(
        &mut self,
        input: &ProcessorInput,
        cmdtext: &str,
    ) -> Option<ProcessorOutput> {
        if input.is_complete {
            if let Some(row) = input.selrow() {
                let (name, parent) = (row.first()?, row.get(1)?);
                let _ = self.opener.open_path(&Path::new(parent).join(name));
            }
            return Some(ProcessorOutput::hidden());
        }
        let category = self.category.as_deref().unwrap_or_default();
        let mut out_lines = vec![format!("DirAgg selected category: {category}")];
        let mut rows = Vec::new();
        for parent in self.categories.get(category).into_iter().flatten() {
            if !Path::new(parent).is_dir() {
                out_lines.push(format!("Path not found: {parent}"));
                continue;
            }
            let walker = WalkDir::new(parent)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name();
            for entry in walker.into_iter().filter_map(|entry| entry.ok()) {
                if !entry.file_type().is_dir() {
                    continue;
                }
                let name = entry.file_name().to_string_lossy().into_owned();
                if name.starts_with('.') || name.starts_with("__") {
                    continue;
                }
                if !strcompare::choice(cmdtext, &entry.path().to_string_lossy()) {
                    continue;
                }
                rows.push(vec![name, parent.clone()]);
            }
        }
        let mut out = ProcessorOutput::default();
        out.show_rows(
            vec![Column::new("Name", 1), Column::new("Path", 1)],
            rows,
            input.selected_row,
        );
        out.set_txt(out_lines.join("\n"));
        Some(out)
    }
}

impl Processor for DirAggProcessor {
    fn help_text(&self) -> String {
        format!("DirAgg processor prefix: {DIRAGG_PREFIX}\n")
    }

    fn update(&mut self, input: &ProcessorInput) -> Option<ProcessorOutput> {
        let mut cmdtext = input.cmd[DIRAGG_PREFIX.len_utf8()..].trim_start().to_string();

        // A second prefix character locks in a category: either the text
        // before it (first filtered match) or the selected row when empty.
        if self.category.is_none() && cmdtext.contains(DIRAGG_PREFIX) {
            let cattext = cmdtext
                .split(DIRAGG_PREFIX)
                .next()
                .unwrap_or_default()
                .to_string();
            if cattext.is_empty() {
                let from_row = input.selrow_text(0);
                if !from_row.is_empty() {
                    self.category = Some(from_row);
                }
            } else {
                let matches = self.filter_categories(&cattext);
                if let Some(first) = matches.into_iter().next() {
                    self.category = Some(first);
                }
            }
        }

        if self.category.is_some() && cmdtext.contains(DIRAGG_PREFIX) {
            cmdtext = cmdtext
                .split(DIRAGG_PREFIX)
                .nth(1)
                .unwrap_or_default()
                .to_string();
        }

        if input.event.is_hotkey(HotkeyKind::OutOf) {
            self.category = None;
            let mut out = ProcessorOutput::default();
            out.set_cmd(DIRAGG_PREFIX.to_string());
            return Some(out);
        }

        if self.category.is_none() {
            return self.show_available_categories(input, &cmdtext);
        }
        self.show_selected_category(input, &cmdtext)
    }
}

impl SubProcessor for DirAggProcessor {
    fn claims_input(&mut self, input: &ProcessorInput) -> bool {
        if input.cmd.is_empty() {
            self.category = None;
            return false;
        }
        input.cmd.starts_with(DIRAGG_PREFIX)
    }
}
