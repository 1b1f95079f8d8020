//! Directory-browsing sub-processor: navigates a directory stack seeded
//! from the selected explorer window and lists matching children.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use walkdir::WalkDir;

use crate::opener::Opener;
use crate::processor::{
    Column, HotkeyKind, Processor, ProcessorInput, ProcessorOutput, SubProcessor,
};
use crate::strcompare;

pub const DIRLIST_PREFIX: char = '/';

pub struct DirListProcessor {
    dir_stack: Vec<PathBuf>,
    fallback_dir: PathBuf,
    opener: Rc<dyn Opener>,
}

impl DirListProcessor {
    pub fn new(opener: Rc<dyn Opener>) -> Self {
        Self::with_fallback_dir(default_fallback_dir(), opener)
    }

    pub fn with_fallback_dir(fallback_dir: PathBuf, opener: Rc<dyn Opener>) -> Self {
        Self {
            dir_stack: Vec::new(),
            fallback_dir,
            opener,
        }
    }

    pub fn current_dir(&self) -> Option<&PathBuf> {
        self.dir_stack.last()
    }

    /// Seeds the directory stack from the selected window row. Only an
    /// explorer window whose title is an existing directory is usable;
    /// anything else starts at the fallback directory.
    fn load_initial_dir(&mut self, input: &ProcessorInput) {
        let exe = input.selrow_text(2);
        if !exe.eq_ignore_ascii_case("explorer.exe") {
            self.dir_stack = vec![self.fallback_dir.clone()];
            return;
        }
        let title = input.selrow_text(1);
        let initial = PathBuf::from(remove_git_branch_suffix(&title));
        if !initial.is_dir() {
            self.dir_stack = vec![self.fallback_dir.clone()];
            return;
        }
        self.dir_stack = vec![initial];
    }

    fn selected_path(&self, rows: &[Vec<String>], selnum: Option<usize>) -> Option<PathBuf> {
        let row = rows.get(selnum?)?;
        let name = row.first()?;
        let kind = row.get(1)?;
        let current = self.current_dir()?;
        if kind == "dir" {
            // Remove the slash prefix added for display.
            return Some(current.join(name.trim_start_matches(DIRLIST_PREFIX)));
        }
        Some(current.join(name))
    }

    /// Children of `dir` matching `cmdtext`; directories get a `/` display
    /// prefix. Walk failures degrade to an empty list.
    fn get_rows(&self, cmdtext: &str, dir: Option<&PathBuf>) -> Vec<Vec<String>> {
        let Some(dir) = dir else {
            return Vec::new();
        };
        let mut rows = Vec::new();
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();
        for entry in walker.into_iter().filter_map(|entry| entry.ok()) {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !strcompare::choice(cmdtext, &name) {
                continue;
            }
            if entry.file_type().is_dir() {
                rows.push(vec![format!("{DIRLIST_PREFIX}{name}"), "dir".to_string()]);
            } else if entry.file_type().is_file() {
                rows.push(vec![name, "file".to_string()]);
            }
        }
        rows
    }

    fn render_rows(
        &self,
        input: &ProcessorInput,
        reset_cmd: bool,
        out_txt: &str,
    ) -> ProcessorOutput {
        let cmdtext = match input.cmd.split_once(DIRLIST_PREFIX) {
            Some((_, rest)) => rest,
            None => "",
        };
        let rows = self.get_rows(cmdtext, self.current_dir());
        let mut out = ProcessorOutput::default();
        let mut selnum = input.selected_row;
        if reset_cmd {
            out.set_cmd(DIRLIST_PREFIX.to_string());
            selnum = Some(0);
        }
        let selected_path = self
            .selected_path(&rows, selnum)
            .map(|path| path.display().to_string())
            .unwrap_or_default();
        let current = self
            .current_dir()
            .map(|dir| dir.display().to_string())
            .unwrap_or_default();
        out.show_rows(
            vec![Column::new("Name", 5), Column::new("Type", 1)],
            rows,
            selnum,
        );
        out.set_txt(format!(
            "Listing dir content: {current}\nCurrent selected: {selected_path}\n{out_txt}"
        ));
        out
    }
}

impl Processor for DirListProcessor {
    fn help_text(&self) -> String {
        format!("DirList processor prefix: {DIRLIST_PREFIX}\n")
    }

    fn on_activate(&mut self, input: &ProcessorInput) {
        self.load_initial_dir(input);
    }

    fn update(&mut self, input: &ProcessorInput) -> Option<ProcessorOutput> {
        let mut reset_cmd = false;
        let mut out_txt = String::new();
        let path = self.selected_path(&input.rows, input.selected_row);
        if input.is_complete {
            if let Some(path) = &path {
                let _ = self.opener.open_path(path);
            }
            return Some(ProcessorOutput::hidden());
        } else if input.event.is_hotkey(HotkeyKind::Into) {
            if let Some(path) = &path {
                if path.is_dir() {
                    self.dir_stack.push(path.clone());
                    reset_cmd = true;
                } else if path.is_file() {
                    let text = path.display().to_string();
                    let _ = self.opener.copy_text(&text);
                    out_txt = format!("Copied path to clipboard: {text}");
                }
            }
        } else if input.event.is_hotkey(HotkeyKind::OutOf) {
            if let Some(parent) = self.current_dir().and_then(|dir| dir.parent()) {
                self.dir_stack.push(parent.to_path_buf());
                reset_cmd = true;
            }
        } else if input.event.is_hotkey(HotkeyKind::Prev) {
            if self.dir_stack.len() > 1 {
                self.dir_stack.pop();
                reset_cmd = true;
            } else {
                out_txt = "No previous path history available".to_string();
            }
        }
        Some(self.render_rows(input, reset_cmd, &out_txt))
    }
}

impl SubProcessor for DirListProcessor {
    fn claims_input(&mut self, input: &ProcessorInput) -> bool {
        input.cmd.starts_with(DIRLIST_PREFIX)
    }
}

fn default_fallback_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        PathBuf::from("C:\\")
    } else {
        PathBuf::from("/")
    }
}

/// Explorer window titles may carry a git branch suffix like
/// `C:\repo [main]`; strip it so the title resolves as a directory.
fn remove_git_branch_suffix(title: &str) -> &str {
    if !title.ends_with(']') {
        return title;
    }
    match title.rfind('[') {
        Some(index) => title[..index].trim_end(),
        None => title,
    }
}
