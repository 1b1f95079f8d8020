//! The root processor: lists OS windows and switches to the selected one,
//! with filter, alias, and ordering commands typed into the command line.

use std::path::PathBuf;

use crate::command::{parse_cmds, Command, CommandKind};
use crate::dispatcher::HistoryHolder;
use crate::history::HistManager;
use crate::processor::{
    format_num, Column, Event, Processor, ProcessorInput, ProcessorOutput,
};
use crate::window::{FilterField, WinManager, WindowProvider};

pub struct QuickWinProcessor {
    winmgr: WinManager,
    histmgr: HistManager,
    out_lines: Vec<String>,
}

impl QuickWinProcessor {
    pub fn new(
        alias_path: PathBuf,
        exclude_path: Option<PathBuf>,
        histmgr: HistManager,
        provider: Box<dyn WindowProvider>,
    ) -> Self {
        Self {
            winmgr: WinManager::new(alias_path, exclude_path, provider),
            histmgr,
            out_lines: Vec::new(),
        }
    }

    pub fn reload_exclusions(&mut self) {
        self.winmgr.reload_exclusions();
    }

    pub fn winmgr(&self) -> &WinManager {
        &self.winmgr
    }

    /// Applies filter commands immediately; commands that only make sense on
    /// commit (set, delete, unknown) are deferred, last one winning.
    fn handle_incomplete(&mut self, cmds: &[Command]) -> Option<Command> {
        let mut cmd_on_complete = None;
        for cmd in cmds {
            match cmd.kind {
                CommandKind::Title => {
                    self.winmgr.filter(&cmd.text, FilterField::Title, false);
                }
                CommandKind::Exe => {
                    self.winmgr.filter(&cmd.text, FilterField::Exe, false);
                }
                CommandKind::Get => {
                    self.winmgr.filter(&cmd.text, FilterField::Alias, false);
                }
                CommandKind::Limit => {
                    let exe = self
                        .winmgr
                        .selected_win()
                        .map(|win| win.info.exe.clone());
                    if let Some(exe) = exe {
                        self.winmgr.filter(&exe, FilterField::Exe, true);
                    }
                }
                CommandKind::Order => {
                    self.winmgr.set_orderby(&cmd.text);
                }
                CommandKind::Set | CommandKind::Delete | CommandKind::Unknown => {
                    cmd_on_complete = Some(cmd.clone());
                }
            }
        }
        cmd_on_complete
    }

    fn handle_complete(&mut self, cmd: Option<&Command>) -> Option<ProcessorOutput> {
        let Some(cmd) = cmd else {
            if self.winmgr.selected_win().is_some() {
                self.winmgr.focus_selected();
                return Some(ProcessorOutput::hidden());
            }
            return None;
        };
        match cmd.kind {
            CommandKind::Set => {
                let selected = self.winmgr.selected_win().map(|win| win.info.clone());
                if let Some(info) = selected {
                    self.winmgr.set_alias(&info, &cmd.text);
                }
                if cmd.text.is_empty() {
                    self.out_lines.push("Cleared alias".to_string());
                } else {
                    self.out_lines.push(format!("Set alias: {}", cmd.text));
                }
            }
            CommandKind::Delete => {
                self.winmgr.delete_all_aliases();
                self.out_lines.push("All aliases deleted".to_string());
            }
            _ => {
                self.out_lines.push("Unknown command".to_string());
            }
        }
        let mut out = ProcessorOutput::default();
        out.set_cmd("");
        Some(out)
    }

    fn render_rows(&mut self) -> ProcessorOutput {
        let displayed = self.winmgr.displayed_wins();
        let len_allwins = self.winmgr.len_allwins();
        self.out_lines
            .push(format!("Windows found: {}", displayed.len()));
        let rows: Vec<Vec<String>> = displayed
            .iter()
            .map(|win| {
                vec![
                    format_num(win.num, len_allwins),
                    win.info.title.clone(),
                    win.info.exe.clone(),
                    self.winmgr.get_alias(&win.info),
                ]
            })
            .collect();
        let mut out = ProcessorOutput::default();
        if let Some(text) = self.render_outtext() {
            out.set_txt(text);
        }
        out.show_rows(
            vec![
                Column::new("Number", 6),
                Column::new("Title", 74),
                Column::new("Executable", 10),
                Column::new("Alias", 10),
            ],
            rows,
            Some(self.winmgr.selected_index()),
        );
        out
    }

    fn render_outtext(&mut self) -> Option<String> {
        if self.out_lines.is_empty() {
            return None;
        }
        let mut text = String::new();
        for line in self.out_lines.drain(..) {
            text.push_str(&line);
            text.push('\n');
        }
        Some(text)
    }

    /// Column header clicks switch the sort order by appending the matching
    /// order command to the current input.
    fn handle_colclick(&self, input: &ProcessorInput, out: &mut ProcessorOutput) {
        if let Event::ColClick { col } = input.event {
            let order = match col {
                0 => Some("default"),
                1 => Some("title"),
                2 => Some("exe"),
                3 => Some("alias"),
                _ => None,
            };
            if let Some(order) = order {
                out.set_cmd(format!("{};o {order}", input.cmd));
            }
        }
    }

    /// Right-clicking the executable column filters by that executable;
    /// right-clicking the alias column starts an alias lookup.
    fn handle_rowclick(&self, input: &ProcessorInput, out: &mut ProcessorOutput) {
        if let Event::RowClick { col, row } = input.event {
            if col == 2 {
                if let Some(exe) = input.rows.get(row).and_then(|cells| cells.get(2)) {
                    out.set_cmd(format!("{};e {exe}", input.cmd));
                }
            } else if col == 3 {
                out.set_cmd(format!("{};g", input.cmd));
            }
        }
    }
}

impl Processor for QuickWinProcessor {
    fn help_text(&self) -> String {
        [
            "QuickWin commands:",
            "    Filters: t <TITLE> | e <EXECUTABLE> | l (current exe)",
            "    Aliases: s <SET> | g <GET> | d (delete all)",
            "    Col Order: o [alias|exe|title]",
        ]
        .join("\n")
            + "\n"
    }

    fn update(&mut self, input: &ProcessorInput) -> Option<ProcessorOutput> {
        self.winmgr.update(input, true);
        let cmds = parse_cmds(&input.cmd);
        let cmd_on_complete = self.handle_incomplete(&cmds);
        if input.is_complete {
            return self.handle_complete(cmd_on_complete.as_ref());
        }
        let mut out = self.render_rows();
        self.handle_colclick(input, &mut out);
        self.handle_rowclick(input, &mut out);
        Some(out)
    }
}

impl HistoryHolder for QuickWinProcessor {
    fn history(&self) -> &HistManager {
        &self.histmgr
    }

    fn history_mut(&mut self) -> &mut HistManager {
        &mut self.histmgr
    }
}
