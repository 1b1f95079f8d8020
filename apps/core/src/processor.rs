//! Processor capability and the input/output records exchanged with the
//! presentation shell.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyKind {
    Next,
    Prev,
    Into,
    OutOf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    CmdChange,
    MoveUp,
    MoveDown,
    Hotkey(HotkeyKind),
    ColClick { col: usize },
    RowClick { col: usize, row: usize },
}

impl Event {
    pub fn is_hotkey(&self, kind: HotkeyKind) -> bool {
        matches!(self, Self::Hotkey(k) if *k == kind)
    }
}

/// Snapshot of the shell state handed to a processor for one event.
///
/// `was_activated` is set by the dispatcher for exactly the one update call
/// following an inactive-to-active transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorInput {
    pub cmd: String,
    pub rows: Vec<Vec<String>>,
    pub selected_row: Option<usize>,
    pub event: Event,
    pub is_complete: bool,
    pub was_hidden: bool,
    pub was_activated: bool,
}

impl ProcessorInput {
    pub fn new(cmd: impl Into<String>, event: Event) -> Self {
        Self {
            cmd: cmd.into(),
            rows: Vec::new(),
            selected_row: None,
            event,
            is_complete: false,
            was_hidden: false,
            was_activated: false,
        }
    }

    pub fn selrow(&self) -> Option<&Vec<String>> {
        self.rows.get(self.selected_row?)
    }

    /// Text of the given column in the selected row, empty when there is no
    /// selection or the column is out of range.
    pub fn selrow_text(&self, col: usize) -> String {
        self.selrow()
            .and_then(|row| row.get(col))
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub weight: u32,
}

impl Column {
    pub fn new(name: &str, weight: u32) -> Self {
        Self {
            name: name.to_string(),
            weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowUpdate {
    Hide,
    Show {
        columns: Vec<Column>,
        rows: Vec<Vec<String>>,
        selected: Option<usize>,
    },
}

/// Render instructions returned by a processor. `None` fields mean "leave
/// that part of the shell untouched".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessorOutput {
    pub cmd_text: Option<String>,
    pub rows: Option<RowUpdate>,
    pub out_text: Option<String>,
    pub hide: bool,
}

impl ProcessorOutput {
    pub fn hidden() -> Self {
        Self {
            hide: true,
            ..Self::default()
        }
    }

    pub fn set_cmd(&mut self, text: impl Into<String>) {
        self.cmd_text = Some(text.into());
    }

    pub fn set_txt(&mut self, text: impl Into<String>) {
        self.out_text = Some(text.into());
    }

    pub fn hide_rows(&mut self) {
        self.rows = Some(RowUpdate::Hide);
    }

    pub fn show_rows(
        &mut self,
        columns: Vec<Column>,
        rows: Vec<Vec<String>>,
        selected: Option<usize>,
    ) {
        self.rows = Some(RowUpdate::Show {
            columns,
            rows,
            selected,
        });
    }
}

/// A unit that interprets the current input and produces render
/// instructions. Returning `None` from `update` means "no visible change".
pub trait Processor {
    fn help_text(&self) -> String;

    /// Called once by the dispatcher on the inactive-to-active transition,
    /// before the corresponding `update`.
    fn on_activate(&mut self, _input: &ProcessorInput) {}

    fn update(&mut self, input: &ProcessorInput) -> Option<ProcessorOutput>;
}

/// A processor that only handles input it explicitly claims, typically by
/// matching a trigger prefix on the command text.
pub trait SubProcessor: Processor {
    fn claims_input(&mut self, input: &ProcessorInput) -> bool;
}

/// Text after the first occurrence of `prefix`, or the whole text when the
/// prefix is absent.
pub fn remove_prefix(prefix: char, text: &str) -> &str {
    match text.split_once(prefix) {
        Some((_, rest)) => rest,
        None => text,
    }
}

/// Zero-pads `num` to the width of `padref`.
pub fn format_num(num: usize, padref: usize) -> String {
    let width = padref.to_string().len();
    format!("{num:0width$}")
}

#[cfg(test)]
mod tests {
    use super::{format_num, remove_prefix};

    #[test]
    fn remove_prefix_splits_on_first_occurrence() {
        assert_eq!(remove_prefix('`', "`abc"), "abc");
        assert_eq!(remove_prefix('`', "a`b`c"), "b`c");
        assert_eq!(remove_prefix('`', "abc"), "abc");
    }

    #[test]
    fn format_num_pads_to_reference_width() {
        assert_eq!(format_num(3, 120), "003");
        assert_eq!(format_num(42, 9), "42");
    }
}
