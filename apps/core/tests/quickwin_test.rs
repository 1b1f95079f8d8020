use std::path::PathBuf;
use std::rc::Rc;

use quickwin_core::history::HistManager;
use quickwin_core::processor::{
    Event, Processor, ProcessorInput, ProcessorOutput, RowUpdate,
};
use quickwin_core::quickwin::QuickWinProcessor;
use quickwin_core::window::{FixtureWindowProvider, WinInfo, WindowProvider};

struct SharedProvider(Rc<FixtureWindowProvider>);

impl WindowProvider for SharedProvider {
    fn list_windows(&self) -> Vec<WinInfo> {
        self.0.list_windows()
    }

    fn focus(&self, win: &WinInfo) -> Result<(), String> {
        self.0.focus(win)
    }
}

fn processor(dir: &tempfile::TempDir) -> (QuickWinProcessor, Rc<FixtureWindowProvider>) {
    let provider = Rc::new(FixtureWindowProvider::deterministic_fixture());
    let histmgr = HistManager::open(&dir.path().join("hist.json"), None).unwrap();
    let processor = QuickWinProcessor::new(
        dir.path().join("alias.json"),
        None::<PathBuf>,
        histmgr,
        Box::new(SharedProvider(Rc::clone(&provider))),
    );
    (processor, provider)
}

fn shown_rows(out: &ProcessorOutput) -> Vec<Vec<String>> {
    match &out.rows {
        Some(RowUpdate::Show { rows, .. }) => rows.clone(),
        other => panic!("expected shown rows, got {other:?}"),
    }
}

#[test]
fn empty_command_lists_every_window() {
    let dir = tempfile::tempdir().unwrap();
    let (mut processor, _provider) = processor(&dir);

    let out = processor
        .update(&ProcessorInput::new("", Event::CmdChange))
        .unwrap();
    let rows = shown_rows(&out);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0][0], "1");
    assert_eq!(rows[0][1], "Quarterly Report - Editor");
    assert!(out.out_text.unwrap().contains("Windows found: 3"));
}

#[test]
fn title_and_exe_filters_narrow_the_list() {
    let dir = tempfile::tempdir().unwrap();
    let (mut processor, _provider) = processor(&dir);
    processor.update(&ProcessorInput::new("", Event::CmdChange));

    let out = processor
        .update(&ProcessorInput::new("report", Event::CmdChange))
        .unwrap();
    assert_eq!(shown_rows(&out).len(), 1);

    let out = processor
        .update(&ProcessorInput::new(";e term", Event::CmdChange))
        .unwrap();
    let rows = shown_rows(&out);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][2], "term.exe");
}

#[test]
fn order_command_sorts_by_the_named_field() {
    let dir = tempfile::tempdir().unwrap();
    let (mut processor, _provider) = processor(&dir);
    processor.update(&ProcessorInput::new("", Event::CmdChange));

    let out = processor
        .update(&ProcessorInput::new(";o exe", Event::CmdChange))
        .unwrap();
    let exes: Vec<String> = shown_rows(&out).iter().map(|row| row[2].clone()).collect();
    assert_eq!(exes, vec!["editor.exe", "explorer.exe", "term.exe"]);
}

#[test]
fn limit_keeps_only_the_selected_executable() {
    let dir = tempfile::tempdir().unwrap();
    let (mut processor, _provider) = processor(&dir);
    processor.update(&ProcessorInput::new("", Event::CmdChange));

    // The first window (editor.exe) is selected by default.
    let out = processor
        .update(&ProcessorInput::new(";l", Event::CmdChange))
        .unwrap();
    let rows = shown_rows(&out);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][2], "editor.exe");
}

#[test]
fn commit_with_a_selection_focuses_and_hides() {
    let dir = tempfile::tempdir().unwrap();
    let (mut processor, provider) = processor(&dir);
    processor.update(&ProcessorInput::new("", Event::CmdChange));

    let mut input = ProcessorInput::new("", Event::CmdChange);
    input.is_complete = true;
    let out = processor.update(&input).unwrap();
    assert!(out.hide);

    let focused = provider.focused();
    assert_eq!(focused.len(), 1);
    assert_eq!(focused[0].exe, "editor.exe");
}

#[test]
fn alias_set_then_get_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let (mut processor, _provider) = processor(&dir);
    processor.update(&ProcessorInput::new("", Event::CmdChange));

    let mut set = ProcessorInput::new(";s work", Event::CmdChange);
    set.is_complete = true;
    let out = processor.update(&set).unwrap();
    assert_eq!(out.cmd_text.as_deref(), Some(""));
    assert!(!out.hide);

    let out = processor
        .update(&ProcessorInput::new(";g work", Event::CmdChange))
        .unwrap();
    let rows = shown_rows(&out);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][3], "work");
    assert!(out.out_text.unwrap().contains("Set alias: work"));
}

#[test]
fn delete_command_clears_all_aliases() {
    let dir = tempfile::tempdir().unwrap();
    let (mut processor, _provider) = processor(&dir);
    processor.update(&ProcessorInput::new("", Event::CmdChange));

    let mut set = ProcessorInput::new(";s work", Event::CmdChange);
    set.is_complete = true;
    processor.update(&set);

    let mut delete = ProcessorInput::new(";d", Event::CmdChange);
    delete.is_complete = true;
    let out = processor.update(&delete).unwrap();
    assert_eq!(out.cmd_text.as_deref(), Some(""));

    let out = processor
        .update(&ProcessorInput::new(";g work", Event::CmdChange))
        .unwrap();
    assert!(shown_rows(&out).is_empty());
}

#[test]
fn unknown_command_reports_on_commit() {
    let dir = tempfile::tempdir().unwrap();
    let (mut processor, _provider) = processor(&dir);
    processor.update(&ProcessorInput::new("", Event::CmdChange));

    let mut input = ProcessorInput::new(";zzz", Event::CmdChange);
    input.is_complete = true;
    let out = processor.update(&input).unwrap();
    assert_eq!(out.cmd_text.as_deref(), Some(""));

    let out = processor
        .update(&ProcessorInput::new("", Event::CmdChange))
        .unwrap();
    assert!(out.out_text.unwrap().contains("Unknown command"));
}

#[test]
fn column_click_switches_the_order() {
    let dir = tempfile::tempdir().unwrap();
    let (mut processor, _provider) = processor(&dir);
    processor.update(&ProcessorInput::new("", Event::CmdChange));

    let input = ProcessorInput::new("", Event::ColClick { col: 1 });
    let out = processor.update(&input).unwrap();
    assert_eq!(out.cmd_text.as_deref(), Some(";o title"));
}

#[test]
fn row_click_on_the_exe_column_filters_by_it() {
    let dir = tempfile::tempdir().unwrap();
    let (mut processor, _provider) = processor(&dir);
    let first = processor
        .update(&ProcessorInput::new("", Event::CmdChange))
        .unwrap();

    let mut input = ProcessorInput::new("", Event::RowClick { col: 2, row: 2 });
    input.rows = shown_rows(&first);
    let out = processor.update(&input).unwrap();
    assert_eq!(out.cmd_text.as_deref(), Some(";e term.exe"));
}
