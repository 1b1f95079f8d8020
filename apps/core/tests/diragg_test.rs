use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use quickwin_core::diragg::DirAggProcessor;
use quickwin_core::opener::{Opener, RecordingOpener};
use quickwin_core::processor::{
    Event, HotkeyKind, Processor, ProcessorInput, ProcessorOutput, RowUpdate, SubProcessor,
};

struct Fixture {
    processor: DirAggProcessor,
    opener: Rc<RecordingOpener>,
    parent: PathBuf,
}

fn fixture(dir: &tempfile::TempDir) -> Fixture {
    let parent = dir.path().join("projects");
    fs::create_dir(&parent).unwrap();
    fs::create_dir(parent.join("alpha")).unwrap();
    fs::create_dir(parent.join("beta")).unwrap();
    fs::create_dir(parent.join(".hidden")).unwrap();
    fs::create_dir(parent.join("__cache__")).unwrap();
    fs::write(parent.join("stray.txt"), "").unwrap();

    let locations = dir.path().join("locations.yaml");
    fs::write(
        &locations,
        format!("work:\n  - {}\nbroken:\n  - /definitely/not/there\n", parent.display()),
    )
    .unwrap();

    let opener = Rc::new(RecordingOpener::new());
    let processor =
        DirAggProcessor::new(locations, Rc::clone(&opener) as Rc<dyn Opener>).unwrap();
    Fixture {
        processor,
        opener,
        parent,
    }
}

fn shown(out: &ProcessorOutput) -> Vec<Vec<String>> {
    match &out.rows {
        Some(RowUpdate::Show { rows, .. }) => rows.clone(),
        other => panic!("expected shown rows, got {other:?}"),
    }
}

#[test]
fn bare_prefix_lists_categories() {
    let dir = tempfile::tempdir().unwrap();
    let mut fixture = fixture(&dir);

    let out = fixture
        .processor
        .update(&ProcessorInput::new(">", Event::CmdChange))
        .unwrap();
    let rows = shown(&out);
    assert_eq!(
        rows,
        vec![vec!["broken".to_string()], vec!["work".to_string()]]
    );
    assert!(out.out_text.unwrap().contains("Select a DirAgg category"));
}

#[test]
fn second_prefix_locks_the_first_matching_category() {
    let dir = tempfile::tempdir().unwrap();
    let mut fixture = fixture(&dir);

    let out = fixture
        .processor
        .update(&ProcessorInput::new(">w>", Event::CmdChange))
        .unwrap();
    let rows = shown(&out);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "alpha");
    assert_eq!(rows[0][1], fixture.parent.display().to_string());
    assert_eq!(rows[1][0], "beta");
    assert!(out
        .out_text
        .unwrap()
        .contains("DirAgg selected category: work"));
}

#[test]
fn into_on_a_category_row_locks_it() {
    let dir = tempfile::tempdir().unwrap();
    let mut fixture = fixture(&dir);

    let mut input = ProcessorInput::new(">", Event::Hotkey(HotkeyKind::Into));
    input.rows = vec![vec!["work".to_string()]];
    input.selected_row = Some(0);
    let out = fixture.processor.update(&input).unwrap();
    assert_eq!(out.cmd_text.as_deref(), Some(">"));

    let out = fixture
        .processor
        .update(&ProcessorInput::new(">", Event::CmdChange))
        .unwrap();
    assert_eq!(shown(&out).len(), 2);
}

#[test]
fn filter_applies_to_the_full_path() {
    let dir = tempfile::tempdir().unwrap();
    let mut fixture = fixture(&dir);

    // Literal-marker filter, so only the path containing "beta" survives.
    let out = fixture
        .processor
        .update(&ProcessorInput::new(">w>'beta", Event::CmdChange))
        .unwrap();
    let rows = shown(&out);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "beta");
}

#[test]
fn missing_parents_are_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut fixture = fixture(&dir);

    let out = fixture
        .processor
        .update(&ProcessorInput::new(">broken>", Event::CmdChange))
        .unwrap();
    assert!(shown(&out).is_empty());
    assert!(out
        .out_text
        .unwrap()
        .contains("Path not found: /definitely/not/there"));
}

#[test]
fn out_of_returns_to_the_category_list() {
    let dir = tempfile::tempdir().unwrap();
    let mut fixture = fixture(&dir);
    fixture
        .processor
        .update(&ProcessorInput::new(">w>", Event::CmdChange));

    let out = fixture
        .processor
        .update(&ProcessorInput::new(">", Event::Hotkey(HotkeyKind::OutOf)))
        .unwrap();
    assert_eq!(out.cmd_text.as_deref(), Some(">"));

    let out = fixture
        .processor
        .update(&ProcessorInput::new(">", Event::CmdChange))
        .unwrap();
    assert_eq!(shown(&out).len(), 2);
    assert!(out.out_text.unwrap().contains("Select a DirAgg category"));
}

#[test]
fn commit_opens_the_selected_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mut fixture = fixture(&dir);
    fixture
        .processor
        .update(&ProcessorInput::new(">w>", Event::CmdChange));

    let mut input = ProcessorInput::new(">", Event::CmdChange);
    input.rows = vec![vec![
        "alpha".to_string(),
        fixture.parent.display().to_string(),
    ]];
    input.selected_row = Some(0);
    input.is_complete = true;
    let out = fixture.processor.update(&input).unwrap();
    assert!(out.hide);
    assert_eq!(fixture.opener.opened(), vec![fixture.parent.join("alpha")]);
}

#[test]
fn empty_command_releases_the_claim_and_category() {
    let dir = tempfile::tempdir().unwrap();
    let mut fixture = fixture(&dir);
    fixture
        .processor
        .update(&ProcessorInput::new(">w>", Event::CmdChange));

    assert!(!fixture
        .processor
        .claims_input(&ProcessorInput::new("", Event::CmdChange)));

    // Reclaiming starts back at the category list.
    let out = fixture
        .processor
        .update(&ProcessorInput::new(">", Event::CmdChange))
        .unwrap();
    assert!(out.out_text.unwrap().contains("Select a DirAgg category"));
}
