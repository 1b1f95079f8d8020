use quickwin_core::command::{parse_cmds, CommandKind};

#[test]
fn bare_text_is_an_implicit_title_filter() {
    let cmds = parse_cmds("notepad");
    assert_eq!(cmds.len(), 1);
    assert_eq!(cmds[0].kind, CommandKind::Title);
    assert_eq!(cmds[0].text, "notepad");
}

#[test]
fn blank_input_yields_no_commands() {
    assert!(parse_cmds("").is_empty());
    assert!(parse_cmds("   ").is_empty());
}

#[test]
fn classifies_each_command_letter() {
    for (input, kind, text) in [
        (";t report", CommandKind::Title, "report"),
        (";e explorer", CommandKind::Exe, "explorer"),
        (";g work", CommandKind::Get, "work"),
        (";s work", CommandKind::Set, "work"),
        (";o exe", CommandKind::Order, "exe"),
    ] {
        let cmds = parse_cmds(input);
        assert_eq!(cmds.len(), 1, "{input}");
        assert_eq!(cmds[0].kind, kind, "{input}");
        assert_eq!(cmds[0].text, text, "{input}");
    }
}

#[test]
fn letter_alone_yields_empty_text() {
    let cmds = parse_cmds(";s");
    assert_eq!(cmds[0].kind, CommandKind::Set);
    assert_eq!(cmds[0].text, "");
}

#[test]
fn limit_and_delete_take_no_argument() {
    assert_eq!(parse_cmds(";l")[0].kind, CommandKind::Limit);
    assert_eq!(parse_cmds(";d")[0].kind, CommandKind::Delete);
    assert_eq!(parse_cmds(";l something")[0].kind, CommandKind::Unknown);
    assert_eq!(parse_cmds(";d something")[0].kind, CommandKind::Unknown);
}

#[test]
fn longer_words_are_not_commands() {
    assert_eq!(parse_cmds(";ge")[0].kind, CommandKind::Unknown);
    assert_eq!(parse_cmds(";get")[0].kind, CommandKind::Unknown);
    assert_eq!(parse_cmds(";set x")[0].kind, CommandKind::Unknown);
    assert_eq!(parse_cmds(";title x")[0].kind, CommandKind::Unknown);
}

#[test]
fn spaces_after_separator_are_allowed() {
    let cmds = parse_cmds("; g alias");
    assert_eq!(cmds.len(), 1);
    assert_eq!(cmds[0].kind, CommandKind::Get);
    assert_eq!(cmds[0].text, "alias");
}

#[test]
fn multiple_commands_keep_their_order() {
    let cmds = parse_cmds("report ;e explorer ;o title");
    assert_eq!(cmds.len(), 3);
    assert_eq!(cmds[0].kind, CommandKind::Title);
    assert_eq!(cmds[0].text, "report");
    assert_eq!(cmds[1].kind, CommandKind::Exe);
    assert_eq!(cmds[1].text, "explorer");
    assert_eq!(cmds[2].kind, CommandKind::Order);
    assert_eq!(cmds[2].text, "title");
}

#[test]
fn padding_around_separators_does_not_change_the_parse() {
    let plain = parse_cmds("hello world;e notepad.exe;s alias");
    let padded = parse_cmds("hello world  ;  e notepad.exe  ;  s alias");
    assert_eq!(plain, padded);
    assert_eq!(plain.len(), 3);
    assert_eq!(plain[0].kind, CommandKind::Title);
    assert_eq!(plain[0].text, "hello world");
    assert_eq!(plain[1].kind, CommandKind::Exe);
    assert_eq!(plain[1].text, "notepad.exe");
    assert_eq!(plain[2].kind, CommandKind::Set);
    assert_eq!(plain[2].text, "alias");
}

#[test]
fn argument_text_keeps_inner_spaces() {
    let cmds = parse_cmds(";t quarterly   report");
    assert_eq!(cmds[0].kind, CommandKind::Title);
    assert_eq!(cmds[0].text, "quarterly   report");
}
