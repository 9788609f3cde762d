use std::cell::RefCell;
use std::rc::Rc;

use insta::assert_snapshot;
use notetaker_engine::editing::{Cmd, Point};
use notetaker_engine::phrases::{ByCode, PhraseLink};
use notetaker_engine::session::{NoteSession, SessionOptions};
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}.md",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap()
}

fn open(text: &str) -> NoteSession {
    let mut session = NoteSession::new(text, SessionOptions::default());
    session.flush().unwrap();
    session
}

fn render(links: &[PhraseLink]) -> String {
    links
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn offset(session: &NoteSession, row: usize, column: usize) -> usize {
    session.document().offset_of_point(Point::new(row, column))
}

/// Every published link sits on matching text, links are ordered without
/// overlap, and the incremental result equals indexing the text from scratch.
fn assert_consistent(session: &NoteSession) {
    let document = session.document();
    for link in session.phrases() {
        let line = document.line(link.row());
        let text = &line[link.start().column..=link.end().column];
        let tight = format!("[{}][{}]", link.phrase, link.code);
        let spaced = format!("[{}] [{}]", link.phrase, link.code);
        assert!(
            text == tight || text == spaced,
            "{link} does not match {text:?}"
        );
    }
    for pair in session.phrases().windows(2) {
        assert!(pair[0].end() < pair[1].start(), "{} overlaps {}", pair[0], pair[1]);
    }

    let fresh = open(&session.text());
    assert_eq!(session.phrases(), fresh.phrases());
    assert_eq!(session.index().entries(), session.phrases());
}

#[test]
fn fixture_phrases() {
    let session = open(&fixture("weekly"));

    assert_snapshot!(render(session.phrases()), @r"
    0:9-0:18 [sync][WS]
    2:7-2:16 [Alice][A]
    2:24-2:38 [the budget][B]
    3:6-3:15 [Bob][BO]
    4:12-4:20 [line][L]
    10:6-10:28 [paragraph [1] note][P]
    ");
    assert_consistent(&session);
}

#[test]
fn edit_outside_phrase_rows_leaves_index_unchanged() {
    let mut session = open(&fixture("weekly"));
    let before = session.phrases().to_vec();

    let at = offset(&session, 9, 0);
    session.apply(Cmd::InsertText {
        at,
        text: "hello".to_string(),
    });
    assert_eq!(session.index().entries(), before.as_slice());

    session.flush().unwrap();
    assert_eq!(session.phrases(), before.as_slice());
}

#[test]
fn edit_inside_phrase_row_rebuilds_it() {
    let mut session = open(&fixture("weekly"));

    let at = offset(&session, 2, 3);
    session.apply(Cmd::InsertText {
        at,
        text: "x".to_string(),
    });
    assert!(session.index().row(2).is_empty());

    session.flush().unwrap();
    assert_snapshot!(render(session.index().row(2)), @r"
    2:8-2:17 [Alice][A]
    2:25-2:39 [the budget][B]
    ");
    assert_consistent(&session);
}

#[test]
fn breaking_a_phrase_drops_it() {
    let mut session = open(&fixture("weekly"));

    // "[Bob] [BO]" becomes "[Bob]  [BO]"
    let at = offset(&session, 3, 11);
    session.apply(Cmd::InsertText {
        at,
        text: " ".to_string(),
    });
    session.flush().unwrap();

    assert!(session.phrases().iter().all(|link| link.code != "BO"));
    assert_consistent(&session);
}

#[test]
fn deleting_rows_above_shifts_survivors() {
    let mut session = open(&fixture("weekly"));

    let end = offset(&session, 2, 0);
    session.apply(Cmd::DeleteRange { range: 0..end });
    session.flush().unwrap();

    assert_snapshot!(render(session.phrases()), @r"
    0:7-0:16 [Alice][A]
    0:24-0:38 [the budget][B]
    1:6-1:15 [Bob][BO]
    2:12-2:20 [line][L]
    8:6-8:28 [paragraph [1] note][P]
    ");
    assert_consistent(&session);
}

#[test]
fn joining_a_phrase_row_onto_the_row_above() {
    let mut session = open(&fixture("weekly"));

    // removes the terminator of row 2, pulling the `- ask` row up
    let start = offset(&session, 2, 39);
    let end = offset(&session, 3, 0);
    session.apply(Cmd::DeleteRange { range: start..end });
    session.flush().unwrap();

    assert_snapshot!(render(&session.phrases()[2..5]), @r"
    2:24-2:38 [the budget][B]
    2:45-2:54 [Bob][BO]
    3:12-3:20 [line][L]
    ");
    assert_consistent(&session);
}

#[test]
fn splitting_a_phrase_row() {
    let mut session = open(&fixture("weekly"));

    let at = offset(&session, 2, 17);
    session.apply(Cmd::InsertText {
        at,
        text: "\n".to_string(),
    });
    session.flush().unwrap();

    assert_snapshot!(render(&session.phrases()[1..4]), @r"
    2:7-2:16 [Alice][A]
    3:7-3:21 [the budget][B]
    4:6-4:15 [Bob][BO]
    ");
    assert_consistent(&session);
}

#[test]
fn opening_a_fence_suspends_phrases_below() {
    let mut session = open(&fixture("weekly"));
    let original = session.phrases().to_vec();

    session.apply(Cmd::InsertText {
        at: 0,
        text: "```\n".to_string(),
    });
    session.flush().unwrap();
    assert_snapshot!(render(session.phrases()), @"8:0-8:10 [not][CODE]");
    assert_consistent(&session);

    session.apply(Cmd::DeleteRange { range: 0..4 });
    session.flush().unwrap();
    assert_eq!(session.phrases(), original.as_slice());
}

#[test]
fn scripted_edits_stay_consistent() {
    let mut session = open(&fixture("weekly"));

    let steps: Vec<Box<dyn Fn(&NoteSession) -> Cmd>> = vec![
        Box::new(|s| Cmd::InsertText {
            at: offset(s, 9, 0),
            text: "new [entry][N]".to_string(),
        }),
        Box::new(|s| Cmd::ReplaceRange {
            range: offset(s, 2, 8)..offset(s, 2, 13),
            text: "Al".to_string(),
        }),
        Box::new(|s| Cmd::DeleteRange {
            range: offset(s, 0, 0)..offset(s, 1, 0),
        }),
        Box::new(|s| Cmd::InsertText {
            at: offset(s, 3, 2),
            text: "[x][X] ".to_string(),
        }),
        Box::new(|s| Cmd::ReplaceRange {
            range: offset(s, 1, 0)..offset(s, 4, 0),
            text: "- merged [rows][R]\n".to_string(),
        }),
        Box::new(|s| Cmd::InsertText {
            at: s.document().len(),
            text: "\ntail [end][E]\n\n".to_string(),
        }),
    ];

    for step in steps {
        let cmd = step(&session);
        session.apply(cmd);
        session.flush().unwrap();
        assert_consistent(&session);
    }

    assert_snapshot!(render(session.phrases()), @r"
    1:9-1:17 [rows][R]
    6:4-6:13 [entry][N]
    7:6-7:28 [paragraph [1] note][P]
    9:5-9:12 [end][E]
    ");
}

#[test]
fn listeners_receive_one_snapshot_per_flush() {
    let mut session = open("[a][A]\n[b][B]\n");
    let all: Rc<RefCell<Vec<usize>>> = Rc::default();
    let only_b: Rc<RefCell<Vec<String>>> = Rc::default();

    let sink = Rc::clone(&all);
    let id = session.subscribe(move |links: &[PhraseLink]| sink.borrow_mut().push(links.len()));
    let sink = Rc::clone(&only_b);
    session.subscribe(ByCode::new("B", move |links: &[PhraseLink]| {
        sink.borrow_mut()
            .extend(links.iter().map(|l| l.phrase.clone()));
    }));

    session.select(0..0);
    session.type_text("x");
    session.type_text("y");
    session.flush().unwrap();
    assert_eq!(*all.borrow(), vec![2]);
    assert_eq!(*only_b.borrow(), vec!["b"]);

    // nothing pending, nothing published
    session.flush().unwrap();
    assert_eq!(all.borrow().len(), 1);

    assert!(session.unsubscribe(id));
    session.type_text("z");
    session.flush().unwrap();
    assert_eq!(all.borrow().len(), 1);
    assert_eq!(only_b.borrow().len(), 2);
}
