//! Integration tests for the isolated-format scanner.

mod common;

use common::{build_docx, paragraph, run};
use docnorm::normalize::{context_window, scan_document};
use docnorm::{
    find_anomalies, open_bytes, AnomalyAction, Document, Paragraph, Run, ScanOptions,
    ScriptedDecisions, Trait,
};

fn hello_world() -> Document {
    let mut doc = Document::new();
    let mut p = Paragraph::new();
    p.add_text("Hello ");
    p.add_run(Run::bold("W"));
    p.add_text("orld");
    doc.add_paragraph(p);
    doc
}

#[test]
fn test_window_bounds() {
    let window = context_window(5, 100, 30);
    assert_eq!(window.start, 0);

    let window = context_window(50, 100, 30);
    assert_eq!((window.start, window.end), (20, 81));
}

#[test]
fn test_hello_world_candidate() {
    let doc = hello_world();
    let anomalies = find_anomalies(&doc, &ScanOptions::default());

    assert_eq!(anomalies.len(), 1);
    let record = &anomalies[0];
    assert_eq!(record.context, "Hello [[W]]orld");
    assert_eq!(record.labels(), vec!["Bold"]);
    assert_eq!(record.offset, 6);
    assert_eq!(record.paragraph_index, 0);
}

#[test]
fn test_hello_world_revert() {
    let mut doc = hello_world();
    let mut decisions = ScriptedDecisions::new().with_review([AnomalyAction::Revert]);
    let report = scan_document(&mut doc, &mut decisions, &ScanOptions::default());

    assert_eq!(report.reverted, 1);
    let run = doc.paragraphs().next().unwrap().runs().nth(1).unwrap();
    assert_eq!(run.text(), "W");
    assert!(!run.traits().bold);
}

#[test]
fn test_offsets_sum_to_paragraph_length() {
    let body = paragraph(
        None,
        "",
        &[
            run("", "  lead "),
            run("<w:i/>", " a "),
            run("", "中文 text "),
            run("<w:strike/>", "é"),
            run("", " tail"),
        ],
    );
    let doc = open_bytes(&build_docx(&body)).unwrap();
    let paragraph = doc.paragraphs().next().unwrap();

    let total: usize = paragraph.runs().map(|r| r.char_len()).sum();
    assert_eq!(total, paragraph.text().chars().count());

    let anomalies = find_anomalies(&doc, &ScanOptions::default());
    let offsets: Vec<usize> = anomalies.iter().map(|a| a.offset).collect();
    assert_eq!(offsets, vec![7, 18]);
    assert_eq!(anomalies[0].character, 'a');
    assert_eq!(anomalies[1].character, 'é');
    assert_eq!(anomalies[1].traits, vec![Trait::Strikethrough]);
    assert_eq!(anomalies[1].context, "  lead  a 中文 text [[é]] tail");
}

#[test]
fn test_paragraph_index_counts_body_paragraphs_only() {
    let body = [
        paragraph(None, "", &[run("", "first")]),
        r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:rPr><w:b/></w:rPr><w:t>x</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#
            .to_string(),
        paragraph(None, "", &[run("", "see "), run("<w:u w:val=\"single\"/>", "y")]),
    ]
    .concat();
    let doc = open_bytes(&build_docx(&body)).unwrap();

    let anomalies = find_anomalies(&doc, &ScanOptions::default());
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].paragraph_index, 1);
    assert_eq!(anomalies[0].context, "see [[y]]");
}

#[test]
fn test_no_candidates_no_questions() {
    let mut doc = Document::new();
    doc.add_paragraph(Paragraph::with_text("nothing to see"));
    let mut decisions = ScriptedDecisions::new().with_review([AnomalyAction::Revert]);

    let report = scan_document(&mut doc, &mut decisions, &ScanOptions::default());
    assert_eq!(report.candidates(), 0);
    assert!(decisions.seen_anomalies().is_empty());
}

#[test]
fn test_custom_radius() {
    let mut doc = Document::new();
    let mut p = Paragraph::new();
    p.add_text("abcdefghij");
    p.add_run(Run::italic("X"));
    p.add_text("klmnopqrst");
    doc.add_paragraph(p);

    let options = ScanOptions::default().with_context_radius(3);
    let anomalies = find_anomalies(&doc, &options);
    assert_eq!(anomalies[0].context, "hij[[X]]klm");
}

#[test]
fn test_language_reads_back_in_all_slots() {
    let mut doc = hello_world();
    let code = docnorm::LanguageCode::parse("en-US").unwrap().unwrap();
    docnorm::normalize::tag_document(&mut doc, &code);

    for run in doc.paragraphs().flat_map(|p| p.runs()) {
        for slot in docnorm::LanguageSlot::ALL {
            assert_eq!(run.language(slot), Some("en-US"));
        }
    }
}
