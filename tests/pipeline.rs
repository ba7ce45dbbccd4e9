use std::fs;
use std::io::Read;
use std::path::Path;

use bingo_cards::call_record::CallRecord;
use bingo_cards::extract::parse_cards;
use bingo_cards::pipeline::{self, Job, Task};
use bingo_cards::render::StyleOptions;
use bingo_cards::workbook::build_workbook;
use bingo_cards::{BingoError, CardGenerator, DauberShape, colour};
use pretty_assertions::assert_eq;

fn style() -> StyleOptions {
    StyleOptions {
        card_colour: colour::blue(),
        dauber_colour: colour::red(),
        dauber_shape: DauberShape::default(),
        title: None,
        allow_select: false,
        easy: false,
        logo_uri: pipeline::resolve_logo(None).unwrap(),
    }
}

fn job(dir: &Path, count: usize, task: Task) -> Job {
    Job { count, output_dir: dir.to_path_buf(), pdf: false, task, style: style() }
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn one_sheet_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let job = job(dir.path(), 1, Task::Generate);
    let summary = pipeline::run(&job, &mut CardGenerator::seeded(9), None).unwrap();
    assert_eq!(pipeline::written_message(summary.written), "1 card written");
    assert_eq!(file_names(dir.path()), vec!["1-BLUE.html"]);

    let html = fs::read_to_string(dir.path().join("1-BLUE.html")).unwrap();
    assert_eq!(html.lines().filter(|l| l.starts_with("$card")).count(), 6);
    assert!(parse_cards(&html).iter().all(Option::is_some));
}

#[test]
fn zero_sheets_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("cards");
    let job = job(&out, 0, Task::Generate);
    let summary = pipeline::run(&job, &mut CardGenerator::seeded(9), None).unwrap();
    assert_eq!(pipeline::written_message(summary.written), "0 cards written");
    assert!(!out.exists());
}

#[test]
fn extracting_more_sheets_than_exist_fails() {
    let dir = tempfile::tempdir().unwrap();
    let generate = job(dir.path(), 2, Task::Generate);
    pipeline::run(&generate, &mut CardGenerator::seeded(1), None).unwrap();

    let task = Task::from_flags(Some("calls.xlsx".into()), Some("blue"), false).unwrap();
    let extract = job(dir.path(), 3, task);
    let err = pipeline::run(&extract, &mut CardGenerator::seeded(1), None).unwrap_err();
    assert!(matches!(err, BingoError::MissingSheet { ref path } if path.ends_with("3-BLUE.html")));
    // the failed run leaves only the sheets it was given
    assert_eq!(file_names(dir.path()), vec!["1-BLUE.html", "2-BLUE.html"]);
}

#[test]
fn extracted_workbook_matches_in_process_records() {
    let extracted = tempfile::tempdir().unwrap();
    let generate = job(extracted.path(), 2, Task::Generate);
    pipeline::run(&generate, &mut CardGenerator::seeded(4), None).unwrap();
    let task = Task::from_flags(Some("calls.xlsx".into()), Some("BLUE"), false).unwrap();
    let extract = job(extracted.path(), 2, task);
    pipeline::run(&extract, &mut CardGenerator::seeded(0), None).unwrap();

    // same seed, same sheets, handed over without going through the documents
    let direct = tempfile::tempdir().unwrap();
    let mut generator = CardGenerator::seeded(4);
    let records: Vec<CallRecord> =
        (1..=2).map(|i| CallRecord::from_sheet(i, &generator.generate_sheet())).collect();
    build_workbook(&records, &direct.path().join("calls.xlsx")).unwrap();

    for sheet in ["xl/worksheets/sheet2.xml", "xl/worksheets/sheet3.xml"] {
        assert_eq!(
            read_part(&extracted.path().join("calls.xlsx"), sheet),
            read_part(&direct.path().join("calls.xlsx"), sheet)
        );
    }
}

fn read_part(path: &Path, name: &str) -> String {
    let mut archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    let mut xml = String::new();
    archive.by_name(name).unwrap().read_to_string(&mut xml).unwrap();
    xml
}

#[cfg(unix)]
#[test]
fn everything_writes_sheets_pdfs_and_workbook() {
    use bingo_cards::pdf::Rasterizer;
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let stub = dir.path().join("fake-wkhtmltopdf");
    fs::write(&stub, "#!/bin/sh\nwhile [ $# -gt 1 ]; do shift; done\necho pdf > \"$1\"\n").unwrap();
    fs::set_permissions(&stub, fs::Permissions::from_mode(0o755)).unwrap();
    let rasterizer = Rasterizer::with_program(&stub);

    let out = dir.path().join("cards");
    let job = job(&out, 2, Task::from_flags(None, None, true).unwrap());
    assert!(job.needs_rasterizer());
    let summary = pipeline::run(&job, &mut CardGenerator::seeded(5), Some(&rasterizer)).unwrap();

    assert_eq!(summary.written, 2);
    assert_eq!(summary.workbook, Some(out.join("BLUE-cards.xlsx")));
    assert_eq!(
        file_names(&out),
        vec!["1-BLUE.html", "1-BLUE.pdf", "2-BLUE.html", "2-BLUE.pdf", "BLUE-cards.xlsx"]
    );

    let workbook = read_part(&out.join("BLUE-cards.xlsx"), "xl/workbook.xml");
    assert!(workbook.contains("name=\"CALL\""));
    assert!(workbook.contains("name=\"2\""));
}
