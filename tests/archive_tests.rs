//! Archive layout tests: build an archive, read it back with the zip crate

use std::io::{Cursor, Read};

use pdfseal::InputDocument;
use pdfseal::archive::{ArchiveLayout, ArchiveOptions, assemble};
use pdfseal::pipeline::{BatchResult, Outcome, OutcomeKind};
use tempfile::TempDir;

fn outcome(position: usize, document: InputDocument, kind: OutcomeKind) -> Outcome {
    Outcome {
        position,
        document,
        kind,
    }
}

/// report.pdf encrypted, draft.pdf skipped, broken.pdf failed; completion order shuffled
fn sample_result() -> BatchResult {
    BatchResult {
        total: 3,
        ok: 1,
        skipped: 1,
        failed: 1,
        outcomes: vec![
            outcome(
                2,
                InputDocument::from_bytes("broken.pdf", b"%PDF broken".to_vec()),
                OutcomeKind::Failed {
                    detail: "damaged\txref".into(),
                },
            ),
            outcome(
                0,
                InputDocument::from_bytes("report.pdf", b"%PDF report".to_vec()),
                OutcomeKind::Encrypted {
                    produced: b"%PDF encrypted report".to_vec(),
                },
            ),
            outcome(
                1,
                InputDocument::from_bytes("draft.pdf", b"%PDF draft".to_vec()),
                OutcomeKind::Skipped,
            ),
        ],
        cancelled: false,
    }
}

fn read_entry(archive: &mut zip::ZipArchive<Cursor<Vec<u8>>>, name: &str) -> Vec<u8> {
    let mut file = archive.by_name(name).unwrap();
    assert_eq!(file.compression(), zip::CompressionMethod::Deflated);
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).unwrap();
    bytes
}

fn open(bytes: Vec<u8>) -> zip::ZipArchive<Cursor<Vec<u8>>> {
    zip::ZipArchive::new(Cursor::new(bytes)).unwrap()
}

#[test]
fn test_flat_layout_contains_only_encrypted() {
    let options = ArchiveOptions {
        layout: ArchiveLayout::Flat,
        ..Default::default()
    };
    let mut archive = open(assemble(&sample_result(), &options).unwrap());

    let names: Vec<&str> = archive.file_names().collect();
    assert_eq!(names, vec!["report.pdf"]);

    let bytes = read_entry(&mut archive, "report.pdf");
    assert_eq!(bytes, b"%PDF encrypted report");
    assert_ne!(bytes, b"%PDF report");
}

#[test]
fn test_dual_layout() {
    let mut archive = open(assemble(&sample_result(), &ArchiveOptions::default()).unwrap());

    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "encrypted/report.pdf",
            "not-encrypted/broken.pdf",
            "not-encrypted/draft.pdf",
            "summary.txt",
        ]
    );

    assert_eq!(read_entry(&mut archive, "encrypted/report.pdf"), b"%PDF encrypted report");
    assert_eq!(read_entry(&mut archive, "not-encrypted/draft.pdf"), b"%PDF draft");
    assert_eq!(read_entry(&mut archive, "not-encrypted/broken.pdf"), b"%PDF broken");

    let report = String::from_utf8(read_entry(&mut archive, "summary.txt")).unwrap();
    assert_eq!(
        report,
        "OK\treport.pdf\t\n\
         SKIP\tdraft.pdf\tno credential\n\
         ERR\tbroken.pdf\tdamaged xref\n\
         \n\
         total=3 ok=1 skipped=1 failed=1\n"
    );
}

#[test]
fn test_report_independent_of_completion_order() {
    let forward = sample_result();
    let mut reversed = sample_result();
    reversed.outcomes.reverse();

    let mut a = open(assemble(&forward, &ArchiveOptions::default()).unwrap());
    let mut b = open(assemble(&reversed, &ArchiveOptions::default()).unwrap());
    assert_eq!(read_entry(&mut a, "summary.txt"), read_entry(&mut b, "summary.txt"));
}

#[test]
fn test_duplicate_names_disambiguated() {
    let encrypted = |position: usize, body: &[u8]| {
        outcome(
            position,
            InputDocument::from_bytes("same.pdf", b"%PDF".to_vec()),
            OutcomeKind::Encrypted {
                produced: body.to_vec(),
            },
        )
    };
    let result = BatchResult {
        total: 2,
        ok: 2,
        outcomes: vec![encrypted(1, b"second"), encrypted(0, b"first")],
        ..Default::default()
    };
    let options = ArchiveOptions {
        layout: ArchiveLayout::Flat,
        ..Default::default()
    };

    let mut archive = open(assemble(&result, &options).unwrap());
    assert_eq!(read_entry(&mut archive, "same.pdf"), b"first");
    assert_eq!(read_entry(&mut archive, "same (2).pdf"), b"second");
}

#[test]
fn test_custom_folder_names() {
    let options = ArchiveOptions {
        encrypted_dir: "sealed".into(),
        unencrypted_dir: "todo".into(),
        report_name: "REPORT.txt".into(),
        compression_level: 9,
        ..Default::default()
    };
    let archive = open(assemble(&sample_result(), &options).unwrap());
    let names: Vec<&str> = archive.file_names().collect();
    assert!(names.contains(&"sealed/report.pdf"));
    assert!(names.contains(&"todo/draft.pdf"));
    assert!(names.contains(&"REPORT.txt"));
}

#[test]
fn test_unreadable_original_left_out() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("gone.pdf");
    std::fs::write(&path, b"%PDF gone").unwrap();
    let document = InputDocument::from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let result = BatchResult {
        total: 1,
        skipped: 1,
        outcomes: vec![outcome(0, document, OutcomeKind::Skipped)],
        ..Default::default()
    };

    let mut archive = open(assemble(&result, &ArchiveOptions::default()).unwrap());
    let names: Vec<&str> = archive.file_names().collect();
    assert_eq!(names, vec!["summary.txt"]);

    let report = String::from_utf8(read_entry(&mut archive, "summary.txt")).unwrap();
    assert!(report.starts_with("SKIP\tgone.pdf\tno credential\n"));
}
