//! Batch pipeline tests against an in-memory engine

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use pdfseal::aggregator::ProgressSnapshot;
use pdfseal::batch::{BatchOptions, BatchRequest, MappingInput, submit};
use pdfseal::engine::EncryptionEngine;
use pdfseal::error::{BatchError, EngineError, ParseError};
use pdfseal::mapping::{MappingFormat, parse_mapping};
use pdfseal::pipeline::{CANCELLED, CancellationToken, OutcomeKind, OutcomeStatus, Pipeline, PipelineOptions};
use pdfseal::InputDocument;

/// Prefixes the password to the input, failing for documents containing "BROKEN".
#[derive(Default)]
struct FakeEngine {
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: Mutex<HashMap<Vec<u8>, usize>>,
}

impl FakeEngine {
    fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

impl EncryptionEngine for FakeEngine {
    fn encrypt_document(&self, input: &[u8], password: &str) -> Result<Vec<u8>, EngineError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        *self.calls.lock().unwrap().entry(input.to_vec()).or_default() += 1;

        std::thread::sleep(self.delay);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if input.windows(6).any(|w| w == b"BROKEN") {
            return Err(EngineError::new("qpdf: file is damaged\nunable to recover"));
        }
        let mut output = format!("[{password}]").into_bytes();
        output.extend_from_slice(input);
        Ok(output)
    }
}

fn doc(name: &str) -> InputDocument {
    InputDocument::from_bytes(name, format!("%PDF {name}").into_bytes())
}

fn request(mapping: &str, documents: Vec<InputDocument>) -> BatchRequest {
    BatchRequest {
        mapping: MappingInput::Text {
            text: mapping.to_string(),
            format: MappingFormat::Auto,
        },
        documents,
    }
}

#[test]
fn test_reference_scenario() {
    let engine = FakeEngine::default();
    let request = request(
        "report.pdf;hunter2;\nnotes.pdf;abc123",
        vec![doc("report.pdf"), doc("notes.pdf"), doc("draft.pdf")],
    );

    let output = submit(request, &engine, &BatchOptions::default(), |_| {}).unwrap();
    let result = output.result;

    assert_eq!((result.total, result.ok, result.skipped, result.failed), (3, 2, 1, 0));
    let ordered = result.outcomes_in_input_order();
    assert_eq!(ordered[0].status(), OutcomeStatus::Ok);
    assert_eq!(ordered[0].produced(), Some(&b"[hunter2]%PDF report.pdf"[..]));
    assert_eq!(ordered[1].produced(), Some(&b"[abc123]%PDF notes.pdf"[..]));
    assert_eq!(ordered[2].kind, OutcomeKind::Skipped);
    assert_eq!(engine.total_calls(), 2);
}

#[test]
fn test_every_document_processed_exactly_once() {
    let engine = FakeEngine::slow(Duration::from_millis(1));
    let mapping: String = (0..60).map(|i| format!("doc{i}.pdf;pw{i}\n")).collect();
    let documents: Vec<InputDocument> = (0..80).map(|i| doc(&format!("doc{i}.pdf"))).collect();
    let options = BatchOptions {
        concurrency: 6,
        ..Default::default()
    };

    let output = submit(request(&mapping, documents), &engine, &options, |_| {}).unwrap();
    let result = output.result;

    assert_eq!(result.outcomes.len(), 80);
    assert_eq!(result.ok + result.skipped + result.failed, result.total);
    assert_eq!((result.ok, result.skipped), (60, 20));

    let mut positions: Vec<usize> = result.outcomes.iter().map(|o| o.position).collect();
    positions.sort();
    assert_eq!(positions, (0..80).collect::<Vec<_>>());

    let calls = engine.calls.lock().unwrap();
    assert_eq!(calls.len(), 60);
    assert!(calls.values().all(|&count| count == 1));
}

#[test]
fn test_concurrency_ceiling() {
    for limit in [1, 2, 4] {
        let engine = FakeEngine::slow(Duration::from_millis(5));
        let mapping: String = (0..20).map(|i| format!("d{i}.pdf;pw\n")).collect();
        let table = parse_mapping(&mapping, MappingFormat::Freeform).unwrap();
        let documents = (0..20).map(|i| doc(&format!("d{i}.pdf"))).collect();

        let pipeline = Pipeline::new(
            &table,
            &engine,
            PipelineOptions {
                concurrency: limit,
                ..Default::default()
            },
        );
        let result = pipeline.run(documents, |_| {});

        assert_eq!(result.ok, 20);
        let peak = engine.peak.load(Ordering::SeqCst);
        assert!(peak <= limit, "peak {peak} exceeded limit {limit}");
    }
}

#[test]
fn test_engine_failure_kept_verbatim() {
    let engine = FakeEngine::default();
    let documents = vec![
        InputDocument::from_bytes("bad.pdf", b"%PDF BROKEN".to_vec()),
        doc("good.pdf"),
    ];

    let output = submit(
        request("bad.pdf;x\ngood.pdf;y", documents),
        &engine,
        &BatchOptions::default(),
        |_| {},
    )
    .unwrap();

    let ordered = output.result.outcomes_in_input_order();
    assert_eq!(ordered[0].detail(), "qpdf: file is damaged\nunable to recover");
    assert_eq!(ordered[1].status(), OutcomeStatus::Ok);
    assert_eq!((output.result.ok, output.result.failed), (1, 1));
}

#[test]
fn test_progress_reported_once_per_document() {
    let engine = FakeEngine::default();
    let snapshots = Mutex::new(Vec::<ProgressSnapshot>::new());
    let documents = vec![doc("a.pdf"), doc("b.pdf"), doc("c.pdf"), doc("d.pdf")];

    submit(
        request("a.pdf;1\nc.pdf;3", documents),
        &engine,
        &BatchOptions::default(),
        |snapshot| snapshots.lock().unwrap().push(*snapshot),
    )
    .unwrap();

    let snapshots = snapshots.into_inner().unwrap();
    assert_eq!(snapshots.len(), 4);
    for (i, snapshot) in snapshots.iter().enumerate() {
        assert_eq!(snapshot.done, i + 1);
        assert_eq!(snapshot.total, 4);
        assert_eq!(snapshot.ok + snapshot.skipped + snapshot.failed, snapshot.done);
    }
    assert_eq!(snapshots[3].percent(), 100);
}

#[test]
fn test_cancelled_batch_still_accounts_for_every_document() {
    let engine = FakeEngine::default();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let options = BatchOptions {
        cancel,
        ..Default::default()
    };

    let output = submit(
        request("a.pdf;1\nb.pdf;2", vec![doc("a.pdf"), doc("b.pdf"), doc("c.pdf")]),
        &engine,
        &options,
        |_| {},
    )
    .unwrap();

    let result = output.result;
    assert!(result.cancelled);
    assert_eq!(result.outcomes.len(), 3);
    assert_eq!((result.failed, result.skipped), (2, 1));
    assert!(
        result
            .outcomes
            .iter()
            .filter(|o| o.status() == OutcomeStatus::Failed)
            .all(|o| o.detail() == CANCELLED)
    );
    assert_eq!(engine.total_calls(), 0);
}

#[test]
fn test_empty_mapping_processes_nothing() {
    let engine = FakeEngine::default();
    let err = submit(request("", vec![doc("a.pdf")]), &engine, &BatchOptions::default(), |_| {})
        .unwrap_err();
    assert!(matches!(err, BatchError::Parse(ParseError::EmptyMapping)));
    assert_eq!(engine.total_calls(), 0);
}

#[test]
fn test_pipeline_with_no_documents() {
    let engine = FakeEngine::default();
    let table = parse_mapping("a.pdf;1", MappingFormat::Auto).unwrap();
    let pipeline = Pipeline::new(&table, &engine, PipelineOptions::default());

    let result = pipeline.run(Vec::new(), |_| panic!("no progress expected"));
    assert_eq!(result.total, 0);
    assert_eq!(result.ok + result.skipped + result.failed, 0);
    assert_eq!(result.snapshot().percent(), 0);
}
