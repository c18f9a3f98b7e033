//! Integration tests for the signal pipeline

use crate::test_utils::{downtrend, pipeline, tickers, uptrend, FaultySink, ScriptedProvider};
use chrono::NaiveDate;
use idx_signals::models::SignalType;
use idx_signals::services::MemorySink;
use idx_signals::{PipelineError, ProcessingOutcome, SkipReason};
use std::sync::Arc;

#[tokio::test]
async fn uptrend_is_classified_and_persisted() {
    let provider = Arc::new(ScriptedProvider::default().with_history("BBCA.JK", uptrend(60)));
    let sink = Arc::new(MemorySink::new());
    let pipeline = pipeline(provider.clone(), sink.clone());

    let outcome = pipeline.process("BBCA").await;

    let ProcessingOutcome::Completed {
        ticker,
        date,
        snapshot,
        verdict,
    } = &outcome
    else {
        panic!("expected completion, got {:?}", outcome);
    };
    assert_eq!(ticker, "BBCA");
    assert_eq!(*date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    assert_eq!(verdict.signal_type, SignalType::Buy);
    assert_eq!(verdict.confidence, 80);
    assert_eq!(snapshot.rsi, Some(100.0));

    let prices = sink.prices().await;
    assert_eq!(prices.len(), 60);
    assert!(prices.iter().all(|p| p.ticker == "BBCA"));
    let last_key = prices.last().unwrap().key;

    let analysis = sink.analysis_rows().await;
    assert_eq!(analysis.len(), 1);
    let (key, row) = &analysis[0];
    assert_eq!(*key, last_key);
    assert_eq!(row.ema, Some(snapshot.ema_short));
    assert_eq!(row.rsi, snapshot.rsi);
    assert_eq!((row.macd, row.sma), (None, None));

    let signals = sink.signals().await;
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].key, last_key);
    assert_eq!(&signals[0].verdict, verdict);

    let requests = provider.requests.lock().unwrap().clone();
    assert_eq!(
        requests,
        vec![("BBCA.JK".to_string(), "6mo".to_string(), "1d".to_string())]
    );
}

#[tokio::test]
async fn downtrend_is_a_sell() {
    let provider = Arc::new(ScriptedProvider::default().with_history("TLKM.JK", downtrend(60)));
    let pipeline = pipeline(provider, Arc::new(MemorySink::new()));

    let outcome = pipeline.process("TLKM").await;
    let verdict = outcome.verdict().expect("completed");
    assert_eq!((verdict.signal_type, verdict.confidence), (SignalType::Sell, 80));
    assert!(verdict.reason.contains("RSI 0.0 < 40"));
}

#[tokio::test]
async fn short_history_without_long_ema_holds() {
    let provider = Arc::new(ScriptedProvider::default().with_history("BBRI.JK", uptrend(30)));
    let pipeline = pipeline(provider, Arc::new(MemorySink::new()));

    let outcome = pipeline.process("BBRI").await;
    let verdict = outcome.verdict().expect("completed");
    assert_eq!((verdict.signal_type, verdict.confidence), (SignalType::Hold, 50));
    assert_eq!(verdict.reason, "No strong signal");
}

#[tokio::test]
async fn empty_history_is_skipped() {
    let sink = Arc::new(MemorySink::new());
    let pipeline = pipeline(Arc::new(ScriptedProvider::default()), sink.clone());

    let outcome = pipeline.process("GOTO").await;
    assert!(matches!(
        outcome,
        ProcessingOutcome::Skipped {
            reason: SkipReason::MissingUpstreamData,
            ..
        }
    ));
    assert_eq!(outcome.status_line(), "Skipped GOTO: no data");
    assert!(sink.prices().await.is_empty());
}

#[tokio::test]
async fn insufficient_history_is_skipped_before_persisting() {
    let provider = Arc::new(ScriptedProvider::default().with_history("ASII.JK", uptrend(10)));
    let sink = Arc::new(MemorySink::new());
    let pipeline = pipeline(provider, sink.clone());

    let outcome = pipeline.process("ASII").await;
    match outcome {
        ProcessingOutcome::Skipped { reason, .. } => assert_eq!(
            reason,
            SkipReason::InsufficientData {
                required: 20,
                available: 10
            }
        ),
        other => panic!("expected skip, got {:?}", other),
    }
    assert!(sink.prices().await.is_empty());
    assert!(sink.signals().await.is_empty());
}

#[tokio::test]
async fn unusable_rows_do_not_count_towards_the_window() {
    let mut raw = uptrend(25);
    for bar in raw.iter_mut().take(10) {
        bar.close = None;
    }
    let provider = Arc::new(ScriptedProvider::default().with_history("UNVR.JK", raw));
    let pipeline = pipeline(provider, Arc::new(MemorySink::new()));

    let outcome = pipeline.process("UNVR").await;
    assert!(matches!(
        outcome,
        ProcessingOutcome::Skipped {
            reason: SkipReason::InsufficientData { available: 15, .. },
            ..
        }
    ));
}

#[tokio::test]
async fn fetch_error_does_not_stop_the_batch() {
    let provider = Arc::new(
        ScriptedProvider::default()
            .with_error("BBCA.JK", "rate limited")
            .with_history("TLKM.JK", uptrend(60)),
    );
    let pipeline = pipeline(provider, Arc::new(MemorySink::new()));

    let report = pipeline
        .process_batch(&tickers(&["BBCA", "TLKM", "BBRI"]))
        .await;

    assert_eq!(report.outcomes.len(), 3);
    assert!(matches!(
        &report.outcomes[0],
        ProcessingOutcome::Failed {
            error: PipelineError::Fetch(_),
            ..
        }
    ));
    assert!(report.outcomes[1].is_completed());
    assert_eq!(report.outcomes[2].ticker(), "BBRI");
    assert_eq!((report.completed(), report.skipped(), report.failed()), (1, 1, 1));
}

#[tokio::test]
async fn missing_join_key_fails_only_that_ticker() {
    let provider = Arc::new(
        ScriptedProvider::default()
            .with_history("BBCA.JK", uptrend(60))
            .with_history("TLKM.JK", uptrend(60)),
    );
    let sink = Arc::new(FaultySink {
        lose_keys_for: Some("BBCA".to_string()),
        ..FaultySink::default()
    });
    let pipeline = pipeline(provider, sink.clone());

    let report = pipeline.process_batch(&tickers(&["BBCA", "TLKM"])).await;

    assert!(matches!(
        &report.outcomes[0],
        ProcessingOutcome::Failed {
            error: PipelineError::JoinKeyNotFound { .. },
            ..
        }
    ));
    assert!(report.outcomes[1].is_completed());
    assert_eq!(sink.inner.signals().await.len(), 1);
    assert_eq!(sink.inner.analysis_rows().await.len(), 1);
}

#[tokio::test]
async fn failed_price_upserts_surface_as_missing_key() {
    let provider = Arc::new(ScriptedProvider::default().with_history("BBCA.JK", uptrend(60)));
    let sink = Arc::new(FaultySink {
        fail_upserts: true,
        ..FaultySink::default()
    });
    let pipeline = pipeline(provider, sink);

    let outcome = pipeline.process("BBCA").await;
    assert!(matches!(
        outcome,
        ProcessingOutcome::Failed {
            error: PipelineError::JoinKeyNotFound { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn signal_insert_failure_is_reported_after_analysis_is_written() {
    let provider = Arc::new(ScriptedProvider::default().with_history("BBCA.JK", uptrend(60)));
    let sink = Arc::new(FaultySink {
        fail_signals: true,
        ..FaultySink::default()
    });
    let pipeline = pipeline(provider, sink.clone());

    let outcome = pipeline.process("BBCA").await;

    match &outcome {
        ProcessingOutcome::Failed {
            error: PipelineError::Persistence { source, .. },
            ..
        } => assert_eq!(source.operation, "insert_signal"),
        other => panic!("expected persistence failure, got {:?}", other),
    }
    assert_eq!(sink.inner.analysis_rows().await.len(), 1);
    assert!(sink.inner.signals().await.is_empty());
    assert!(outcome.status_line().starts_with("Failed BBCA: Persistence error"));
}

#[tokio::test]
async fn status_line_reports_signal_and_reason() {
    let provider = Arc::new(ScriptedProvider::default().with_history("BBCA.JK", uptrend(60)));
    let pipeline = pipeline(provider, Arc::new(MemorySink::new()));

    let outcome = pipeline.process("BBCA").await;
    let line = outcome.status_line();
    assert!(line.starts_with("Processed BBCA on 2024-03-01: BUY (EMA20 ("), "{line}");
    assert!(line.ends_with("RSI 100.0 > 50)"), "{line}");
}

#[tokio::test]
async fn reprocessing_reuses_price_rows() {
    let provider = Arc::new(ScriptedProvider::default().with_history("BBCA.JK", uptrend(60)));
    let sink = Arc::new(MemorySink::new());
    let pipeline = pipeline(provider, sink.clone());

    pipeline.process("BBCA").await;
    pipeline.process("BBCA").await;

    assert_eq!(sink.prices().await.len(), 60);
    let signals = sink.signals().await;
    assert_eq!(signals.len(), 2);
    assert_eq!(signals[0].key, signals[1].key);
}
