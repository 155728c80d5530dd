use crate::errors::{AppError, StoreError};
use crate::jobs::daily_stats::{APPEND_FAILED_TITLE, FETCH_FAILED_TITLE};
use crate::jobs::run_daily_stats;
use crate::tests::utils::{listing, FakeSource, RecordingHistory, RecordingNotifier};

const TABLE: &str = "avalon_daily_stats";

fn batch(n: usize) -> FakeSource {
    FakeSource::new(
        (0..n)
            .map(|i| listing(&format!("Apt. {i}"), 3000 + i as u32, (2, 1), (2, 15)))
            .collect(),
    )
}

#[test]
fn writes_in_groups_of_twenty_five() {
    let history = RecordingHistory::default();
    let notifier = RecordingNotifier::default();

    let written = run_daily_stats(&batch(53), &history, TABLE, &notifier).unwrap();

    assert_eq!(written, 53);
    assert_eq!(*history.batches.borrow(), vec![25, 25, 3]);
    assert!(notifier.sent.borrow().is_empty());
}

#[test]
fn exact_multiple_has_no_trailing_group() {
    let history = RecordingHistory::default();
    let notifier = RecordingNotifier::default();

    run_daily_stats(&batch(50), &history, TABLE, &notifier).unwrap();
    assert_eq!(*history.batches.borrow(), vec![25, 25]);
}

#[test]
fn empty_batch_writes_nothing() {
    let history = RecordingHistory::default();
    let notifier = RecordingNotifier::default();

    let written = run_daily_stats(&batch(0), &history, TABLE, &notifier).unwrap();
    assert_eq!(written, 0);
    assert!(history.batches.borrow().is_empty());
}

#[test]
fn failed_group_stops_remaining_groups_and_reports() {
    let history = RecordingHistory {
        fail_on: Some(2),
        ..Default::default()
    };
    let notifier = RecordingNotifier::default();

    let err = run_daily_stats(&batch(53), &history, TABLE, &notifier).unwrap_err();

    assert!(matches!(err, AppError::Store(StoreError::Internal)));
    assert_eq!(*history.batches.borrow(), vec![25, 25]);

    let sent = notifier.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, APPEND_FAILED_TITLE);
    assert!(sent[0].1.contains("connection slot unavailable"));
}

#[test]
fn table_preparation_failure_is_reported_and_returned() {
    let history = RecordingHistory {
        fail_prepare: true,
        ..Default::default()
    };
    let notifier = RecordingNotifier::default();

    let err = run_daily_stats(&batch(3), &history, TABLE, &notifier).unwrap_err();

    assert!(matches!(err, AppError::Store(StoreError::Io { .. })));
    assert!(history.batches.borrow().is_empty());

    let sent = notifier.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, APPEND_FAILED_TITLE);
    assert!(sent[0].1.contains("no such directory"));
}

#[test]
fn fetch_failure_is_reported_and_returned() {
    let history = RecordingHistory::default();
    let notifier = RecordingNotifier::default();

    let err = run_daily_stats(&FakeSource::failing(), &history, TABLE, &notifier).unwrap_err();

    assert!(matches!(err, AppError::Scraper(_)));
    assert!(history.batches.borrow().is_empty());

    let sent = notifier.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, FETCH_FAILED_TITLE);
    assert!(sent[0].1.contains("HTTP 503"));
}

#[test]
fn report_failure_does_not_mask_append_error() {
    let history = RecordingHistory {
        fail_on: Some(1),
        ..Default::default()
    };
    let notifier = RecordingNotifier {
        fail: true,
        ..Default::default()
    };

    let err = run_daily_stats(&batch(3), &history, TABLE, &notifier).unwrap_err();
    assert!(matches!(err, AppError::Store(_)));
}
