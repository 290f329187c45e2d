use std::sync::Arc;
use std::time::Duration;

use mdl_engine::Frontier;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn dequeue_returns_seeds_in_order() {
    let frontier = Frontier::new();
    assert_eq!(frontier.seed(["https://a.com/1", "https://a.com/2"]), 2);

    let timeout = Duration::from_millis(10);
    assert_eq!(frontier.dequeue(timeout).await.as_deref(), Some("https://a.com/1"));
    assert_eq!(frontier.dequeue(timeout).await.as_deref(), Some("https://a.com/2"));
}

#[tokio::test]
async fn empty_queue_signals_after_bounded_wait() {
    let frontier = Frontier::new();
    let started = tokio::time::Instant::now();
    let next = frontier.dequeue(Duration::from_millis(50)).await;

    assert_eq!(next, None);
    assert!(started.elapsed() >= Duration::from_millis(50));
}

#[tokio::test]
async fn waiting_dequeue_wakes_on_enqueue() {
    let frontier = Arc::new(Frontier::new());
    let producer = frontier.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        producer.enqueue("https://a.com/late");
    });

    let next = frontier.dequeue(Duration::from_secs(5)).await;
    assert_eq!(next.as_deref(), Some("https://a.com/late"));
}

#[tokio::test]
async fn duplicate_seeds_are_counted_once() {
    let frontier = Frontier::new();
    let added = frontier.seed(["https://a.com/x", "https://a.com/x", "https://a.com/y"]);

    assert_eq!(added, 2);
    assert_eq!(frontier.pending_len(), 2);
    assert_eq!(frontier.queued_len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_enqueue_of_same_url_admits_one() {
    let frontier = Arc::new(Frontier::new());
    let mut handles = Vec::new();
    for _ in 0..16 {
        let frontier = frontier.clone();
        handles.push(tokio::spawn(async move {
            frontier.enqueue("https://a.com/contended")
        }));
    }
    let mut admitted = 0;
    for handle in handles {
        if handle.await.unwrap() {
            admitted += 1;
        }
    }

    assert_eq!(admitted, 1);
    assert_eq!(frontier.pending_len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_claims_succeed_once() {
    let frontier = Arc::new(Frontier::new());
    let mut handles = Vec::new();
    for _ in 0..16 {
        let frontier = frontier.clone();
        handles.push(tokio::spawn(async move { frontier.claim("https://a.com/job") }));
    }
    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap() {
            winners += 1;
        }
    }

    assert_eq!(winners, 1);
    assert!(frontier.is_processed("https://a.com/job"));
}
