use std::time::Duration;

use klaksvik::infrastructure::llm::TokenBucket;

#[tokio::test(start_paused = true)]
async fn given_full_bucket_when_acquiring_within_burst_then_no_wait_occurs() {
    let bucket = TokenBucket::new(3, 60);
    let start = tokio::time::Instant::now();

    for _ in 0..3 {
        bucket.acquire().await;
    }

    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn given_drained_bucket_when_acquiring_then_waits_for_refill() {
    // 60 requests per minute refills one token per second.
    let bucket = TokenBucket::new(1, 60);
    bucket.acquire().await;

    let start = tokio::time::Instant::now();
    bucket.acquire().await;

    assert!(start.elapsed() >= Duration::from_millis(990));
}

#[tokio::test(start_paused = true)]
async fn given_drained_bucket_when_acquiring_repeatedly_then_calls_are_paced() {
    let bucket = TokenBucket::new(1, 120);
    bucket.acquire().await;

    let start = tokio::time::Instant::now();
    bucket.acquire().await;
    bucket.acquire().await;

    // Two refills at 0.5s each.
    assert!(start.elapsed() >= Duration::from_millis(990));
}

#[tokio::test]
async fn given_unthrottled_bucket_when_acquiring_then_returns_immediately() {
    let bucket = TokenBucket::unthrottled();

    for _ in 0..10 {
        bucket.acquire().await;
    }
}
