use std::time::Duration;

use trendwire_scraper::filter::{EngagementThresholds, TweetCollector};
use trendwire_scraper::scroller::{scroll_to_load_tweets, ScrollOptions};
use trendwire_scraper::testing::{tweet_element, StaticSession};

fn fast_opts() -> ScrollOptions {
    ScrollOptions {
        scroll_count: 3,
        scroll_delay: 0.0,
        max_tweets: 10,
        timeout: Duration::from_secs(60),
        growth_wait: Duration::ZERO,
    }
}

#[tokio::test]
async fn zero_target_returns_empty_without_scrolling() {
    let session = StaticSession::new(vec![vec![tweet_element(1, "nasa", "hello", 100, 50)]]);
    let mut collector = TweetCollector::new(EngagementThresholds::default());

    let mut opts = fast_opts();
    opts.max_tweets = 0;

    let completed = scroll_to_load_tweets(&session, &opts, &mut collector).await;
    assert!(completed);
    assert!(collector.is_empty());
    assert_eq!(session.scroll_count(), 0);
}

#[tokio::test]
async fn overlapping_batches_dedup_across_iterations() {
    let t1 = tweet_element(1, "nasa", "first", 100, 50);
    let t2 = tweet_element(2, "esa", "second", 100, 50);
    let t3 = tweet_element(3, "jaxa", "third", 100, 50);
    let session = StaticSession::new(vec![
        vec![t1.clone(), t2.clone()],
        vec![t1, t2, t3],
    ]);
    let mut collector = TweetCollector::new(EngagementThresholds::default());

    let completed = scroll_to_load_tweets(&session, &fast_opts(), &mut collector).await;
    assert!(completed);
    assert_eq!(collector.len(), 3);
    let ids: Vec<&str> = collector.tweets().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
}

#[tokio::test]
async fn stops_as_soon_as_the_target_is_met() {
    let batch: Vec<String> = (1..=6)
        .map(|i| tweet_element(i, "user", "text", 100, 50))
        .collect();
    let session = StaticSession::new(vec![batch]);
    let mut collector = TweetCollector::new(EngagementThresholds::default());

    let mut opts = fast_opts();
    opts.max_tweets = 4;

    let completed = scroll_to_load_tweets(&session, &opts, &mut collector).await;
    assert!(completed);
    // The whole visible batch is ingested before the target check fires.
    assert_eq!(collector.len(), 6);
    assert_eq!(session.scroll_count(), 0);
}

#[tokio::test]
async fn timeout_returns_false_but_keeps_collected_tweets() {
    let session = StaticSession::new(vec![vec![
        tweet_element(1, "nasa", "kept", 100, 50),
        tweet_element(2, "esa", "also kept", 100, 50),
    ]]);
    let mut collector = TweetCollector::new(EngagementThresholds::default());

    let opts = ScrollOptions {
        scroll_count: 10,
        scroll_delay: 0.2,
        max_tweets: 100,
        timeout: Duration::from_millis(100),
        growth_wait: Duration::ZERO,
    };

    let completed = scroll_to_load_tweets(&session, &opts, &mut collector).await;
    assert!(!completed);
    assert_eq!(collector.len(), 2);
}

#[tokio::test]
async fn stalled_height_escalates_to_jump_and_show_more() {
    let session = StaticSession::new(vec![vec![tweet_element(1, "nasa", "only one", 100, 50)]])
        .with_heights(vec![1000])
        .with_show_more(true);
    let mut collector = TweetCollector::new(EngagementThresholds::default());

    let completed = scroll_to_load_tweets(&session, &fast_opts(), &mut collector).await;
    assert!(completed);
    assert!(session.show_more_clicks() >= 1);
    assert!(session.scroll_log().contains(&2000));
}
