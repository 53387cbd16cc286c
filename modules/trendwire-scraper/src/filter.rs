//! Dedup and engagement filtering across scroll iterations.

use std::collections::HashSet;

use scraper::Html;
use tracing::debug;

use trendwire_common::{Config, Tweet};

use crate::extractor::{extract_tweet, resolve_tweet_id, tweet_root};

/// Minimum engagement a tweet needs to be retained.
#[derive(Debug, Clone, Copy)]
pub struct EngagementThresholds {
    pub min_likes: u32,
    pub min_retweets: u32,
}

impl EngagementThresholds {
    pub fn from_config(config: &Config) -> Self {
        Self {
            min_likes: config.min_likes,
            min_retweets: config.min_retweets,
        }
    }

    /// Both thresholds must be met.
    pub fn passes(&self, tweet: &Tweet) -> bool {
        tweet.likes >= self.min_likes && tweet.retweets >= self.min_retweets
    }
}

impl Default for EngagementThresholds {
    fn default() -> Self {
        Self {
            min_likes: 10,
            min_retweets: 5,
        }
    }
}

/// Accumulates tweets across scroll iterations. Dedups by identifier and
/// applies engagement thresholds; below-threshold tweets still enter the
/// seen set so overlapping snapshots are not re-extracted.
pub struct TweetCollector {
    thresholds: EngagementThresholds,
    seen: HashSet<String>,
    tweets: Vec<Tweet>,
}

impl TweetCollector {
    pub fn new(thresholds: EngagementThresholds) -> Self {
        Self {
            thresholds,
            seen: HashSet::new(),
            tweets: Vec::new(),
        }
    }

    /// Ingest one batch of element snapshots. Returns how many tweets were
    /// newly retained.
    pub fn ingest(&mut self, elements: &[String]) -> usize {
        let mut added = 0;
        for html in elements {
            let doc = Html::parse_fragment(html);
            let root = tweet_root(&doc);
            let id = resolve_tweet_id(root);
            if !self.seen.insert(id.clone()) {
                continue;
            }
            let tweet = extract_tweet(root, id);
            if self.thresholds.passes(&tweet) {
                debug!(
                    id = tweet.id.as_str(),
                    likes = tweet.likes,
                    retweets = tweet.retweets,
                    "Retained tweet"
                );
                self.tweets.push(tweet);
                added += 1;
            } else {
                debug!(
                    id = tweet.id.as_str(),
                    likes = tweet.likes,
                    retweets = tweet.retweets,
                    "Below engagement thresholds, skipping"
                );
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.tweets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweets.is_empty()
    }

    pub fn tweets(&self) -> &[Tweet] {
        &self.tweets
    }

    pub fn into_tweets(self) -> Vec<Tweet> {
        self.tweets
    }
}
