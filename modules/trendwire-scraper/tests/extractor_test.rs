use scraper::Html;

use trendwire_scraper::extractor::{extract_tweet, resolve_tweet_id, tweet_root};

fn extract(html: &str) -> trendwire_common::Tweet {
    let doc = Html::parse_fragment(html);
    let root = tweet_root(&doc);
    let id = resolve_tweet_id(root);
    extract_tweet(root, id)
}

#[test]
fn extracts_all_fields_from_full_markup() {
    let html = r#"<article data-testid="tweet">
        <div data-testid="User-Name">
            <a role="link" href="/nasa"><span>NASA</span></a>
        </div>
        <a href="/nasa/status/1845000000000000001">
            <time datetime="2026-08-25T12:00:00.000Z">2h</time>
        </a>
        <div data-testid="tweetText"><span>Artemis launch window confirmed</span></div>
        <div data-testid="tweetPhoto"><img src="https://pbs.twimg.com/media/abc.jpg"></div>
        <video src="https://video.twimg.com/xyz.mp4"></video>
        <button data-testid="reply"><span>12</span></button>
        <button data-testid="retweet"><span>340</span></button>
        <button data-testid="like"><span>1205</span></button>
    </article>"#;

    let tweet = extract(html);
    assert_eq!(tweet.id, "1845000000000000001");
    assert_eq!(tweet.content, "Artemis launch window confirmed");
    assert_eq!(tweet.user, "@nasa");
    assert_eq!(tweet.timestamp, "2026-08-25T12:00:00.000Z");
    assert_eq!(tweet.replies, 12);
    assert_eq!(tweet.retweets, 340);
    assert_eq!(tweet.likes, 1205);
    assert!(tweet.has_photos);
    assert_eq!(tweet.photo_urls, vec!["https://pbs.twimg.com/media/abc.jpg"]);
    assert!(tweet.has_videos);
    assert_eq!(tweet.video_urls, vec!["https://video.twimg.com/xyz.mp4"]);
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let html = r#"<article data-testid="tweet">
        <div data-testid="tweetText">just words</div>
    </article>"#;

    let tweet = extract(html);
    assert_eq!(tweet.content, "just words");
    assert_eq!(tweet.user, "");
    assert_eq!(tweet.timestamp, "");
    assert_eq!(tweet.likes, 0);
    assert_eq!(tweet.retweets, 0);
    assert_eq!(tweet.replies, 0);
    assert!(!tweet.has_photos);
    assert!(!tweet.has_videos);
}

#[test]
fn abbreviated_counters_are_recorded_as_zero() {
    let html = r#"<article data-testid="tweet">
        <div data-testid="tweetText">viral</div>
        <button data-testid="retweet"><span>4,2K</span></button>
        <button data-testid="like"><span>1.2K</span></button>
    </article>"#;

    let tweet = extract(html);
    assert_eq!(tweet.likes, 0);
    assert_eq!(tweet.retweets, 0);
}

#[test]
fn text_falls_back_to_lang_div() {
    let html = r#"<article data-testid="tweet">
        <div lang="en">fallback body text</div>
    </article>"#;

    let tweet = extract(html);
    assert_eq!(tweet.content, "fallback body text");
}

#[test]
fn native_data_attribute_beats_permalink() {
    let html = r#"<article data-testid="tweet" data-tweet-id="native-42">
        <a href="/u/status/999">1h</a>
    </article>"#;
    let doc = Html::parse_fragment(html);
    assert_eq!(resolve_tweet_id(tweet_root(&doc)), "native-42");
}

#[test]
fn unidentified_elements_get_stable_synthetic_ids() {
    let html = r#"<article data-testid="tweet">
        <div data-testid="tweetText">no permalink anywhere in this one</div>
    </article>"#;

    let first = extract(html);
    let second = extract(html);
    assert!(first.id.starts_with("synthetic-id-"));
    assert_eq!(first.id, second.id);

    let other =
        extract(r#"<article data-testid="tweet"><div data-testid="tweetText">different</div></article>"#);
    assert_ne!(first.id, other.id);
}
