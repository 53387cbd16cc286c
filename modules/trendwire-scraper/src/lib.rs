//! Trend scraping engine for X/Twitter.
//!
//! One browser session drives one linear navigate → scroll → extract run:
//! the [`navigator`] wraps navigation primitives with randomized delays, the
//! [`scroller`] runs bounded scroll-and-extract cycles, the [`extractor`]
//! turns DOM element snapshots into structured tweets, and the [`filter`]
//! dedups and applies engagement thresholds. [`scrape`] ties it together
//! behind a JSON boundary that never surfaces an error to the caller.

pub mod extractor;
pub mod filter;
pub mod navigator;
pub mod scrape;
pub mod scroller;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
