// Tweet text helpers shared by the store, the suggestion endpoint and the CLI.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::store::Tweet;

/// Maximum weighted length of a single tweet
pub const TWEET_CHAR_LIMIT: usize = 280;

static EMOJI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\p{Emoji_Presentation}|\p{Extended_Pictographic}").expect("emoji pattern compiles")
});

/// Length of `text` as counted against the tweet limit.
///
/// Every code point counts once and every emoji counts one extra.
pub fn weighted_len(text: &str) -> usize {
    text.chars().count() + EMOJI.find_iter(text).count()
}

pub fn exceeds_limit(text: &str) -> bool {
    weighted_len(text) > TWEET_CHAR_LIMIT
}

/// Renders the thread as `Tweet 1: ...` lines for the suggestion prompt
pub fn thread_context(tweets: &[Tweet]) -> String {
    tweets
        .iter()
        .enumerate()
        .map(|(i, t)| format!("Tweet {}: {}", i + 1, t.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// First `max` characters of `value`, never splitting a code point
pub fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}
