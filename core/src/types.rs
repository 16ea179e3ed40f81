//! Wire DTOs for the NewsBlur API.
//!
//! # Design
//! Fields that differ between API snapshots (`feed_link`, `starred`, every
//! classifier category) default instead of failing. Fields every variant
//! carries (`feeds`, `stories`, `story_hash`, ...) stay required so a body of
//! the wrong shape surfaces as a decode error.
//!
//! Free-form payloads (`errors`, `folders`) are kept as `serde_json::Value`
//! and passed through untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::decode::int_or_string;

/// Credentials for `/api/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginOutput {
    pub authenticated: bool,
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub errors: serde_json::Value,
    #[serde(default)]
    pub result: String,
}

/// Intelligence counts for a feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedCounts {
    #[serde(rename = "ps", default)]
    pub focus: u32,
    #[serde(rename = "nt", default)]
    pub unread: u32,
    #[serde(rename = "ng", default)]
    pub hidden: u32,
}

/// A subscribed feed. `id` is unique only within one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    pub id: u64,
    #[serde(flatten)]
    pub counts: FeedCounts,
    /// Source URL, usually RSS or Atom.
    #[serde(default)]
    pub feed_address: String,
    /// Site URL. Absent in some API versions.
    #[serde(default)]
    pub feed_link: String,
    #[serde(default)]
    pub feed_title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReaderFeedsOutput {
    pub feeds: Vec<Feed>,
    #[serde(default)]
    pub folders: Vec<serde_json::Value>,
}

/// A single story.
///
/// `story_hash` (`"<feed id>:<short hash>"`) is the identifier the mutation
/// endpoints take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub story_hash: String,
    pub story_feed_id: u64,
    #[serde(default)]
    pub story_title: String,
    #[serde(default)]
    pub story_content: String,
    #[serde(default)]
    pub story_authors: String,
    #[serde(default)]
    pub story_permalink: String,
    /// Seconds since the epoch.
    #[serde(deserialize_with = "int_or_string")]
    pub story_timestamp: i64,
    #[serde(default)]
    pub read_status: i32,
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub has_modifications: bool,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub guid_hash: String,
    #[serde(default)]
    pub story_date: String,
    #[serde(default)]
    pub short_parsed_date: String,
    #[serde(default)]
    pub long_parsed_date: String,
}

impl Story {
    /// The feed id encoded in the story hash, if the hash is well-formed.
    pub fn feed_id_from_hash(&self) -> Option<u64> {
        let (feed, short) = self.story_hash.split_once(':')?;
        if short.is_empty() {
            return None;
        }
        feed.parse().ok()
    }

    pub fn is_read(&self) -> bool {
        self.read_status != 0
    }
}

/// One page of stories from `/reader/feed/{id}` or `/reader/river_stories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoriesOutput {
    pub stories: Vec<Story>,
}

/// Response of the mark read / unread / starred / unstarred endpoints.
/// Older deployments reply with an empty object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkOutput {
    #[serde(default)]
    pub result: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarredStoryHashesOutput {
    pub starred_story_hashes: Vec<String>,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub user_id: i64,
}

/// Input for the `/classifier/{id}` adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierInput {
    pub feed_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassifierCategory {
    Author,
    Title,
    Tag,
    Feed,
}

/// Training score: `-1` hides, `0` is neutral, `1` focuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassifierScore {
    Hidden,
    Neutral,
    Focused,
}

impl ClassifierScore {
    pub fn from_raw(score: i32) -> Option<Self> {
        match score {
            -1 => Some(Self::Hidden),
            0 => Some(Self::Neutral),
            1 => Some(Self::Focused),
            _ => None,
        }
    }

    pub fn raw(self) -> i32 {
        match self {
            Self::Hidden => -1,
            Self::Neutral => 0,
            Self::Focused => 1,
        }
    }
}

/// Per-category classifier values and their raw scores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classifiers {
    #[serde(default)]
    pub authors: BTreeMap<String, i32>,
    #[serde(default)]
    pub titles: BTreeMap<String, i32>,
    #[serde(default)]
    pub tags: BTreeMap<String, i32>,
    #[serde(default)]
    pub feeds: BTreeMap<String, i32>,
}

impl Classifiers {
    pub fn category(&self, category: ClassifierCategory) -> &BTreeMap<String, i32> {
        match category {
            ClassifierCategory::Author => &self.authors,
            ClassifierCategory::Title => &self.titles,
            ClassifierCategory::Tag => &self.tags,
            ClassifierCategory::Feed => &self.feeds,
        }
    }

    /// Values in `category` trained with `score`, in key order.
    pub fn with_score(
        &self,
        category: ClassifierCategory,
        score: ClassifierScore,
    ) -> impl Iterator<Item = &str> {
        self.category(category)
            .iter()
            .filter(move |(_, raw)| ClassifierScore::from_raw(**raw) == Some(score))
            .map(|(value, _)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty() && self.titles.is_empty() && self.tags.is_empty() && self.feeds.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierOutput {
    #[serde(default)]
    pub payload: Classifiers,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(hash: &str) -> Story {
        serde_json::from_value(serde_json::json!({
            "story_hash": hash,
            "story_feed_id": 1,
            "story_timestamp": "1"
        }))
        .unwrap()
    }

    #[test]
    fn feed_counts_are_flattened() {
        let feed: Feed = serde_json::from_str(
            r#"{"id":42,"ps":1,"nt":7,"ng":2,"feed_address":"https://a/rss","feed_title":"A"}"#,
        )
        .unwrap();
        assert_eq!(
            feed.counts,
            FeedCounts {
                focus: 1,
                unread: 7,
                hidden: 2
            }
        );
        assert_eq!(feed.feed_link, "");
    }

    #[test]
    fn story_defaults_missing_starred() {
        let s = story("1:abc");
        assert!(!s.starred);
        assert!(!s.has_modifications);
        assert!(!s.is_read());
    }

    #[test]
    fn story_keeps_parsed_dates() {
        let s: Story = serde_json::from_str(
            r#"{"story_hash":"1:a","story_feed_id":1,"story_timestamp":1,
                "story_date":"2024-07-24 00:00:00","short_parsed_date":"24 Jul",
                "long_parsed_date":"Wednesday, July 24th"}"#,
        )
        .unwrap();
        assert_eq!(s.short_parsed_date, "24 Jul");
        assert_eq!(s.long_parsed_date, "Wednesday, July 24th");
        assert_eq!(story("1:b").short_parsed_date, "");
    }

    #[test]
    fn story_requires_hash() {
        let err = serde_json::from_str::<Story>(r#"{"story_feed_id":1,"story_timestamp":1}"#);
        assert!(err.is_err());
    }

    #[test]
    fn feed_id_from_hash() {
        assert_eq!(story("6204539:94b5fd").feed_id_from_hash(), Some(6204539));
        assert_eq!(story("6204539:").feed_id_from_hash(), None);
        assert_eq!(story("nohash").feed_id_from_hash(), None);
    }

    #[test]
    fn mark_output_accepts_empty_object() {
        let out: MarkOutput = serde_json::from_str("{}").unwrap();
        assert_eq!(out.result, None);
    }

    #[test]
    fn classifiers_filter_by_score() {
        let c: Classifiers = serde_json::from_str(
            r#"{"authors":{"Alice":-1,"Bob":1,"Carol":-1},"titles":{"sponsored":-1}}"#,
        )
        .unwrap();
        let hidden: Vec<_> = c
            .with_score(ClassifierCategory::Author, ClassifierScore::Hidden)
            .collect();
        assert_eq!(hidden, ["Alice", "Carol"]);
        assert!(c.category(ClassifierCategory::Tag).is_empty());
        assert!(!c.is_empty());
    }

    #[test]
    fn classifier_score_raw_values() {
        assert_eq!(ClassifierScore::from_raw(-1), Some(ClassifierScore::Hidden));
        assert_eq!(ClassifierScore::from_raw(2), None);
        assert_eq!(ClassifierScore::Focused.raw(), 1);
    }
}
