//! S3 bucket tagging document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Bucket tags keyed by tag key. Iteration order is sorted by key.
pub type Tags = BTreeMap<String, String>;

/// The `<Tagging>` document used by `GetBucketTagging` and `PutBucketTagging`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "Tagging")]
pub struct Tagging {
    /// The tag set.
    #[serde(rename = "TagSet", default)]
    pub tag_set: TagSet,
}

/// `<TagSet>` wrapper around the individual tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet {
    /// Tags in document order.
    #[serde(rename = "Tag", default)]
    pub tags: Vec<Tag>,
}

/// A single key/value tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag key.
    #[serde(rename = "Key", default)]
    pub key: String,
    /// Tag value.
    #[serde(rename = "Value", default)]
    pub value: String,
}

impl Tagging {
    /// Builds a tagging document with tags sorted by key.
    pub fn from_tags(tags: &Tags) -> Self {
        Self {
            tag_set: TagSet {
                tags: tags
                    .iter()
                    .map(|(key, value)| Tag {
                        key: key.clone(),
                        value: value.clone(),
                    })
                    .collect(),
            },
        }
    }

    /// Converts the document into a tag map. Later duplicates win.
    pub fn into_tags(self) -> Tags {
        self.tag_set
            .tags
            .into_iter()
            .map(|tag| (tag.key, tag.value))
            .collect()
    }
}
