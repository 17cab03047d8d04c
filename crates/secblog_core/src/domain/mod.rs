use serde::{Deserialize, Serialize};

/// Fixed section order for every generated post.
pub const BLOG_OUTLINE: [&str; 6] = [
    "Introduction",
    "Detailed Explanation",
    "Vulnerable Code Snippet",
    "Mitigation and Prevention",
    "Remediated Code Snippet",
    "Key Takeaways",
];

/// Question answered from the reference PDF when none is given.
pub const DEFAULT_QUESTION: &str = "Explain the process of detecting ransomware";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishRequest {
    pub topic: String,
    pub title: String,
    /// Comma-separated tag list, passed through verbatim.
    pub tags: Option<String>,
}

impl PublishRequest {
    /// Title defaults to the topic, as the CMS post is named after it.
    pub fn for_topic(topic: impl Into<String>) -> Self {
        let topic = topic.into();
        Self {
            title: topic.clone(),
            topic,
            tags: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }
}
