//! Content items entering the pipeline

use serde::{Deserialize, Serialize};

/// A single piece of raw text to be processed
///
/// Created once per input and owned by exactly one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    id: String,
    text: String,
    source: Option<String>,
}

impl ContentItem {
    /// Create a new item with a generated identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use presswire_domain::ContentItem;
    ///
    /// let item = ContentItem::new("Chelsea have signed a striker");
    /// assert!(item.id().starts_with("content_"));
    /// ```
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            text: text.into(),
            source: None,
        }
    }

    /// Replace the generated identifier with a caller-provided one
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Attach a free-form source description
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Identifier used in logs, results and record names
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Raw text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Where the text came from, if known
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

/// One entry of a batch submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentInput {
    /// Raw text to process
    pub content: String,

    /// Caller-provided identifier; generated when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_id: Option<String>,

    /// Free-form source description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ContentInput {
    /// Create an input with only content set
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            input_id: None,
            source: None,
        }
    }

    /// Set the identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.input_id = Some(id.into());
        self
    }

    /// Convert into an immutable [`ContentItem`]
    pub fn into_item(self) -> ContentItem {
        let mut item = ContentItem::new(self.content);
        // Empty ids are treated the same as missing ones
        if let Some(id) = self.input_id.filter(|id| !id.trim().is_empty()) {
            item = item.with_id(id);
        }
        if let Some(source) = self.source {
            item = item.with_source(source);
        }
        item
    }
}

fn generate_id() -> String {
    format!("content_{}", uuid::Uuid::now_v7().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = ContentItem::new("a");
        let b = ContentItem::new("b");
        assert_ne!(a.id(), b.id());
        assert!(a.id().starts_with("content_"));
    }

    #[test]
    fn test_builder_sets_fields() {
        let item = ContentItem::new("text")
            .with_id("article_001")
            .with_source("wire");
        assert_eq!(item.id(), "article_001");
        assert_eq!(item.text(), "text");
        assert_eq!(item.source(), Some("wire"));
    }

    #[test]
    fn test_input_without_id_gets_generated_one() {
        let item = ContentInput::new("text").into_item();
        assert!(item.id().starts_with("content_"));
        assert_eq!(item.source(), None);
    }

    #[test]
    fn test_input_blank_id_is_ignored() {
        let item = ContentInput::new("text").with_id("  ").into_item();
        assert!(item.id().starts_with("content_"));
    }

    #[test]
    fn test_input_deserializes_with_optional_fields() {
        let input: ContentInput =
            serde_json::from_str(r#"{"content": "Lakers sign guard", "source": "feed"}"#).unwrap();
        assert_eq!(input.content, "Lakers sign guard");
        assert_eq!(input.input_id, None);
        assert_eq!(input.source.as_deref(), Some("feed"));
    }
}
