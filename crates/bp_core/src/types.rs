use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fully extracted article: listing metadata plus the detail page body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub author: String,
    #[serde(default)]
    pub content: String,
}

/// An article as held by a store, with the identity the store assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredArticle {
    pub id: i64,
    #[serde(flatten)]
    pub record: ArticleRecord,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl StoredArticle {
    pub fn title(&self) -> &str {
        &self.record.title
    }

    pub fn content(&self) -> &str {
        &self.record.content
    }
}

/// Partial field set for an update; unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ArticleUpdate {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.image_url.is_none()
            && self.author.is_none()
            && self.content.is_none()
    }

    /// Applies the set fields onto `record`.
    pub fn apply(self, record: &mut ArticleRecord) {
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(description) = self.description {
            record.description = description;
        }
        if let Some(image_url) = self.image_url {
            record.image_url = Some(image_url);
        }
        if let Some(author) = self.author {
            record.author = author;
        }
        if let Some(content) = self.content {
            record.content = content;
        }
    }
}

/// What a listing page alone tells us about an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateEntry {
    pub title: String,
    pub url: String,
    pub image_url: Option<String>,
    pub description: String,
    pub author: String,
}

impl CandidateEntry {
    pub fn into_record(self, content: String) -> ArticleRecord {
        ArticleRecord {
            url: self.url,
            title: self.title,
            description: self.description,
            image_url: self.image_url,
            author: self.author,
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ArticleRecord {
        ArticleRecord {
            url: "https://example.com/blogs/a/".to_string(),
            title: "A".to_string(),
            description: String::new(),
            image_url: None,
            author: "BeyondChats Team".to_string(),
            content: "<p>body</p>".to_string(),
        }
    }

    #[test]
    fn test_stored_article_matches_api_json() {
        let json = r#"{
            "id": 3,
            "title": "Chatbots in clinics",
            "description": "",
            "url": "https://example.com/blogs/chatbots/",
            "image_url": null,
            "author": "Jane",
            "content": "<p>hi</p>",
            "created_at": "2024-05-01T10:00:00.000000Z",
            "updated_at": "2024-05-01T10:00:00.000000Z"
        }"#;
        let article: StoredArticle = serde_json::from_str(json).unwrap();
        assert_eq!(article.id, 3);
        assert_eq!(article.title(), "Chatbots in clinics");
        assert_eq!(article.record.image_url, None);
        assert!(article.created_at.is_some());
    }

    #[test]
    fn test_update_serializes_only_set_fields() {
        let update = ArticleUpdate::content("<div>new</div>");
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({ "content": "<div>new</div>" }));
        assert!(!update.is_empty());
        assert!(ArticleUpdate::default().is_empty());
    }

    #[test]
    fn test_update_apply_replaces_only_content() {
        let mut target = record();
        ArticleUpdate::content("<div>new</div>").apply(&mut target);
        assert_eq!(target.content, "<div>new</div>");
        assert_eq!(target.title, "A");
        assert_eq!(target.image_url, None);
    }

    #[test]
    fn test_candidate_into_record() {
        let candidate = CandidateEntry {
            title: "A".to_string(),
            url: "https://example.com/blogs/a/".to_string(),
            image_url: Some("https://example.com/a.png".to_string()),
            description: "short".to_string(),
            author: "Jane".to_string(),
        };
        let record = candidate.into_record("<p>body</p>".to_string());
        assert_eq!(record.content, "<p>body</p>");
        assert_eq!(record.image_url.as_deref(), Some("https://example.com/a.png"));
        assert_eq!(record.author, "Jane");
    }
}
