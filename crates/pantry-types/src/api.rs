use serde::{Deserialize, Serialize};

use crate::models::UserId;

/// One page of a listed collection.
///
/// List endpoints take `page` (1-based) and `limit` query parameters and
/// reply with this shape. A page shorter than `limit` means the collection
/// is exhausted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self { items: Vec::new(), has_more: false }
    }
}

/// Error body every backend endpoint normalizes to.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message} (code {code})")]
pub struct ApiError {
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ErrorDetail>,
}

impl ApiError {
    /// Error synthesized client-side when a non-2xx response carries no
    /// parseable body.
    pub fn from_status(code: u16, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), data: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub target: String,
    pub reason: String,
}

/// Filter parameters for the post list. Both empty means the home feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<UserId>,
}

impl FeedQuery {
    pub fn search(term: impl Into<String>) -> Self {
        Self { search: Some(term.into()), author: None }
    }

    pub fn by_author(author: UserId) -> Self {
        Self { search: None, author: Some(author) }
    }
}

// -- Mutation bodies --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentCreate {
    pub text: String,
}

/// Body for the liked / saved / shopping-list toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagUpdate {
    pub active: bool,
}

// -- Small responses --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadCount {
    pub count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_normalized_error_body() {
        let body = r#"{
            "code": 404,
            "message": "group not found",
            "data": { "target": "group", "reason": "unknown id" }
        }"#;
        let err: ApiError = serde_json::from_str(body).unwrap();
        assert_eq!(err.code, 404);
        assert_eq!(err.data.as_ref().unwrap().target, "group");
        assert_eq!(err.to_string(), "group not found (code 404)");
    }

    #[test]
    fn error_detail_is_optional() {
        let err: ApiError = serde_json::from_str(r#"{ "code": 500, "message": "boom" }"#).unwrap();
        assert!(err.data.is_none());
    }

    #[test]
    fn feed_query_skips_empty_fields() {
        let q = serde_json::to_value(FeedQuery::default()).unwrap();
        assert_eq!(q, serde_json::json!({}));
        let q = serde_json::to_value(FeedQuery::search("rye")).unwrap();
        assert_eq!(q, serde_json::json!({ "search": "rye" }));
    }
}
