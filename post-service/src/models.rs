//! Post and account models
//!
//! Domain models and request/response payloads.

use std::fmt;
use std::str::FromStr;

use auth::Role;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Posts per page when the client does not ask for a valid size.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Publication state of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Publish,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Publish => "publish",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "publish" => Ok(PostStatus::Publish),
            other => Err(format!("unknown post status: {}", other)),
        }
    }
}

/// A stored blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub status: PostStatus,
    #[serde(serialize_with = "rfc3339_seconds")]
    pub publish_date: Option<DateTime<Utc>>,
}

/// RFC 3339 with whole seconds, e.g. `2024-01-15T09:00:00Z`.
fn rfc3339_seconds<S: Serializer>(
    date: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match date {
        Some(date) => serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Secs, true)),
        None => serializer.serialize_none(),
    }
}

impl Post {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Body of create and update requests. Absent fields are empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A registered account. The password hash never leaves the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub name: String,
    pub role: Role,
}

/// Registration request
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub username: String,
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

/// Login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login: the account and its bearer token
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub account: Account,
    pub token: String,
}

/// Page selection for tag search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    /// Parse raw query values. Anything missing, unparsable or below 1 falls
    /// back to page 1 and [`DEFAULT_PAGE_SIZE`].
    pub fn from_params(page: Option<&str>, limit: Option<&str>) -> Self {
        fn positive(raw: Option<&str>) -> Option<u32> {
            raw.and_then(|s| s.trim().parse::<u32>().ok()).filter(|n| *n >= 1)
        }

        Self {
            page: positive(page).unwrap_or(1),
            limit: positive(limit).unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    /// Rows to skip; saturates at `i64::MAX` so huge pages are simply empty.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1).saturating_mul(i64::from(self.limit))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of tag search results
#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    pub data: Vec<Post>,
    pub page: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        assert_eq!(Pagination::from_params(None, None), Pagination::default());
        assert_eq!(
            Pagination::from_params(Some("0"), Some("-5")),
            Pagination { page: 1, limit: 50 }
        );
        assert_eq!(
            Pagination::from_params(Some("abc"), Some("")),
            Pagination { page: 1, limit: 50 }
        );
        assert_eq!(
            Pagination::from_params(Some("3"), Some("10")),
            Pagination { page: 3, limit: 10 }
        );
    }

    #[test]
    fn test_pagination_offset() {
        assert_eq!(Pagination { page: 1, limit: 50 }.offset(), 0);
        assert_eq!(Pagination { page: 3, limit: 10 }.offset(), 20);
    }

    #[test]
    fn test_pagination_offset_saturates() {
        let max = u32::MAX.to_string();
        let pagination = Pagination::from_params(Some(&max), Some(&max));
        assert_eq!(pagination.page, u32::MAX);
        assert_eq!(pagination.offset(), i64::MAX);
    }

    #[test]
    fn test_publish_date_whole_seconds() {
        use chrono::TimeZone;

        let published = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap()
            + chrono::Duration::nanoseconds(620_107_330);
        let post = Post {
            id: "p1".to_string(),
            title: "Hello".to_string(),
            content: "World".to_string(),
            tags: Vec::new(),
            status: PostStatus::Publish,
            publish_date: Some(published),
        };
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["publish_date"], "2024-01-15T09:00:00Z");
    }

    #[test]
    fn test_new_post_fields_default_to_empty() {
        let post: NewPost = serde_json::from_str(r#"{"title":"only a title"}"#).unwrap();
        assert_eq!(post.title, "only a title");
        assert!(post.content.is_empty());
        assert!(post.tags.is_empty());
    }

    #[test]
    fn test_account_hides_password_hash() {
        let account = Account {
            id: "1".to_string(),
            username: "alice".to_string(),
            password_hash: "K7gNU3sdo+OL0wNhqoVWhr3g6s1xYv72ol/pe/Unols=".to_string(),
            name: "Alice".to_string(),
            role: Role::Admin,
        };
        let json = serde_json::to_value(&account).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "admin");
    }

    #[test]
    fn test_unpublished_post_serializes_null_date() {
        let post = Post {
            id: "p1".to_string(),
            title: "Hello".to_string(),
            content: "World".to_string(),
            tags: vec!["rust".to_string()],
            status: PostStatus::Draft,
            publish_date: None,
        };
        let json = serde_json::to_value(&post).unwrap();
        assert!(json["publish_date"].is_null());
        assert_eq!(json["status"], "draft");
        assert!(post.has_tag("rust"));
        assert!(!post.has_tag("go"));
    }

    #[test]
    fn test_new_account_role_defaults_to_user() {
        let account: NewAccount =
            serde_json::from_str(r#"{"username":"bob","name":"Bob","password":"pw"}"#).unwrap();
        assert_eq!(account.role, Role::User);

        let result: Result<NewAccount, _> = serde_json::from_str(
            r#"{"username":"bob","name":"Bob","password":"pw","role":"root"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_page_field_names() {
        let page = PostPage {
            data: Vec::new(),
            page: 2,
            page_size: 10,
            total: 0,
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["pageSize"], 10);
        assert_eq!(json["data"], serde_json::json!([]));
    }
}
