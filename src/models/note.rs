use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_postgres::Row;
use uuid::Uuid;

/// Default number of notes per page.
pub const DEFAULT_PAGE_SIZE: i64 = 10;
/// Upper bound on the page size a client may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Represents a note owned by a single user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Lowercase tags in insertion order.
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    /// The owner. Every query is scoped by this column.
    pub user_id: Uuid,
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Row> for Note {
    type Error = tokio_postgres::Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            tags: row.try_get("tags")?,
            folder: row.try_get("folder")?,
            user_id: row.try_get("user_id")?,
            is_pinned: row.try_get("is_pinned")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Optional narrowing applied on top of owner scoping when listing notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    /// Exact folder match.
    pub folder: Option<String>,
    /// Matches notes carrying any of these tags. Empty means no tag filter.
    pub tags: Vec<String>,
    /// Exact pinned-flag match.
    pub is_pinned: Option<bool>,
}

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Number of rows skipped before this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Page metadata returned alongside a page of notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_notes: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageInfo {
    pub fn new(pagination: Pagination, total: i64) -> Self {
        let Pagination { page, limit } = pagination;
        Self {
            current_page: page,
            total_pages: (total + limit - 1) / limit,
            total_notes: total,
            has_next: page.saturating_mul(limit) < total,
            has_prev: page > 1,
        }
    }
}

/// A page of notes plus its metadata.
#[derive(Debug, Serialize)]
pub struct NotePage {
    pub notes: Vec<Note>,
    pub pagination: PageInfo,
}
