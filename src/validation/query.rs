use crate::error::{AppError, FieldError, Result};
use crate::models::note::{NoteFilter, Pagination, MAX_PAGE_SIZE};

/// Parsed query string of `GET /notes` and `GET /notes/search`.
///
/// Built from raw key/value pairs so repeated keys (`tags=a&tags=b`) and the
/// bracketed form (`tags[]=a`) both work.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct NoteQuery {
    pub pagination: Pagination,
    pub filter: NoteFilter,
    /// Free-text search input, untrimmed.
    pub query: Option<String>,
}

impl NoteQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self> {
        let mut out = NoteQuery::default();
        let mut errors = Vec::new();

        for (key, value) in pairs {
            match key.as_str() {
                "page" => match parse_positive(value) {
                    Some(page) => out.pagination.page = page,
                    None => errors.push(FieldError::new("page", "page must be a positive integer")),
                },
                "limit" => match parse_positive(value) {
                    Some(limit) if limit <= MAX_PAGE_SIZE => out.pagination.limit = limit,
                    _ => errors.push(FieldError::new(
                        "limit",
                        format!("limit must be an integer between 1 and {}", MAX_PAGE_SIZE),
                    )),
                },
                "folder" => {
                    let folder = value.trim();
                    if !folder.is_empty() {
                        out.filter.folder = Some(folder.to_string());
                    }
                }
                "tags" | "tags[]" => {
                    for tag in value.split(',') {
                        let tag = tag.trim().to_lowercase();
                        if !tag.is_empty() && !out.filter.tags.contains(&tag) {
                            out.filter.tags.push(tag);
                        }
                    }
                }
                "isPinned" => match value.as_str() {
                    "true" => out.filter.is_pinned = Some(true),
                    "false" => out.filter.is_pinned = Some(false),
                    _ => errors.push(FieldError::new("isPinned", "isPinned must be true or false")),
                },
                "query" => out.query = Some(value.clone()),
                _ => {}
            }
        }

        if errors.is_empty() {
            Ok(out)
        } else {
            Err(AppError::Validation(errors))
        }
    }

    /// The search text, or `InvalidInput` when it is missing or blank.
    pub fn search_text(&self) -> Result<&str> {
        match self.query.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(AppError::invalid("query", "Search query is required")),
        }
    }
}

fn parse_positive(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok().filter(|n| *n >= 1)
}
