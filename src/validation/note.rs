use garde::Validate;
use serde::Deserialize;

use super::json::{trimmed, Normalize};
use super::rules::{at_most, optional, required};

const MAX_TAG_CHARS: usize = 20;

/// The full set of user-writable note fields, as stored.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NoteDraft {
    #[garde(custom(required("Title", 100)))]
    pub title: String,
    #[garde(custom(required("Content", 10000)))]
    pub content: String,
    #[garde(custom(validate_tags))]
    pub tags: Vec<String>,
    #[garde(custom(optional(required("Folder", 50))))]
    pub folder: Option<String>,
    #[garde(skip)]
    pub is_pinned: bool,
}

/// The request payload for creating a note.
///
/// Absent fields default to empty so that each one is reported by name.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateNoteRequest {
    #[garde(custom(required("Title", 100)))]
    pub title: String,
    #[garde(custom(required("Content", 10000)))]
    pub content: String,
    #[garde(custom(optional(validate_tags)))]
    pub tags: Option<Vec<String>>,
    #[garde(custom(optional(at_most("Folder", 50))))]
    pub folder: Option<String>,
    #[garde(skip)]
    pub is_pinned: Option<bool>,
}

impl Normalize for CreateNoteRequest {
    fn normalize(self) -> Self {
        Self {
            title: trimmed(self.title),
            content: trimmed(self.content),
            tags: self.tags.map(normalize_tags),
            folder: self.folder.map(trimmed).filter(|f| !f.is_empty()),
            is_pinned: self.is_pinned,
        }
    }
}

impl From<CreateNoteRequest> for NoteDraft {
    fn from(req: CreateNoteRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            tags: req.tags.unwrap_or_default(),
            folder: req.folder,
            is_pinned: req.is_pinned.unwrap_or(false),
        }
    }
}

/// The request payload for a partial note update.
///
/// Absent fields are left untouched. An empty `folder` removes the note from
/// its folder.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateNoteRequest {
    #[garde(custom(optional(required("Title", 100))))]
    pub title: Option<String>,
    #[garde(custom(optional(required("Content", 10000))))]
    pub content: Option<String>,
    #[garde(custom(optional(validate_tags)))]
    pub tags: Option<Vec<String>>,
    #[garde(custom(optional(at_most("Folder", 50))))]
    pub folder: Option<String>,
    #[garde(skip)]
    pub is_pinned: Option<bool>,
}

impl Normalize for UpdateNoteRequest {
    fn normalize(self) -> Self {
        Self {
            title: self.title.map(trimmed),
            content: self.content.map(trimmed),
            tags: self.tags.map(normalize_tags),
            folder: self.folder.map(trimmed),
            is_pinned: self.is_pinned,
        }
    }
}

impl UpdateNoteRequest {
    /// Applies the present fields on top of `draft`.
    pub fn merge_into(self, mut draft: NoteDraft) -> NoteDraft {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(content) = self.content {
            draft.content = content;
        }
        if let Some(tags) = self.tags {
            draft.tags = tags;
        }
        if let Some(folder) = self.folder {
            draft.folder = (!folder.is_empty()).then_some(folder);
        }
        if let Some(is_pinned) = self.is_pinned {
            draft.is_pinned = is_pinned;
        }
        draft
    }
}

/// Trims and lowercases tags, dropping empties and repeats.
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

#[allow(clippy::ptr_arg)]
fn validate_tags(tags: &Vec<String>, _ctx: &()) -> garde::Result {
    match tags.iter().position(|t| t.chars().count() > MAX_TAG_CHARS) {
        Some(index) => Err(garde::Error::new(format!(
            "tag {} cannot be more than {} characters",
            index + 1,
            MAX_TAG_CHARS
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::validation::json::validate;

    fn create(title: &str, content: &str) -> CreateNoteRequest {
        CreateNoteRequest {
            title: title.into(),
            content: content.into(),
            tags: None,
            folder: None,
            is_pinned: None,
        }
    }

    fn draft() -> NoteDraft {
        NoteDraft {
            title: "Groceries".into(),
            content: "milk, eggs".into(),
            tags: vec!["home".into()],
            folder: Some("errands".into()),
            is_pinned: false,
        }
    }

    #[test]
    fn create_defaults_tags_and_pinned() {
        let draft = NoteDraft::from(create("Groceries", "milk, eggs").normalize());

        assert!(draft.tags.is_empty());
        assert!(!draft.is_pinned);
        assert_eq!(draft.folder, None);
    }

    #[test]
    fn blank_title_and_oversized_content_are_both_reported() {
        let req = create("   ", &"x".repeat(10_001)).normalize();

        let Err(AppError::Validation(errors)) = validate(&req) else {
            panic!("expected validation failure");
        };
        let mut reported: Vec<_> = errors
            .iter()
            .map(|e| (e.field.as_str(), e.message.as_str()))
            .collect();
        reported.sort();
        assert_eq!(
            reported,
            vec![("content", "Content too long"), ("title", "Title is required")]
        );
    }

    #[test]
    fn title_bound_counts_characters_not_bytes() {
        let req = create(&"é".repeat(100), "body").normalize();
        assert!(validate(&req).is_ok());
    }

    #[test]
    fn tags_are_lowercased_and_deduplicated() {
        let mut req = create("t", "c");
        req.tags = Some(vec![" Home ".into(), "home".into(), "".into(), "Work".into()]);

        assert_eq!(req.normalize().tags.unwrap(), vec!["home", "work"]);
    }

    #[test]
    fn long_tag_is_rejected() {
        let mut req = create("t", "c");
        req.tags = Some(vec!["ok".into(), "a".repeat(21)]);

        let Err(AppError::Validation(errors)) = validate(&req.normalize()) else {
            panic!("expected validation failure");
        };
        assert_eq!(errors[0].field, "tags");
        assert!(errors[0].message.contains("tag 2"));
    }

    #[test]
    fn empty_folder_on_create_means_none() {
        let mut req = create("t", "c");
        req.folder = Some("   ".into());

        assert_eq!(req.normalize().folder, None);
    }

    #[test]
    fn merge_touches_only_present_fields() {
        let changes = UpdateNoteRequest {
            is_pinned: Some(true),
            ..Default::default()
        };

        let merged = changes.merge_into(draft());
        assert!(merged.is_pinned);
        assert_eq!(merged.title, "Groceries");
        assert_eq!(merged.folder.as_deref(), Some("errands"));
    }

    #[test]
    fn empty_folder_on_update_clears_it() {
        let changes = UpdateNoteRequest {
            folder: Some(String::new()),
            ..Default::default()
        }
        .normalize();

        assert_eq!(changes.merge_into(draft()).folder, None);
    }

    #[test]
    fn update_rejects_empty_title() {
        let changes = UpdateNoteRequest {
            title: Some("  ".into()),
            ..Default::default()
        }
        .normalize();

        assert!(validate(&changes).is_err());
    }

    #[test]
    fn update_rejects_oversized_folder() {
        let changes = UpdateNoteRequest {
            folder: Some("f".repeat(51)),
            ..Default::default()
        }
        .normalize();

        let Err(AppError::Validation(errors)) = validate(&changes) else {
            panic!("expected validation failure");
        };
        assert_eq!(errors[0].field, "folder");
        assert_eq!(errors[0].message, "Folder too long");
    }

    #[test]
    fn merged_draft_passes_full_schema() {
        assert!(validate(&draft()).is_ok());
    }
}
