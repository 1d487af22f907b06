use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::note::{Note, NoteFilter, NotePage, PageInfo, Pagination},
    repositories::note as note_repo,
    state::AppState,
    validation::{
        json::validate,
        note::{CreateNoteRequest, NoteDraft, UpdateNoteRequest},
    },
};

/// Creates a new note owned by `owner`.
pub async fn create_note(state: &AppState, owner: Uuid, req: CreateNoteRequest) -> Result<Note> {
    let draft = NoteDraft::from(req);
    let note = note_repo::insert_note(&state.db, Uuid::new_v4(), owner, &draft).await?;
    tracing::info!("📝 Note {} created for user {}", note.id, owner);
    Ok(note)
}

/// Lists one page of the owner's notes, pinned first.
pub async fn list_notes(
    state: &AppState,
    owner: Uuid,
    filter: &NoteFilter,
    pagination: Pagination,
) -> Result<NotePage> {
    let (notes, total) = note_repo::list_notes(&state.db, owner, filter, pagination).await?;
    Ok(NotePage {
        notes,
        pagination: PageInfo::new(pagination, total),
    })
}

/// Full-text search over the owner's notes.
pub async fn search_notes(
    state: &AppState,
    owner: Uuid,
    text: &str,
    pagination: Pagination,
) -> Result<NotePage> {
    let (notes, total) = note_repo::search_notes(&state.db, owner, text, pagination).await?;
    Ok(NotePage {
        notes,
        pagination: PageInfo::new(pagination, total),
    })
}

/// Gets one of the owner's notes.
pub async fn get_note(state: &AppState, owner: Uuid, id: Uuid) -> Result<Note> {
    note_repo::find_note(&state.db, owner, id)
        .await?
        .ok_or(AppError::NotFound("Note"))
}

/// Applies a partial update to one of the owner's notes.
///
/// The merged note is validated against the full note schema before it is
/// written, so a stored note always satisfies every bound.
pub async fn update_note(
    state: &AppState,
    owner: Uuid,
    id: Uuid,
    changes: UpdateNoteRequest,
) -> Result<Note> {
    let current = get_note(state, owner, id).await?;

    let draft = changes.merge_into(NoteDraft {
        title: current.title,
        content: current.content,
        tags: current.tags,
        folder: current.folder,
        is_pinned: current.is_pinned,
    });
    validate(&draft)?;

    let note = note_repo::update_note(&state.db, owner, id, &draft)
        .await?
        .ok_or(AppError::NotFound("Note"))?;

    tracing::info!("📝 Note {} updated", note.id);
    Ok(note)
}

/// Deletes one of the owner's notes.
pub async fn delete_note(state: &AppState, owner: Uuid, id: Uuid) -> Result<()> {
    if !note_repo::delete_note(&state.db, owner, id).await? {
        return Err(AppError::NotFound("Note"));
    }
    tracing::info!("🗑️ Note {} deleted", id);
    Ok(())
}

/// Distinct folder names in use by the owner.
pub async fn folders(state: &AppState, owner: Uuid) -> Result<Vec<String>> {
    note_repo::distinct_folders(&state.db, owner).await
}

/// Distinct tags in use by the owner.
pub async fn tags(state: &AppState, owner: Uuid) -> Result<Vec<String>> {
    note_repo::distinct_tags(&state.db, owner).await
}
