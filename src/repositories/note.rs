use deadpool_postgres::Pool;
use tokio_postgres::types::ToSql;
use uuid::Uuid;

use crate::{
    error::Result,
    models::note::{Note, NoteFilter, Pagination},
    validation::note::NoteDraft,
};

const NOTE_COLUMNS: &str =
    "id, user_id, title, content, tags, folder, is_pinned, created_at, updated_at";

/// Single-note statements bind the note id as `$1` and the owner as `$2`.
const OWNED_NOTE: &str = "id = $1 AND user_id = $2";

type Param = Box<dyn ToSql + Sync + Send>;

/// A `WHERE` clause under construction. Always starts with the owner.
struct Scope {
    clauses: Vec<String>,
    params: Vec<Param>,
}

impl Scope {
    fn owner(user_id: Uuid) -> Self {
        let mut scope = Scope {
            clauses: Vec::new(),
            params: Vec::new(),
        };
        let owner = scope.bind(user_id);
        scope.and(format!("user_id = {owner}"));
        scope
    }

    /// Registers a parameter and returns its placeholder.
    fn bind<T: ToSql + Sync + Send + 'static>(&mut self, value: T) -> String {
        self.params.push(Box::new(value));
        format!("${}", self.params.len())
    }

    fn and(&mut self, clause: String) {
        self.clauses.push(clause);
    }

    fn where_sql(&self) -> String {
        self.clauses.join(" AND ")
    }

    fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect()
    }
}

/// A paged, ordered note query.
struct NoteSelect {
    scope: Scope,
    order_by: String,
}

impl NoteSelect {
    fn count_sql(&self) -> String {
        format!("SELECT COUNT(*) FROM notes WHERE {}", self.scope.where_sql())
    }

    fn page_sql(&mut self, pagination: Pagination) -> String {
        let where_sql = self.scope.where_sql();
        let limit = self.scope.bind(pagination.limit);
        let offset = self.scope.bind(pagination.offset());
        format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE {where_sql} ORDER BY {} LIMIT {limit} OFFSET {offset}",
            self.order_by
        )
    }
}

/// Owner plus the optional folder, tag and pinned filters; pinned first, then newest.
fn list_select(owner: Uuid, filter: &NoteFilter) -> NoteSelect {
    let mut scope = Scope::owner(owner);

    if let Some(folder) = &filter.folder {
        let p = scope.bind(folder.clone());
        scope.and(format!("folder = {p}"));
    }
    if !filter.tags.is_empty() {
        let p = scope.bind(filter.tags.clone());
        scope.and(format!("tags && {p}::text[]"));
    }
    if let Some(is_pinned) = filter.is_pinned {
        let p = scope.bind(is_pinned);
        scope.and(format!("is_pinned = {p}"));
    }

    NoteSelect {
        scope,
        order_by: "is_pinned DESC, updated_at DESC, id".to_string(),
    }
}

/// Owner plus a web-style full-text query; best rank first, then newest.
fn search_select(owner: Uuid, text: &str) -> NoteSelect {
    let mut scope = Scope::owner(owner);
    let p = scope.bind(text.to_string());
    let tsquery = format!("websearch_to_tsquery('english', {p})");
    scope.and(format!("search @@ {tsquery}"));

    NoteSelect {
        scope,
        order_by: format!("ts_rank(search, {tsquery}) DESC, updated_at DESC, id"),
    }
}

async fn fetch_page(
    pool: &Pool,
    mut select: NoteSelect,
    pagination: Pagination,
) -> Result<(Vec<Note>, i64)> {
    let client = pool.get().await?;

    let count_sql = select.count_sql();
    let total: i64 = {
        let params = select.scope.params();
        client.query_one(count_sql.as_str(), &params).await?.try_get(0)?
    };

    let page_sql = select.page_sql(pagination);
    let params = select.scope.params();
    let rows = client.query(page_sql.as_str(), &params).await?;

    let notes = rows
        .iter()
        .map(Note::try_from)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok((notes, total))
}

/// Inserts a new note.
pub async fn insert_note(pool: &Pool, id: Uuid, owner: Uuid, draft: &NoteDraft) -> Result<Note> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            &*format!(
                r#"
                INSERT INTO notes (id, user_id, title, content, tags, folder, is_pinned)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING {NOTE_COLUMNS}
                "#
            ),
            &[
                &id,
                &owner,
                &draft.title,
                &draft.content,
                &draft.tags,
                &draft.folder,
                &draft.is_pinned,
            ],
        )
        .await?;
    Ok(Note::try_from(&row)?)
}

/// Lists one page of the owner's notes matching `filter`, plus the total match count.
pub async fn list_notes(
    pool: &Pool,
    owner: Uuid,
    filter: &NoteFilter,
    pagination: Pagination,
) -> Result<(Vec<Note>, i64)> {
    fetch_page(pool, list_select(owner, filter), pagination).await
}

/// Full-text search over title, content and tags.
pub async fn search_notes(
    pool: &Pool,
    owner: Uuid,
    text: &str,
    pagination: Pagination,
) -> Result<(Vec<Note>, i64)> {
    fetch_page(pool, search_select(owner, text), pagination).await
}

/// Finds one of the owner's notes.
pub async fn find_note(pool: &Pool, owner: Uuid, id: Uuid) -> Result<Option<Note>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            &*format!("SELECT {NOTE_COLUMNS} FROM notes WHERE {OWNED_NOTE}"),
            &[&id, &owner],
        )
        .await?;
    Ok(row.as_ref().map(Note::try_from).transpose()?)
}

/// Overwrites the writable fields of one of the owner's notes.
///
/// Returns `None` if the note does not exist or belongs to someone else.
pub async fn update_note(
    pool: &Pool,
    owner: Uuid,
    id: Uuid,
    draft: &NoteDraft,
) -> Result<Option<Note>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            &*format!(
                r#"
                UPDATE notes
                SET title = $3, content = $4, tags = $5, folder = $6, is_pinned = $7,
                    updated_at = NOW()
                WHERE {OWNED_NOTE}
                RETURNING {NOTE_COLUMNS}
                "#
            ),
            &[
                &id,
                &owner,
                &draft.title,
                &draft.content,
                &draft.tags,
                &draft.folder,
                &draft.is_pinned,
            ],
        )
        .await?;
    Ok(row.as_ref().map(Note::try_from).transpose()?)
}

/// Deletes one of the owner's notes. Returns whether a row was removed.
pub async fn delete_note(pool: &Pool, owner: Uuid, id: Uuid) -> Result<bool> {
    let client = pool.get().await?;
    let deleted = client
        .execute(&*format!("DELETE FROM notes WHERE {OWNED_NOTE}"), &[&id, &owner])
        .await?;
    Ok(deleted > 0)
}

/// Distinct non-null folder names of the owner's notes.
pub async fn distinct_folders(pool: &Pool, owner: Uuid) -> Result<Vec<String>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT DISTINCT folder FROM notes
            WHERE user_id = $1 AND folder IS NOT NULL
            ORDER BY folder
            "#,
            &[&owner],
        )
        .await?;
    Ok(rows
        .iter()
        .map(|r| r.try_get::<_, String>(0))
        .collect::<std::result::Result<_, _>>()?)
}

/// Distinct tags across the owner's notes.
pub async fn distinct_tags(pool: &Pool, owner: Uuid) -> Result<Vec<String>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT DISTINCT tag FROM notes, unnest(tags) AS tag
            WHERE user_id = $1
            ORDER BY tag
            "#,
            &[&owner],
        )
        .await?;
    Ok(rows
        .iter()
        .map(|r| r.try_get::<_, String>(0))
        .collect::<std::result::Result<_, _>>()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfiltered_list_is_owner_scoped_only() {
        let select = list_select(Uuid::new_v4(), &NoteFilter::default());

        assert_eq!(select.count_sql(), "SELECT COUNT(*) FROM notes WHERE user_id = $1");
        assert_eq!(select.scope.params.len(), 1);
    }

    #[test]
    fn every_query_starts_from_the_owner() {
        let owner = Uuid::new_v4();
        let filtered = list_select(owner, &NoteFilter {
            folder: Some("recipes".into()),
            ..Default::default()
        });
        let search = search_select(owner, "milk");

        for select in [filtered, search] {
            assert!(select.scope.where_sql().starts_with("user_id = $1 AND "));
        }
        assert_eq!(OWNED_NOTE, "id = $1 AND user_id = $2");
    }

    #[test]
    fn every_filter_adds_one_parameter() {
        let filter = NoteFilter {
            folder: Some("recipes".into()),
            tags: vec!["home".into(), "work".into()],
            is_pinned: Some(true),
        };
        let select = list_select(Uuid::new_v4(), &filter);

        assert_eq!(
            select.scope.where_sql(),
            "user_id = $1 AND folder = $2 AND tags && $3::text[] AND is_pinned = $4"
        );
        assert_eq!(select.scope.params().len(), 4);
    }

    #[test]
    fn list_pages_pinned_first_then_recent() {
        let mut select = list_select(Uuid::new_v4(), &NoteFilter::default());
        let sql = select.page_sql(Pagination { page: 2, limit: 10 });

        assert!(sql.contains("WHERE user_id = $1 ORDER BY is_pinned DESC, updated_at DESC, id"));
        assert!(sql.ends_with("LIMIT $2 OFFSET $3"));
        assert_eq!(select.scope.params.len(), 3);
    }

    #[test]
    fn count_sql_excludes_paging_parameters() {
        let mut select = list_select(Uuid::new_v4(), &NoteFilter {
            is_pinned: Some(false),
            ..Default::default()
        });
        let count_before = select.count_sql();
        let _ = select.page_sql(Pagination::default());

        assert_eq!(count_before, select.count_sql());
    }

    #[test]
    fn search_ranks_by_relevance_then_recency() {
        let mut select = search_select(Uuid::new_v4(), "milk");
        let sql = select.page_sql(Pagination::default());

        assert!(sql.contains("search @@ websearch_to_tsquery('english', $2)"));
        assert!(sql.contains(
            "ORDER BY ts_rank(search, websearch_to_tsquery('english', $2)) DESC, updated_at DESC, id"
        ));
        assert!(sql.ends_with("LIMIT $3 OFFSET $4"));
    }
}
