use deadpool_postgres::Pool;
use uuid::Uuid;
use crate::{
    error::Result,
    models::user::User,
};

const USER_COLUMNS: &str = "id, email, name, password, created_at, updated_at";

/// Creates a new user in the database.
///
/// Returns `None` when the email is already registered.
pub async fn create_user(
    pool: &Pool,
    id: Uuid,
    email: &str,
    name: &str,
    password_hash: &str,
) -> Result<Option<User>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            &*format!(
                r#"
                INSERT INTO users (id, email, name, password)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (email) DO NOTHING
                RETURNING {USER_COLUMNS}
                "#
            ),
            &[&id, &email, &name, &password_hash],
        )
        .await?;
    Ok(row.as_ref().map(User::try_from).transpose()?)
}

/// Finds a user by their email address.
pub async fn find_by_email(pool: &Pool, email: &str) -> Result<Option<User>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            &*format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"),
            &[&email],
        )
        .await?;
    Ok(row.as_ref().map(User::try_from).transpose()?)
}

/// Finds a user by their ID.
pub async fn find_by_id(pool: &Pool, user_id: Uuid) -> Result<Option<User>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            &*format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"),
            &[&user_id],
        )
        .await?;
    Ok(row.as_ref().map(User::try_from).transpose()?)
}
