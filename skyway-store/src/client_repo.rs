use sqlx::PgPool;

use skyway_domain::client::{Client, Role};

use crate::{is_unique_violation, StoreError, StoreResult};

pub struct ClientRepository {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct ClientRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    role: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl ClientRow {
    fn into_client(self) -> StoreResult<Client> {
        Ok(Client {
            id: self.id,
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            role: Role::parse(&self.role)?,
            created_at: self.created_at,
        })
    }
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        first_name: &str,
        last_name: &str,
    ) -> StoreResult<Client> {
        let row = sqlx::query_as::<_, ClientRow>(
            r#"
            INSERT INTO clients (username, email, password_hash, first_name, last_name, role)
            VALUES ($1, $2, $3, $4, $5, 'client')
            RETURNING id, username, email, password_hash, first_name, last_name, role, created_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(first_name)
        .bind(last_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Conflict("username or email is already registered".to_string())
            } else {
                StoreError::Database(e)
            }
        })?;

        row.into_client()
    }

    /// Returns the client plus the stored password hash for verification.
    pub async fn find_by_email(&self, email: &str) -> StoreResult<Option<(Client, String)>> {
        let row = sqlx::query_as::<_, ClientRow>(
            "SELECT id, username, email, password_hash, first_name, last_name, role, created_at
             FROM clients WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => {
                let hash = r.password_hash.clone();
                Ok(Some((r.into_client()?, hash)))
            }
            None => Ok(None),
        }
    }

    pub async fn find_by_id(&self, id: i64) -> StoreResult<Client> {
        let row = sqlx::query_as::<_, ClientRow>(
            "SELECT id, username, email, password_hash, first_name, last_name, role, created_at
             FROM clients WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("client"))?;

        row.into_client()
    }
}
