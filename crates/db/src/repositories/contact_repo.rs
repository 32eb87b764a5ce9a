//! Repository for the `contact_messages` table.

use sqlx::PgPool;

use crate::models::contact::{ContactMessage, CreateContactMessage};

const COLUMNS: &str = "id, name, email, phone, message, is_handled, created_at, updated_at";

pub struct ContactRepo;

impl ContactRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateContactMessage,
    ) -> Result<ContactMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO contact_messages (name, email, phone, message)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(input.name.trim())
            .bind(input.email.trim())
            .bind(&input.phone)
            .bind(input.message.trim())
            .fetch_one(pool)
            .await
    }

    /// Newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ContactMessage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contact_messages ORDER BY created_at DESC");
        sqlx::query_as::<_, ContactMessage>(&query)
            .fetch_all(pool)
            .await
    }
}
