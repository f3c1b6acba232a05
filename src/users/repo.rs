use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo::{AccountStatus, Role};
use crate::users::dto::UserSummary;

pub async fn list_users(db: &PgPool) -> anyhow::Result<Vec<UserSummary>> {
    let rows = sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT id, nombre, email, tipo_usuario, estado, verificado
        FROM usuarios
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Each mutation reports whether the row existed; unknown ids become 404s
/// instead of the silent success the old backend reported.
pub async fn update_role(db: &PgPool, id: Uuid, role: Role) -> anyhow::Result<bool> {
    let result = sqlx::query("UPDATE usuarios SET tipo_usuario = $1 WHERE id = $2")
        .bind(role)
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn update_status(db: &PgPool, id: Uuid, estado: AccountStatus) -> anyhow::Result<bool> {
    let result = sqlx::query("UPDATE usuarios SET estado = $1 WHERE id = $2")
        .bind(estado)
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_user(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM usuarios WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
