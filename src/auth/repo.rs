use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Role tag, `tipo_usuario` on the wire and in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tipo_usuario")]
pub enum Role {
    #[sqlx(rename = "Cliente")]
    #[serde(rename = "Cliente")]
    Customer,
    #[sqlx(rename = "Empleado")]
    #[serde(rename = "Empleado")]
    Employee,
    #[sqlx(rename = "Administrador")]
    #[serde(rename = "Administrador")]
    Admin,
}

/// Login eligibility, `estado` on the wire and in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "estado_usuario")]
pub enum AccountStatus {
    #[sqlx(rename = "Activo")]
    #[serde(rename = "Activo")]
    Active,
    #[sqlx(rename = "Bloqueado")]
    #[serde(rename = "Bloqueado")]
    Blocked,
}

/// User record in the `usuarios` table. Rows only ever come out of the
/// database, so the struct serializes (secrets skipped) but never
/// deserializes.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub nombre: String,
    pub email: String,
    // NULL for accounts created through the Google flow
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub verificado: bool,
    pub estado: AccountStatus,
    pub tipo_usuario: Role,
    #[serde(skip_serializing)]
    pub verify_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_token_expires: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

const USER_COLUMNS: &str = "id, nombre, email, password_hash, verificado, estado, \
                            tipo_usuario, verify_token, reset_token, reset_token_expires, \
                            created_at";

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM usuarios WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Insert an unverified local account. A duplicate email surfaces as a
    /// unique-constraint violation from the database, there is no
    /// check-then-insert window.
    pub async fn create_local(
        db: &PgPool,
        nombre: &str,
        email: &str,
        password_hash: &str,
        role: Role,
        verify_token: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO usuarios (nombre, email, password_hash, verificado, tipo_usuario, verify_token)
            VALUES ($1, $2, $3, FALSE, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(nombre)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(verify_token)
        .fetch_one(db)
        .await
    }

    /// Find-or-create for an externally verified email. The insert is
    /// `ON CONFLICT DO NOTHING`, so concurrent callbacks for the same email
    /// settle on a single row.
    pub async fn find_or_create_oauth(
        db: &PgPool,
        email: &str,
        nombre: &str,
    ) -> anyhow::Result<User> {
        sqlx::query(
            r#"
            INSERT INTO usuarios (nombre, email, verificado)
            VALUES ($1, $2, TRUE)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(nombre)
        .bind(email)
        .execute(db)
        .await?;

        let user = Self::find_by_email(db, email)
            .await?
            .ok_or_else(|| anyhow::anyhow!("user vanished after oauth upsert"))?;
        Ok(user)
    }

    /// Consume a verification token: flips `verificado` and clears the token
    /// in one conditional update, so a second use matches zero rows.
    pub async fn consume_verify_token(db: &PgPool, token: &str) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE usuarios
            SET verificado = TRUE, verify_token = NULL
            WHERE verify_token = $1
            "#,
        )
        .bind(token)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_reset_token(
        db: &PgPool,
        email: &str,
        token: &str,
        expires: OffsetDateTime,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE usuarios
            SET reset_token = $1, reset_token_expires = $2
            WHERE email = $3
            "#,
        )
        .bind(token)
        .bind(expires)
        .bind(email)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Non-consuming check used by the reset form before asking for a new
    /// password.
    pub async fn reset_token_is_valid(db: &PgPool, token: &str) -> anyhow::Result<bool> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id FROM usuarios
            WHERE reset_token = $1 AND reset_token_expires > now()
            "#,
        )
        .bind(token)
        .fetch_optional(db)
        .await?;
        Ok(row.is_some())
    }

    /// Consume a reset token: swaps in the new hash and clears the token and
    /// expiry in one conditional update. Expired or already-used tokens
    /// match zero rows.
    pub async fn consume_reset_token(
        db: &PgPool,
        token: &str,
        new_password_hash: &str,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE usuarios
            SET password_hash = $1, reset_token = NULL, reset_token_expires = NULL
            WHERE reset_token = $2 AND reset_token_expires > now()
            "#,
        )
        .bind(new_password_hash)
        .bind(token)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_fields_never_serialize() {
        let user = User {
            id: Uuid::new_v4(),
            nombre: "Ana".into(),
            email: "ana@x.com".into(),
            password_hash: Some("$argon2id$fake".into()),
            verificado: false,
            estado: AccountStatus::Active,
            tipo_usuario: Role::Customer,
            verify_token: Some("verify-secret".into()),
            reset_token: Some("reset-secret".into()),
            reset_token_expires: Some(OffsetDateTime::now_utc()),
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("verify_token").is_none());
        assert!(json.get("reset_token").is_none());
        assert!(json.get("reset_token_expires").is_none());
        assert_eq!(json["email"], "ana@x.com");
        assert_eq!(json["tipo_usuario"], "Cliente");
    }
}
