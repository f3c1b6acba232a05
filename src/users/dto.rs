use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::repo::{AccountStatus, Role};

/// Listing projection: hash and one-time tokens are never selected, so they
/// cannot leak through serialization.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserSummary {
    pub id: Uuid,
    pub nombre: String,
    pub email: String,
    pub tipo_usuario: Role,
    pub estado: AccountStatus,
    pub verificado: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateRoleRequest {
    pub tipo_usuario: Role,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateStatusRequest {
    pub estado: AccountStatus,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_serializes_spanish_enums() {
        let summary = UserSummary {
            id: Uuid::new_v4(),
            nombre: "Ana".into(),
            email: "ana@x.com".into(),
            tipo_usuario: Role::Employee,
            estado: AccountStatus::Blocked,
            verificado: false,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["tipo_usuario"], "Empleado");
        assert_eq!(json["estado"], "Bloqueado");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("reset_token").is_none());
    }

    #[test]
    fn status_request_parses_wire_values() {
        let req: UpdateStatusRequest =
            serde_json::from_str(r#"{"estado":"Bloqueado"}"#).unwrap();
        assert_eq!(req.estado, AccountStatus::Blocked);
        let bad: Result<UpdateStatusRequest, _> =
            serde_json::from_str(r#"{"estado":"Suspendido"}"#);
        assert!(bad.is_err());
    }
}
