use serde::{Deserialize, Serialize};

use crate::auth::repo::Role;

/// Request body for `POST /register`. Wire names match the storefront.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub nombre: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub tipo_usuario: Option<Role>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login payload, signed bearer token included.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub tipo_usuario: Role,
    pub verificado: bool,
    pub email: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_defaults_role() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"nombre":"Ana","email":"ana@x.com","password":"pw123456"}"#,
        )
        .unwrap();
        assert!(req.tipo_usuario.is_none());

        let req: RegisterRequest = serde_json::from_str(
            r#"{"nombre":"Luis","email":"l@x.com","password":"pw123456","tipo_usuario":"Empleado"}"#,
        )
        .unwrap();
        assert_eq!(req.tipo_usuario, Some(Role::Employee));
    }

    #[test]
    fn register_request_rejects_unknown_fields() {
        let res: Result<RegisterRequest, _> = serde_json::from_str(
            r#"{"nombre":"Ana","email":"a@x.com","password":"pw","admin":true}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn login_response_uses_spanish_wire_names() {
        let body = LoginResponse {
            success: true,
            message: "Inicio de sesión exitoso".into(),
            tipo_usuario: Role::Customer,
            verificado: true,
            email: "ana@x.com".into(),
            token: "jwt".into(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["tipo_usuario"], "Cliente");
        assert_eq!(json["verificado"], true);
        assert_eq!(json["success"], true);
    }
}
