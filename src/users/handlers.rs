use axum::{
    extract::{Path, State},
    routing::{delete, get, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::jwt::AdminUser,
    error::{AppError, AppResult},
    state::AppState,
    users::dto::{SuccessResponse, UpdateRoleRequest, UpdateStatusRequest, UserSummary},
    users::repo,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/usuarios", get(list_users))
        .route("/usuarios/:id/rol", put(update_role))
        .route("/usuarios/:id/estado", put(update_status))
        .route("/usuarios/:id", delete(delete_user))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
) -> AppResult<Json<Vec<UserSummary>>> {
    let users = repo::list_users(&state.db).await?;
    Ok(Json(users))
}

#[instrument(skip(state, payload))]
pub async fn update_role(
    State(state): State<AppState>,
    AdminUser(claims): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> AppResult<Json<SuccessResponse>> {
    let updated = repo::update_role(&state.db, id, payload.tipo_usuario).await?;
    if !updated {
        return Err(AppError::NotFound("Usuario no encontrado".into()));
    }
    info!(user_id = %id, by = %claims.sub, role = ?payload.tipo_usuario, "role updated");
    Ok(Json(SuccessResponse {
        success: true,
        message: "Rol actualizado correctamente".into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_status(
    State(state): State<AppState>,
    AdminUser(claims): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<SuccessResponse>> {
    let updated = repo::update_status(&state.db, id, payload.estado).await?;
    if !updated {
        return Err(AppError::NotFound("Usuario no encontrado".into()));
    }
    info!(user_id = %id, by = %claims.sub, estado = ?payload.estado, "status updated");
    Ok(Json(SuccessResponse {
        success: true,
        message: "Estado actualizado correctamente".into(),
    }))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(claims): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SuccessResponse>> {
    let deleted = repo::delete_user(&state.db, id).await?;
    if !deleted {
        return Err(AppError::NotFound("Usuario no encontrado".into()));
    }
    info!(user_id = %id, by = %claims.sub, "user deleted");
    Ok(Json(SuccessResponse {
        success: true,
        message: "Usuario eliminado correctamente".into(),
    }))
}
