use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::user::{IndexParams, ResetPasswordParams, RoleDepartmentParams, UserSortField};
use crate::params::WithSortDefaults;
use crate::{AppState, Error};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::{user as UserApi, users, Id};
use log::*;
use service::config::ApiVersion;

/// INDEX all Users
#[utoipa::path(
    get,
    path = "/admin/users",
    params(ApiVersion, IndexParams),
    responses(
        (status = 200, description = "Successfully retrieved all Users", body = [domain::users::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    let mut params = params;
    IndexParams::apply_sort_defaults(
        &mut params.sort_by,
        &mut params.sort_order,
        UserSortField::CreatedAt,
    );

    let users = UserApi::find_by(app_state.db_conn_ref(), params).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), users)))
}

/// CREATE a User
#[utoipa::path(
    post,
    path = "/admin/users",
    params(ApiVersion),
    request_body = domain::users::Model,
    responses(
        (status = 201, description = "User created successfully", body = domain::users::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Invalid or already used email, blank name or short password"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn create(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(admin): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(user_model): Json<users::Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a User {} by {}", user_model.email, admin.id);

    let user = UserApi::create(app_state.db_conn_ref(), user_model).await?;
    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), user)))
}

/// PUT the role and department of a User
#[utoipa::path(
    put,
    path = "/admin/users/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the User to update"),
    ),
    request_body = RoleDepartmentParams,
    responses(
        (status = 200, description = "Successfully updated the User", body = domain::users::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn update(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(_admin): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<RoleDepartmentParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT role/department of User {id}: {params:?}");

    let user = UserApi::update_role_and_department(
        app_state.db_conn_ref(),
        id,
        params.role,
        params.department_id,
    )
    .await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), user)))
}

/// PUT a new password for a User
#[utoipa::path(
    put,
    path = "/admin/users/{id}/password",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the User whose password is reset"),
    ),
    request_body = ResetPasswordParams,
    responses(
        (status = 204, description = "Successfully reset the password"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
        (status = 422, description = "Password too short"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn reset_password(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(admin): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<ResetPasswordParams>,
) -> Result<impl IntoResponse, Error> {
    info!("Password of User {id} reset by {}", admin.id);

    UserApi::reset_password(app_state.db_conn_ref(), id, params.password).await?;
    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}

/// DELETE a User
#[utoipa::path(
    delete,
    path = "/admin/users/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the User to delete"),
    ),
    responses(
        (status = 204, description = "User deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
        (status = 422, description = "Administrators cannot delete themselves"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn delete(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(admin): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    UserApi::delete(app_state.db_conn_ref(), &admin, id).await?;
    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}
