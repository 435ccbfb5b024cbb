use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::user::{IndexParams, UpdateParams, UpdatePasswordParams, UserSortField};
use crate::params::WithSortDefaults;
use crate::{AppState, Error};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::user as UserApi;
use log::*;
use service::config::ApiVersion;

/// GET the profile of the logged in user
#[utoipa::path(
    get,
    path = "/users/me",
    params(ApiVersion),
    responses(
        (status = 200, description = "Successfully retrieved the current User", body = domain::users::Model),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn read(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, Error> {
    debug!("GET current User {}", user.id);
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), user)))
}

/// PUT the profile fields of the logged in user
#[utoipa::path(
    put,
    path = "/users/me",
    params(ApiVersion),
    request_body = UpdateParams,
    responses(
        (status = 200, description = "Successfully updated the current User", body = domain::users::Model),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Blank first or last name"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn update(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(params): Json<UpdateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT profile of User {} with {params:?}", user.id);

    let updated = UserApi::update(app_state.db_conn_ref(), user.id, params).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), updated)))
}

/// PUT a new password for the logged in user
#[utoipa::path(
    put,
    path = "/users/me/password",
    params(ApiVersion),
    request_body = UpdatePasswordParams,
    responses(
        (status = 204, description = "Successfully changed the password"),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Wrong current password or new password too short"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn update_password(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(params): Json<UpdatePasswordParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT password of User {}", user.id);

    UserApi::update_password(
        app_state.db_conn_ref(),
        user.id,
        params.current_password,
        params.new_password,
    )
    .await?;
    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}

/// INDEX Users, e.g. to pick an approver or collaborators
#[utoipa::path(
    get,
    path = "/users",
    params(ApiVersion, IndexParams),
    responses(
        (status = 200, description = "Successfully retrieved Users", body = [domain::users::Model]),
        (status = 401, description = "Unauthorized"),
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
    debug!("GET all Users with {params:?}");

    let mut params = params;
    IndexParams::apply_sort_defaults(
        &mut params.sort_by,
        &mut params.sort_order,
        UserSortField::LastName,
    );

    let users = UserApi::find_by(app_state.db_conn_ref(), params).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), users)))
}
