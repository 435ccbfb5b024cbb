use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::dynamic::IndexParams;
use crate::{AppState, Error};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::{dynamic as DynamicApi, dynamics::Model, Id};
use log::*;
use service::config::ApiVersion;

/// INDEX the dynamics bank, optionally filtered
#[utoipa::path(
    get,
    path = "/dynamics",
    params(ApiVersion, IndexParams),
    responses(
        (status = 200, description = "Successfully searched the dynamics bank", body = [domain::dynamics::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Group size below 1 or negative duration"),
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
    debug!("GET Dynamics with {params:?}");

    let dynamics = DynamicApi::search(app_state.db_conn_ref(), params.into()).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), dynamics)))
}

/// POST a new Dynamic to the bank
#[utoipa::path(
    post,
    path = "/dynamics",
    params(ApiVersion),
    request_body = domain::dynamics::Model,
    responses(
        (status = 201, description = "Successfully created the Dynamic", body = domain::dynamics::Model),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Blank title, negative duration or inconsistent participant range"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn create(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(dynamic_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a Dynamic from: {dynamic_model:?}");

    let dynamic = DynamicApi::create(app_state.db_conn_ref(), dynamic_model, user.id).await?;
    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), dynamic)))
}

/// GET a Dynamic by id
#[utoipa::path(
    get,
    path = "/dynamics/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Dynamic id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved the Dynamic", body = domain::dynamics::Model),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Dynamic not found"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn read(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Dynamic by id: {id}");

    let dynamic = DynamicApi::find_by_id(app_state.db_conn_ref(), id).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), dynamic)))
}

/// PUT a Dynamic
#[utoipa::path(
    put,
    path = "/dynamics/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Dynamic to update"),
    ),
    request_body = domain::dynamics::Model,
    responses(
        (status = 200, description = "Successfully updated the Dynamic", body = domain::dynamics::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only the author or an administrator may change it"),
        (status = 404, description = "Dynamic not found"),
        (status = 422, description = "Blank title, negative duration or inconsistent participant range"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn update(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(dynamic_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Dynamic {id} with {dynamic_model:?}");

    let dynamic = DynamicApi::update(app_state.db_conn_ref(), id, dynamic_model).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), dynamic)))
}

/// DELETE a Dynamic
#[utoipa::path(
    delete,
    path = "/dynamics/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Dynamic to delete"),
    ),
    responses(
        (status = 204, description = "Successfully deleted the Dynamic"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only the author or an administrator may delete it"),
        (status = 404, description = "Dynamic not found"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn delete(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Dynamic by id: {id}");

    DynamicApi::delete(app_state.db_conn_ref(), id).await?;
    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}
