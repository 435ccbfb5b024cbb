use crate::controller::ApiResponse;
use crate::extractors::compare_api_version::CompareApiVersion;
use crate::params::lesson::{MoveParams, StatusParams, UpdateParams};
use crate::{AppState, Error};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::{lesson as LessonApi, Id};
use log::*;
use service::config::ApiVersion;

/// PUT changes to a Lesson
#[utoipa::path(
    put,
    path = "/lessons/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Lesson to update"),
    ),
    request_body = UpdateParams,
    responses(
        (status = 200, description = "Successfully updated the Lesson", body = domain::lessons::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Lesson not found"),
        (status = 422, description = "Blank title or negative duration"),
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
    Json(params): Json<UpdateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Lesson {id} with {params:?}");

    let lesson = LessonApi::update(app_state.db_conn_ref(), id, params).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), lesson)))
}

/// PUT the production status of a Lesson
#[utoipa::path(
    put,
    path = "/lessons/{id}/status",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Lesson to update"),
        ("value" = domain::lesson_status::LessonStatus, Query, description = "The new status, e.g. `Fazendo`"),
    ),
    responses(
        (status = 200, description = "Successfully updated the Lesson status", body = domain::lessons::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Lesson not found"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn update_status(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Query(status): Query<StatusParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Lesson {id} status to {}", status.value);

    let lesson = LessonApi::update_status(app_state.db_conn_ref(), id, status.value).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), lesson)))
}

/// PUT a Lesson at the end of another Module of the same Course
#[utoipa::path(
    put,
    path = "/lessons/{id}/module",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Lesson to move"),
    ),
    request_body = MoveParams,
    responses(
        (status = 200, description = "Successfully moved the Lesson", body = domain::lessons::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Lesson not found"),
        (status = 422, description = "Target module missing or in another Course"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn move_to_module(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<MoveParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Lesson {id} into Module {}", params.module_id);

    let lesson = LessonApi::move_to_module(app_state.db_conn_ref(), id, params.module_id).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), lesson)))
}

/// DELETE a Lesson
#[utoipa::path(
    delete,
    path = "/lessons/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Lesson to delete"),
    ),
    responses(
        (status = 204, description = "Successfully deleted the Lesson"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Lesson not found"),
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
    debug!("DELETE Lesson by id: {id}");

    LessonApi::delete(app_state.db_conn_ref(), id).await?;
    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}
