use crate::controller::ApiResponse;
use crate::extractors::compare_api_version::CompareApiVersion;
use crate::params::ReorderParams;
use crate::{AppState, Error};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::{lesson as LessonApi, lessons, Id};
use log::*;
use service::config::ApiVersion;

/// INDEX the Lessons of a Module in display order
#[utoipa::path(
    get,
    path = "/modules/{id}/lessons",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Module"),
    ),
    responses(
        (status = 200, description = "Successfully retrieved the Lessons", body = [domain::lessons::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Module not found"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Lessons of Module {id}");

    let lessons = LessonApi::find_by_module_id(app_state.db_conn_ref(), id).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), lessons)))
}

/// POST a new Lesson at the end of a Module
#[utoipa::path(
    post,
    path = "/modules/{id}/lessons",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Module"),
    ),
    request_body = domain::lessons::Model,
    responses(
        (status = 201, description = "Successfully created the Lesson", body = domain::lessons::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Module not found"),
        (status = 422, description = "Blank title or negative duration"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn create(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(lesson_model): Json<lessons::Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a Lesson in Module {id} from: {lesson_model:?}");

    let lesson = LessonApi::create(app_state.db_conn_ref(), id, lesson_model).await?;
    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), lesson)))
}

/// PUT a new order for the Lessons of a Module
#[utoipa::path(
    put,
    path = "/modules/{id}/lessons/order",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Module"),
    ),
    request_body = ReorderParams,
    responses(
        (status = 200, description = "Successfully reordered the Lessons", body = [domain::lessons::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Module not found"),
        (status = 422, description = "The ids are not exactly the Module's lessons"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn reorder(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<ReorderParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT order of Lessons in Module {id}: {:?}", params.ordered_ids);

    let lessons = LessonApi::reorder(app_state.db_conn_ref(), id, params.ordered_ids).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), lessons)))
}
