use crate::controller::ApiResponse;
use crate::extractors::compare_api_version::CompareApiVersion;
use crate::params::course_module::UpdateParams;
use crate::{AppState, Error};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::{course_module as CourseModuleApi, Id};
use log::*;
use service::config::ApiVersion;

/// PUT the title or description of a Module
#[utoipa::path(
    put,
    path = "/modules/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Module to update"),
    ),
    request_body = UpdateParams,
    responses(
        (status = 200, description = "Successfully updated the Module", body = domain::course_modules::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Module not found"),
        (status = 422, description = "Blank title"),
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
    debug!("PUT Module {id} with {params:?}");

    let module = CourseModuleApi::update(app_state.db_conn_ref(), id, params).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), module)))
}

/// DELETE a Module and its Lessons
#[utoipa::path(
    delete,
    path = "/modules/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Module to delete"),
    ),
    responses(
        (status = 204, description = "Successfully deleted the Module"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Module not found"),
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
    debug!("DELETE Module by id: {id}");

    CourseModuleApi::delete(app_state.db_conn_ref(), id).await?;
    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}
