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
use domain::{course_module as CourseModuleApi, course_modules, Id};
use log::*;
use service::config::ApiVersion;

/// INDEX the Modules of a Course in display order
#[utoipa::path(
    get,
    path = "/courses/{id}/modules",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Course"),
    ),
    responses(
        (status = 200, description = "Successfully retrieved the Modules", body = [domain::course_modules::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Course not found"),
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
    debug!("GET Modules of Course {id}");

    let modules = CourseModuleApi::find_by_course_id(app_state.db_conn_ref(), id).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), modules)))
}

/// POST a new Module at the end of a Course
#[utoipa::path(
    post,
    path = "/courses/{id}/modules",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Course"),
    ),
    request_body = domain::course_modules::Model,
    responses(
        (status = 201, description = "Successfully created the Module", body = domain::course_modules::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Course not found"),
        (status = 422, description = "Blank title"),
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
    Json(module_model): Json<course_modules::Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a Module in Course {id} from: {module_model:?}");

    let module = CourseModuleApi::create(app_state.db_conn_ref(), id, module_model).await?;
    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), module)))
}

/// PUT a new order for the Modules of a Course
#[utoipa::path(
    put,
    path = "/courses/{id}/modules/order",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Course"),
    ),
    request_body = ReorderParams,
    responses(
        (status = 200, description = "Successfully reordered the Modules", body = [domain::course_modules::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Course not found"),
        (status = 422, description = "The ids are not exactly the Course's modules"),
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
    debug!("PUT order of Modules in Course {id}: {:?}", params.ordered_ids);

    let modules = CourseModuleApi::reorder(app_state.db_conn_ref(), id, params.ordered_ids).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), modules)))
}
