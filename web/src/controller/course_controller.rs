use serde::Deserialize;
use utoipa::ToSchema;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::course::{IndexParams, StatusParams, UpdateParams};
use crate::{AppState, Error};
use domain::{course as CourseApi, courses::Model, Id};
use log::*;
use service::config::ApiVersion;

/// Request body for creating a course.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CourseRequest {
    #[serde(flatten)]
    pub course: Model,
    /// Users who may edit the course besides its creator.
    #[schema(value_type = Option<Vec<Uuid>>)]
    pub collaborator_ids: Option<Vec<Id>>,
}

/// INDEX the Courses visible to the logged in user
#[utoipa::path(
    get,
    path = "/courses",
    params(ApiVersion, IndexParams),
    responses(
        (status = 200, description = "Successfully retrieved visible Courses, most recently updated first", body = [domain::courses::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Courses visible to {} with {params:?}", user.id);

    let courses =
        CourseApi::find_visible_to(app_state.db_conn_ref(), &user, params.into()).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), courses)))
}

/// POST create a new Course owned by the logged in user
#[utoipa::path(
    post,
    path = "/courses",
    params(ApiVersion),
    request_body = CourseRequest,
    responses(
        (status = 201, description = "Successfully created a new Course", body = domain::courses::Model),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Unprocessable Entity"),
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
    Json(request): Json<CourseRequest>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a new Course from: {:?}", request.course);

    let course = CourseApi::create(
        app_state.db_conn_ref(),
        request.course,
        user.id,
        request.collaborator_ids,
    )
    .await?;
    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), course)))
}

/// GET a Course with its collaborators, modules and lessons
#[utoipa::path(
    get,
    path = "/courses/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Course id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved the Course", body = domain::course::CourseDetail),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Course not found"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn read(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Course by id: {id}");

    let course_detail = CourseApi::find_detail(app_state.db_conn_ref(), id).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), course_detail)))
}

/// PUT the descriptive fields of a Course
#[utoipa::path(
    put,
    path = "/courses/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Course to update"),
    ),
    request_body = UpdateParams,
    responses(
        (status = 200, description = "Successfully updated the Course", body = domain::courses::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Course not found"),
        (status = 422, description = "Blank name"),
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
    debug!("PUT Course {id} with {params:?}");

    let course = CourseApi::update(app_state.db_conn_ref(), id, params).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), course)))
}

/// PUT the status of a Course
#[utoipa::path(
    put,
    path = "/courses/{id}/status",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Course to update"),
        ("value" = domain::course_status::CourseStatus, Query, description = "The new status, e.g. `Em andamento`"),
    ),
    responses(
        (status = 200, description = "Successfully updated the Course status", body = domain::courses::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Course not found"),
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
    debug!("PUT Course {id} status to {}", status.value);

    let course = CourseApi::update_status(app_state.db_conn_ref(), id, status.value).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), course)))
}

/// POST a copy of a Course, its modules and lessons, owned by the logged in user
#[utoipa::path(
    post,
    path = "/courses/{id}/duplicate",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Course to copy"),
    ),
    responses(
        (status = 201, description = "Successfully copied the Course", body = domain::courses::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Course not found"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn duplicate(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST duplicate Course {id} for {}", user.id);

    let copy = CourseApi::duplicate(app_state.db_conn_ref(), id, user.id).await?;
    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), copy)))
}

/// DELETE a Course with everything it contains
#[utoipa::path(
    delete,
    path = "/courses/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Course to delete"),
    ),
    responses(
        (status = 204, description = "Successfully deleted the Course"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Course not found"),
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
    debug!("DELETE Course by id: {id}");

    CourseApi::delete(app_state.db_conn_ref(), id).await?;
    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}
