use crate::controller::ApiResponse;
use crate::extractors::compare_api_version::CompareApiVersion;
use crate::params::course::CollaboratorsParams;
use crate::{AppState, Error};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::{course as CourseApi, Id};
use log::*;
use service::config::ApiVersion;

/// INDEX the collaborators of a Course
#[utoipa::path(
    get,
    path = "/courses/{id}/collaborators",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Course"),
    ),
    responses(
        (status = 200, description = "Successfully retrieved the collaborators", body = [domain::users::Model]),
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
    debug!("GET collaborators of Course {id}");

    let collaborators = CourseApi::collaborators(app_state.db_conn_ref(), id).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), collaborators)))
}

/// PUT the complete set of collaborators of a Course
#[utoipa::path(
    put,
    path = "/courses/{id}/collaborators",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Course"),
    ),
    request_body = CollaboratorsParams,
    responses(
        (status = 200, description = "Successfully replaced the collaborators; returns their ids", body = [String]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Course not found"),
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
    Json(params): Json<CollaboratorsParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT collaborators of Course {id}: {:?}", params.user_ids);

    let collaborator_ids =
        CourseApi::set_collaborators(app_state.db_conn_ref(), id, params.user_ids).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), collaborator_ids)))
}

/// POST a single collaborator to a Course
#[utoipa::path(
    post,
    path = "/courses/{id}/collaborators/{user_id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Course"),
        ("user_id" = Uuid, Path, description = "Id of the User to add"),
    ),
    responses(
        (status = 201, description = "Successfully added the collaborator; returns all collaborator ids", body = [String]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Course or User not found"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn create(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path((id, user_id)): Path<(Id, Id)>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST collaborator {user_id} to Course {id}");

    let collaborator_ids = CourseApi::add_collaborator(app_state.db_conn_ref(), id, user_id).await?;
    Ok(Json(ApiResponse::new(
        StatusCode::CREATED.into(),
        collaborator_ids,
    )))
}

/// DELETE a single collaborator from a Course
#[utoipa::path(
    delete,
    path = "/courses/{id}/collaborators/{user_id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Course"),
        ("user_id" = Uuid, Path, description = "Id of the User to remove"),
    ),
    responses(
        (status = 204, description = "Successfully removed the collaborator"),
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
    Path((id, user_id)): Path<(Id, Id)>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE collaborator {user_id} from Course {id}");

    CourseApi::remove_collaborator(app_state.db_conn_ref(), id, user_id).await?;
    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}
