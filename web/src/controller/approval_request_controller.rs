use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::approval_request::{
    ApprovalRequestSortField, ApproveParams, IndexParams, RejectParams,
};
use crate::params::WithSortDefaults;
use crate::{AppState, Error};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::access::CourseAccess;
use domain::error::Error as DomainError;
use domain::{approval_request as ApprovalRequestApi, approval_requests::Model, Id};
use log::*;
use service::config::ApiVersion;

/// INDEX Approval Requests matching the given filters
#[utoipa::path(
    get,
    path = "/approval_requests",
    params(ApiVersion, IndexParams),
    responses(
        (status = 200, description = "Successfully retrieved Approval Requests", body = [domain::approval_requests::Model]),
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
    State(app_state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Approval Requests with {params:?}");

    let mut params = params;
    IndexParams::apply_sort_defaults(
        &mut params.sort_by,
        &mut params.sort_order,
        ApprovalRequestSortField::CreatedAt,
    );

    let approval_requests = ApprovalRequestApi::find_by(app_state.db_conn_ref(), params).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), approval_requests)))
}

/// POST submit a Course, Module or Lesson for approval
#[utoipa::path(
    post,
    path = "/approval_requests",
    params(ApiVersion),
    request_body = domain::approval_requests::Model,
    responses(
        (status = 201, description = "Successfully submitted; the Course is now `Em aprovação`", body = domain::approval_requests::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only editors of the Course may submit it"),
        (status = 404, description = "Course not found"),
        (status = 422, description = "The Course, target or approver does not allow this request"),
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
    Json(request_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Submit an Approval Request from: {request_model:?}");

    let course_access = CourseAccess::load(app_state.db_conn_ref(), request_model.course_id).await?;
    if !course_access.can_edit(&user) {
        warn!(
            "User {} may not submit course {}",
            user.id, request_model.course_id
        );
        return Err(DomainError::forbidden().into());
    }

    let approval_request =
        ApprovalRequestApi::submit(app_state.db_conn_ref(), request_model, user.id).await?;
    Ok(Json(ApiResponse::new(
        StatusCode::CREATED.into(),
        approval_request,
    )))
}

/// GET an Approval Request by id
#[utoipa::path(
    get,
    path = "/approval_requests/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Approval Request id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved the Approval Request", body = domain::approval_requests::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Approval Request not found"),
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
    debug!("GET Approval Request by id: {id}");

    let approval_request = ApprovalRequestApi::find_by_id(app_state.db_conn_ref(), id).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), approval_request)))
}

/// PUT approve a pending Approval Request
#[utoipa::path(
    put,
    path = "/approval_requests/{id}/approve",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Approval Request to approve"),
    ),
    request_body(content = ApproveParams, description = "Optional reviewer comments"),
    responses(
        (status = 200, description = "Successfully approved the request", body = domain::approval_requests::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the approver of this request"),
        (status = 404, description = "Approval Request not found"),
        (status = 422, description = "The request is no longer pending"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn approve(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    params: Option<Json<ApproveParams>>,
) -> Result<impl IntoResponse, Error> {
    let Json(params) = params.unwrap_or_default();
    debug!("PUT approve Approval Request {id} by {}", user.id);

    let approval_request =
        ApprovalRequestApi::approve(app_state.db_conn_ref(), id, &user, params.comments).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), approval_request)))
}

/// PUT reject a pending Approval Request
#[utoipa::path(
    put,
    path = "/approval_requests/{id}/reject",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Approval Request to reject"),
    ),
    request_body = RejectParams,
    responses(
        (status = 200, description = "Successfully rejected the request", body = domain::approval_requests::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the approver of this request"),
        (status = 404, description = "Approval Request not found"),
        (status = 422, description = "Blank comments or the request is no longer pending"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn reject(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<RejectParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT reject Approval Request {id} by {}", user.id);

    let approval_request =
        ApprovalRequestApi::reject(app_state.db_conn_ref(), id, &user, params.comments).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), approval_request)))
}

/// DELETE withdraw a pending Approval Request
#[utoipa::path(
    delete,
    path = "/approval_requests/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Approval Request to withdraw"),
    ),
    responses(
        (status = 204, description = "Successfully withdrew the request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only the requester may withdraw"),
        (status = 404, description = "Approval Request not found"),
        (status = 422, description = "The request is no longer pending"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn delete(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE withdraw Approval Request {id} by {}", user.id);

    ApprovalRequestApi::withdraw(app_state.db_conn_ref(), id, &user).await?;
    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}
