use crate::params::{approval_request::IndexParams, IdPath};
use crate::protect::{forbidden, lookup_failed};
use crate::{extractors::authenticated_user::AuthenticatedUser, AppState};
use axum::{
    extract::{Path, Query, Request, State},
    middleware::Next,
    response::IntoResponse,
};
use domain::access::{self, CourseAccess};
use domain::approval_request as ApprovalRequestApi;
use log::*;

/// Non-administrators must narrow the list to requests they take part in:
/// their own as requester or approver, or those of a course they can view.
pub(crate) async fn index(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<IndexParams>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    if user.is_admin()
        || params.approver_id == Some(user.id)
        || params.requester_id == Some(user.id)
    {
        return next.run(request).await;
    }

    let Some(course_id) = params.course_id else {
        debug!("User {} listed approval requests without a scope", user.id);
        return forbidden();
    };
    match CourseAccess::load(app_state.db_conn_ref(), course_id).await {
        Ok(course_access) if course_access.can_view(&user) => next.run(request).await,
        Ok(_) => forbidden(),
        Err(err) => lookup_failed(err, "Course", course_id),
    }
}

/// The requester, the approver, administrators and the editors of the course.
pub(crate) async fn read(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(IdPath { id }): Path<IdPath>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    let db = app_state.db_conn_ref();
    let approval_request = match ApprovalRequestApi::find_by_id(db, id).await {
        Ok(approval_request) => approval_request,
        Err(err) => return lookup_failed(err.into(), "Approval request", id),
    };
    if approval_request.requester_id == user.id || access::can_review(&user, &approval_request) {
        return next.run(request).await;
    }

    match CourseAccess::load(db, approval_request.course_id).await {
        Ok(course_access) if course_access.can_edit(&user) => next.run(request).await,
        Ok(_) => forbidden(),
        Err(err) => lookup_failed(err, "Course", approval_request.course_id),
    }
}

/// Only the assigned approver or an administrator reviews a request.
pub(crate) async fn review(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(IdPath { id }): Path<IdPath>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    match ApprovalRequestApi::find_by_id(app_state.db_conn_ref(), id).await {
        Ok(approval_request) if access::can_review(&user, &approval_request) => {
            next.run(request).await
        }
        Ok(_) => {
            warn!("User {} is not the approver of request {id}", user.id);
            forbidden()
        }
        Err(err) => lookup_failed(err.into(), "Approval request", id),
    }
}
