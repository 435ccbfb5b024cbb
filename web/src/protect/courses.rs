use crate::params::IdPath;
use crate::protect::{forbidden, lookup_failed};
use crate::{extractors::authenticated_user::AuthenticatedUser, AppState};
use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::access::CourseAccess;
use domain::{users, Id};
use log::*;

/// What a request wants to do with a course.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum CourseRight {
    View,
    Edit,
    /// Deleting the course or changing who collaborates on it.
    Own,
}

/// Lets the request through when `user` holds `right` on the course.
pub(crate) async fn guard(
    app_state: &AppState,
    user: &users::Model,
    course_id: Id,
    right: CourseRight,
    request: Request,
    next: Next,
) -> Response {
    let access = match CourseAccess::load(app_state.db_conn_ref(), course_id).await {
        Ok(access) => access,
        Err(err) => return lookup_failed(err, "Course", course_id),
    };

    let allowed = match right {
        CourseRight::View => access.can_view(user),
        CourseRight::Edit => access.can_edit(user),
        CourseRight::Own => access.can_delete(user),
    };
    if allowed {
        next.run(request).await
    } else {
        warn!("User {} denied {right:?} on course {course_id}", user.id);
        forbidden()
    }
}

/// Creator, collaborators, administrators and members of the course's department.
pub(crate) async fn read(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(IdPath { id }): Path<IdPath>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    guard(&app_state, &user, id, CourseRight::View, request, next).await
}

/// Creator, collaborators and administrators.
pub(crate) async fn update(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(IdPath { id }): Path<IdPath>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    guard(&app_state, &user, id, CourseRight::Edit, request, next).await
}

/// Creator and administrators.
pub(crate) async fn own(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(IdPath { id }): Path<IdPath>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    guard(&app_state, &user, id, CourseRight::Own, request, next).await
}
