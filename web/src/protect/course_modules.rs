use crate::params::IdPath;
use crate::protect::courses::{guard, CourseRight};
use crate::protect::lookup_failed;
use crate::{extractors::authenticated_user::AuthenticatedUser, AppState};
use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::{course_module as CourseModuleApi, users, Id};

async fn guard_module(
    app_state: &AppState,
    user: &users::Model,
    module_id: Id,
    right: CourseRight,
    request: Request,
    next: Next,
) -> Response {
    match CourseModuleApi::find_by_id(app_state.db_conn_ref(), module_id).await {
        Ok(module) => guard(app_state, user, module.course_id, right, request, next).await,
        Err(err) => lookup_failed(err.into(), "Module", module_id),
    }
}

/// Anyone who can view the module's course.
pub(crate) async fn read(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(IdPath { id }): Path<IdPath>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    guard_module(&app_state, &user, id, CourseRight::View, request, next).await
}

/// Anyone who can edit the module's course.
pub(crate) async fn update(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(IdPath { id }): Path<IdPath>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    guard_module(&app_state, &user, id, CourseRight::Edit, request, next).await
}
