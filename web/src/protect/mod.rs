//! Authorization middleware run in front of the controllers.
//!
//! Each submodule guards one resource. Guards resolve the record a request
//! points at, apply the rules of [`domain::access`] and answer 404 when the
//! record does not exist or 403 when the caller may not touch it. Role-only
//! rules are expressed as [`Check`]s combined through [`authorize`].

pub(crate) mod approval_requests;
pub(crate) mod course_modules;
pub(crate) mod courses;
pub(crate) mod dynamics;
pub(crate) mod lessons;

use crate::{extractors::authenticated_user::AuthenticatedUser, AppState};
use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::{roles::Role, users, Id};
use log::*;

/// A single authorization rule: is the authenticated user allowed to proceed?
///
/// ```rust,ignore
/// #[async_trait]
/// impl Check for UserIsAdmin {
///     async fn eval(&self, _app: &AppState, user: &users::Model, _args: Vec<Id>) -> bool {
///         user.role == Role::Admin
///     }
/// }
/// ```
#[async_trait]
pub trait Check: Send + Sync {
    async fn eval(&self, app: &AppState, user: &users::Model, args: Vec<Id>) -> bool;
}

/// A [`Check`] together with the arguments it is evaluated with.
pub(crate) struct Predicate {
    predicate: Box<dyn Check>,
    args: Vec<Id>,
}

impl Predicate {
    pub(crate) fn new<C: Check + 'static>(predicate: C, args: Vec<Id>) -> Self {
        Self {
            predicate: Box::new(predicate),
            args,
        }
    }

    pub(crate) async fn check(&self, app_state: &AppState, user: &users::Model) -> bool {
        self.predicate
            .eval(app_state, user, self.args.clone())
            .await
    }
}

/// Evaluates `checks` in order and answers 403 at the first one that fails.
pub(crate) async fn authorize(
    app_state: &AppState,
    authenticated_user: users::Model,
    request: Request,
    next: Next,
    checks: Vec<Predicate>,
) -> Response {
    for check in checks {
        if !check.check(app_state, &authenticated_user).await {
            return forbidden();
        }
    }
    next.run(request).await
}

pub struct UserIsAdmin;

#[async_trait]
impl Check for UserIsAdmin {
    async fn eval(
        &self,
        _app_state: &AppState,
        authenticated_user: &users::Model,
        _args: Vec<Id>,
    ) -> bool {
        authenticated_user.role == Role::Admin
    }
}

/// Only administrators may proceed.
pub(crate) async fn admin(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    let checks = vec![Predicate::new(UserIsAdmin, vec![])];
    authorize(&app_state, user, request, next, checks).await
}

pub(crate) fn forbidden() -> Response {
    (StatusCode::FORBIDDEN, "FORBIDDEN").into_response()
}

/// Turns a failed lookup of the guarded record into a response: 404 when it
/// does not exist, 500 otherwise.
pub(crate) fn lookup_failed(err: domain::error::Error, what: &str, id: Id) -> Response {
    if err.is_not_found() {
        debug!("{what} {id} not found");
        (StatusCode::NOT_FOUND, "NOT FOUND").into_response()
    } else {
        error!("Failed to load {what} {id}: {err:?}");
        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
    }
}
