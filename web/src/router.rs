use crate::{
    controller::health_check_controller, middleware::auth::require_auth, params, protect, AppState,
};
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};

use crate::controller::{
    admin, approval_request_controller, course, course_controller, course_module,
    course_module_controller, department_controller, dynamic_controller, lesson_controller,
    user_controller, user_session_controller,
};

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// Global OpenAPI document. A path or schema only shows up in RapiDoc
// once it is listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Learning Platform API"
        ),
        paths(
            admin::user_controller::index,
            admin::user_controller::create,
            admin::user_controller::update,
            admin::user_controller::reset_password,
            admin::user_controller::delete,
            approval_request_controller::index,
            approval_request_controller::create,
            approval_request_controller::read,
            approval_request_controller::approve,
            approval_request_controller::reject,
            approval_request_controller::delete,
            course_controller::index,
            course_controller::create,
            course_controller::read,
            course_controller::update,
            course_controller::update_status,
            course_controller::duplicate,
            course_controller::delete,
            course::collaborator_controller::index,
            course::collaborator_controller::update,
            course::collaborator_controller::create,
            course::collaborator_controller::delete,
            course::module_controller::index,
            course::module_controller::create,
            course::module_controller::reorder,
            course_module_controller::update,
            course_module_controller::delete,
            course_module::lesson_controller::index,
            course_module::lesson_controller::create,
            course_module::lesson_controller::reorder,
            department_controller::index,
            department_controller::read,
            department_controller::create,
            department_controller::update,
            department_controller::delete,
            dynamic_controller::index,
            dynamic_controller::create,
            dynamic_controller::read,
            dynamic_controller::update,
            dynamic_controller::delete,
            health_check_controller::health_check,
            lesson_controller::update,
            lesson_controller::update_status,
            lesson_controller::move_to_module,
            lesson_controller::delete,
            user_controller::read,
            user_controller::update,
            user_controller::update_password,
            user_controller::index,
            user_session_controller::login,
            user_session_controller::logout,
        ),
        components(
            schemas(
                domain::approval_requests::Model,
                domain::course::CourseDetail,
                domain::course::ModuleWithLessons,
                domain::course_modules::Model,
                domain::courses::Model,
                domain::departments::Model,
                domain::dynamics::Model,
                domain::lessons::Model,
                domain::users::Model,
                domain::user::Credentials,
                course_controller::CourseRequest,
                params::course::UpdateParams,
                params::course_module::UpdateParams,
                params::lesson::UpdateParams,
                params::user::UpdateParams,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "learning_platform", description = "Corporate course design and approval API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines our cookie session based authentication requirement for gaining access to our
// API endpoints for OpenAPI.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "id",
                    "Session id value returned from successful login via Set-Cookie header",
                ))),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(user_session_routes())
        .merge(user_session_protected_routes(app_state.clone()))
        .merge(user_routes(app_state.clone()))
        .merge(admin_user_routes(app_state.clone()))
        .merge(department_routes(app_state.clone()))
        .merge(course_routes(app_state.clone()))
        .merge(course_module_routes(app_state.clone()))
        .merge(lesson_routes(app_state.clone()))
        .merge(approval_request_routes(app_state.clone()))
        .merge(dynamic_routes(app_state.clone()))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn user_session_routes() -> Router {
    Router::new().route("/login", post(user_session_controller::login))
}

fn user_session_protected_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/logout", delete(user_session_controller::logout))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn user_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/users", get(user_controller::index))
        .route("/users/me", get(user_controller::read))
        .route("/users/me", put(user_controller::update))
        .route("/users/me/password", put(user_controller::update_password))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn admin_user_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/admin/users", get(admin::user_controller::index))
        .route("/admin/users", post(admin::user_controller::create))
        .route("/admin/users/{id}", put(admin::user_controller::update))
        .route("/admin/users/{id}", delete(admin::user_controller::delete))
        .route(
            "/admin/users/{id}/password",
            put(admin::user_controller::reset_password),
        )
        .route_layer(from_fn_with_state(app_state.clone(), protect::admin))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn department_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/departments", get(department_controller::index))
        .route("/departments/{id}", get(department_controller::read))
        .merge(
            // POST/PUT/DELETE /departments
            Router::new()
                .route("/departments", post(department_controller::create))
                .route("/departments/{id}", put(department_controller::update))
                .route("/departments/{id}", delete(department_controller::delete))
                .route_layer(from_fn_with_state(app_state.clone(), protect::admin)),
        )
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn course_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/courses", get(course_controller::index))
        .route("/courses", post(course_controller::create))
        .merge(
            // Anyone who can see the course
            Router::new()
                .route("/courses/{id}", get(course_controller::read))
                .route("/courses/{id}/duplicate", post(course_controller::duplicate))
                .route(
                    "/courses/{id}/collaborators",
                    get(course::collaborator_controller::index),
                )
                .route(
                    "/courses/{id}/modules",
                    get(course::module_controller::index),
                )
                .route_layer(from_fn_with_state(
                    app_state.clone(),
                    protect::courses::read,
                )),
        )
        .merge(
            // Anyone who can edit the course
            Router::new()
                .route("/courses/{id}", put(course_controller::update))
                .route("/courses/{id}/status", put(course_controller::update_status))
                .route(
                    "/courses/{id}/modules",
                    post(course::module_controller::create),
                )
                .route(
                    "/courses/{id}/modules/order",
                    put(course::module_controller::reorder),
                )
                .route_layer(from_fn_with_state(
                    app_state.clone(),
                    protect::courses::update,
                )),
        )
        .merge(
            // Only the owner of the course
            Router::new()
                .route("/courses/{id}", delete(course_controller::delete))
                .route(
                    "/courses/{id}/collaborators",
                    put(course::collaborator_controller::update),
                )
                .route(
                    "/courses/{id}/collaborators/{user_id}",
                    post(course::collaborator_controller::create),
                )
                .route(
                    "/courses/{id}/collaborators/{user_id}",
                    delete(course::collaborator_controller::delete),
                )
                .route_layer(from_fn_with_state(app_state.clone(), protect::courses::own)),
        )
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn course_module_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(
            // GET /modules/{id}/lessons
            Router::new()
                .route(
                    "/modules/{id}/lessons",
                    get(course_module::lesson_controller::index),
                )
                .route_layer(from_fn_with_state(
                    app_state.clone(),
                    protect::course_modules::read,
                )),
        )
        .merge(
            Router::new()
                .route("/modules/{id}", put(course_module_controller::update))
                .route("/modules/{id}", delete(course_module_controller::delete))
                .route(
                    "/modules/{id}/lessons",
                    post(course_module::lesson_controller::create),
                )
                .route(
                    "/modules/{id}/lessons/order",
                    put(course_module::lesson_controller::reorder),
                )
                .route_layer(from_fn_with_state(
                    app_state.clone(),
                    protect::course_modules::update,
                )),
        )
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn lesson_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/lessons/{id}", put(lesson_controller::update))
        .route("/lessons/{id}", delete(lesson_controller::delete))
        .route("/lessons/{id}/status", put(lesson_controller::update_status))
        .route("/lessons/{id}/module", put(lesson_controller::move_to_module))
        .route_layer(from_fn_with_state(
            app_state.clone(),
            protect::lessons::update,
        ))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn approval_request_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/approval_requests",
            post(approval_request_controller::create),
        )
        .route(
            "/approval_requests/{id}",
            delete(approval_request_controller::delete),
        )
        .merge(
            // GET /approval_requests
            Router::new()
                .route(
                    "/approval_requests",
                    get(approval_request_controller::index),
                )
                .route_layer(from_fn_with_state(
                    app_state.clone(),
                    protect::approval_requests::index,
                )),
        )
        .merge(
            // GET /approval_requests/{id}
            Router::new()
                .route(
                    "/approval_requests/{id}",
                    get(approval_request_controller::read),
                )
                .route_layer(from_fn_with_state(
                    app_state.clone(),
                    protect::approval_requests::read,
                )),
        )
        .merge(
            // PUT /approval_requests/{id}/approve and /reject
            Router::new()
                .route(
                    "/approval_requests/{id}/approve",
                    put(approval_request_controller::approve),
                )
                .route(
                    "/approval_requests/{id}/reject",
                    put(approval_request_controller::reject),
                )
                .route_layer(from_fn_with_state(
                    app_state.clone(),
                    protect::approval_requests::review,
                )),
        )
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn dynamic_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/dynamics", get(dynamic_controller::index))
        .route("/dynamics", post(dynamic_controller::create))
        .route("/dynamics/{id}", get(dynamic_controller::read))
        .merge(
            // PUT/DELETE /dynamics/{id}
            Router::new()
                .route("/dynamics/{id}", put(dynamic_controller::update))
                .route("/dynamics/{id}", delete(dynamic_controller::delete))
                .route_layer(from_fn_with_state(
                    app_state.clone(),
                    protect::dynamics::update,
                )),
        )
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}
