use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::{AppState, Error};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::{department as DepartmentApi, departments, Id};
use log::*;
use service::config::ApiVersion;

/// INDEX all Departments
#[utoipa::path(
    get,
    path = "/departments",
    params(ApiVersion),
    responses(
        (status = 200, description = "Successfully retrieved all Departments", body = [domain::departments::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET all Departments");
    let departments = DepartmentApi::find_all(app_state.db_conn_ref()).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), departments)))
}

/// GET a Department by id
#[utoipa::path(
    get,
    path = "/departments/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Department id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved the Department", body = domain::departments::Model),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Department not found"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn read(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Department by id: {id}");
    let department = DepartmentApi::find_by_id(app_state.db_conn_ref(), id).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), department)))
}

/// CREATE a Department
#[utoipa::path(
    post,
    path = "/departments",
    params(ApiVersion),
    request_body = domain::departments::Model,
    responses(
        (status = 201, description = "Successfully created a Department", body = domain::departments::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Blank or duplicate name"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn create(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(_admin): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(department_model): Json<departments::Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a Department from: {department_model:?}");
    let department = DepartmentApi::create(app_state.db_conn_ref(), department_model).await?;
    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), department)))
}

/// PUT a Department
#[utoipa::path(
    put,
    path = "/departments/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Department to update"),
    ),
    request_body = domain::departments::Model,
    responses(
        (status = 200, description = "Successfully updated the Department", body = domain::departments::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Department not found"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn update(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(_admin): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(department_model): Json<departments::Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Department {id} with {department_model:?}");
    let department = DepartmentApi::update(app_state.db_conn_ref(), id, department_model).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), department)))
}

/// DELETE a Department. Its users and courses are kept without a department.
#[utoipa::path(
    delete,
    path = "/departments/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the Department to delete"),
    ),
    responses(
        (status = 204, description = "Successfully deleted the Department"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Department not found"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn delete(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(_admin): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    DepartmentApi::delete(app_state.db_conn_ref(), id).await?;
    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}
