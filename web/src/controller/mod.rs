use serde::Serialize;
pub(crate) mod admin;
pub(crate) mod approval_request_controller;
pub(crate) mod course;
pub(crate) mod course_controller;
pub(crate) mod course_module;
pub(crate) mod course_module_controller;
pub(crate) mod department_controller;
pub(crate) mod dynamic_controller;
pub(crate) mod health_check_controller;
pub(crate) mod lesson_controller;
pub(crate) mod user_controller;
pub(crate) mod user_session_controller;

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status_code: u16, data: T) -> Self {
        Self {
            status_code,
            data: Some(data),
        }
    }

    pub fn no_content(status_code: u16) -> ApiResponse<()> {
        ApiResponse {
            status_code,
            data: None,
        }
    }
}
