//! Endpoints nested under `/modules/{id}`.
pub(crate) mod lesson_controller;
