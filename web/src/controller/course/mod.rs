//! Endpoints nested under `/courses/{id}`.
pub(crate) mod collaborator_controller;
pub(crate) mod module_controller;
