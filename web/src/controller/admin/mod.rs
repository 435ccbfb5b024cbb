//! Endpoints reserved to administrators.
pub(crate) mod user_controller;
