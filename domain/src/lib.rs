//! Business rules of the learning platform.
//!
//! This crate re-exports the `entity_api` query and update helpers along with
//! the entity types, so that `web` never needs to depend on `entity_api` or
//! `entity` directly.
pub use entity_api::{
    mutate::{IntoUpdateMap, UpdateMap},
    query::{FilterOnly, IntoQueryFilterMap, QueryFilterMap, QuerySort},
};

// Re-exports from `entity` crate via `entity_api`
pub use entity_api::{
    activity_type, approval_requests, approval_status, approval_type, course_collaborators,
    course_modules, course_status, courses, departments, dynamic_category, dynamics,
    lesson_status, lessons, roles, users, Id,
};

pub mod access;
pub mod approval_request;
pub mod course;
pub mod course_module;
pub mod department;
pub mod duration;
pub mod dynamic;
pub mod error;
pub mod lesson;
pub mod ordering;
pub mod tags;
pub mod user;
