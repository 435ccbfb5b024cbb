use uuid::Uuid;

pub mod prelude;

// Core entities
pub mod approval_requests;
pub mod course_collaborators;
pub mod course_modules;
pub mod courses;
pub mod departments;
pub mod dynamics;
pub mod lessons;
pub mod users;

// Database enums
pub mod activity_type;
pub mod approval_status;
pub mod approval_type;
pub mod course_status;
pub mod dynamic_category;
pub mod lesson_status;
pub mod roles;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = Uuid;
