pub use super::approval_requests::Entity as ApprovalRequests;
pub use super::course_collaborators::Entity as CourseCollaborators;
pub use super::course_modules::Entity as CourseModules;
pub use super::courses::Entity as Courses;
pub use super::departments::Entity as Departments;
pub use super::dynamics::Entity as Dynamics;
pub use super::lessons::Entity as Lessons;
pub use super::users::Entity as Users;
