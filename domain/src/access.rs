//! Who may see, edit, delete and review what.
//!
//! The rules are pure functions over already loaded records; `CourseAccess`
//! bundles the records a course check needs so callers load them once.
use crate::error::Error;
use crate::{approval_requests, courses, users, Id};
use entity_api::{course, course_collaborator};
use sea_orm::ConnectionTrait;

pub fn can_view(user: &users::Model, course: &courses::Model, collaborator_ids: &[Id]) -> bool {
    can_edit(user, course, collaborator_ids)
        || user
            .department_id
            .is_some_and(|department_id| course.department_id == Some(department_id))
}

pub fn can_edit(user: &users::Model, course: &courses::Model, collaborator_ids: &[Id]) -> bool {
    user.is_admin() || course.creator_id == user.id || collaborator_ids.contains(&user.id)
}

pub fn can_delete(user: &users::Model, course: &courses::Model) -> bool {
    user.is_admin() || course.creator_id == user.id
}

pub fn can_review(user: &users::Model, request: &approval_requests::Model) -> bool {
    user.is_admin() || request.approver_id == user.id
}

pub fn can_approve_courses(user: &users::Model) -> bool {
    user.role.can_approve()
}

/// A course together with its collaborator ids.
#[derive(Debug, Clone)]
pub struct CourseAccess {
    pub course: courses::Model,
    pub collaborator_ids: Vec<Id>,
}

impl CourseAccess {
    pub async fn load(db: &impl ConnectionTrait, course_id: Id) -> Result<Self, Error> {
        let course = course::find_by_id(db, course_id).await?;
        let collaborator_ids = course_collaborator::find_user_ids_by_course_id(db, course_id).await?;
        Ok(Self {
            course,
            collaborator_ids,
        })
    }

    pub fn can_view(&self, user: &users::Model) -> bool {
        can_view(user, &self.course, &self.collaborator_ids)
    }

    pub fn can_edit(&self, user: &users::Model) -> bool {
        can_edit(user, &self.course, &self.collaborator_ids)
    }

    pub fn can_delete(&self, user: &users::Model) -> bool {
        can_delete(user, &self.course)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity::{
        approval_status::ApprovalStatus, approval_type::ApprovalType,
        course_status::CourseStatus, roles::Role,
    };

    fn user(role: Role, department_id: Option<Id>) -> users::Model {
        let now = chrono::Utc::now();
        users::Model {
            id: Id::new_v4(),
            email: "user@example.com".to_owned(),
            first_name: "Test".to_owned(),
            last_name: "User".to_owned(),
            display_name: None,
            password: "hash".to_owned(),
            role,
            department_id,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn course(creator_id: Id, department_id: Option<Id>) -> courses::Model {
        let now = chrono::Utc::now();
        courses::Model {
            id: Id::new_v4(),
            name: "Comunicação".to_owned(),
            description: None,
            objectives: None,
            target_audience: None,
            estimated_duration: 0,
            status: CourseStatus::Draft,
            tags: vec![],
            creator_id,
            department_id,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn admin_can_do_everything() {
        let admin = user(Role::Admin, None);
        let c = course(Id::new_v4(), None);
        assert!(can_view(&admin, &c, &[]));
        assert!(can_edit(&admin, &c, &[]));
        assert!(can_delete(&admin, &c));
    }

    #[test]
    fn creator_can_view_edit_and_delete() {
        let creator = user(Role::Instructor, None);
        let c = course(creator.id, None);
        assert!(can_view(&creator, &c, &[]));
        assert!(can_edit(&creator, &c, &[]));
        assert!(can_delete(&creator, &c));
    }

    #[test]
    fn collaborator_can_edit_but_not_delete() {
        let collaborator = user(Role::Collaborator, None);
        let c = course(Id::new_v4(), None);
        let collaborators = [collaborator.id];
        assert!(can_view(&collaborator, &c, &collaborators));
        assert!(can_edit(&collaborator, &c, &collaborators));
        assert!(!can_delete(&collaborator, &c));
    }

    #[test]
    fn same_department_can_only_view() {
        let department_id = Id::new_v4();
        let colleague = user(Role::Manager, Some(department_id));
        let c = course(Id::new_v4(), Some(department_id));
        assert!(can_view(&colleague, &c, &[]));
        assert!(!can_edit(&colleague, &c, &[]));
        assert!(!can_delete(&colleague, &c));
    }

    #[test]
    fn users_without_department_never_match_by_department() {
        let outsider = user(Role::Instructor, None);
        let c = course(Id::new_v4(), None);
        assert!(!can_view(&outsider, &c, &[]));
    }

    #[test]
    fn only_admin_or_assigned_approver_reviews() {
        let now = chrono::Utc::now();
        let approver = user(Role::Manager, None);
        let other_manager = user(Role::Manager, None);
        let request = approval_requests::Model {
            id: Id::new_v4(),
            course_id: Id::new_v4(),
            requester_id: Id::new_v4(),
            approver_id: approver.id,
            request_type: ApprovalType::Course,
            target_item_id: None,
            status: ApprovalStatus::Pending,
            comments: None,
            reviewed_at: None,
            created_at: now.into(),
            updated_at: now.into(),
        };

        assert!(can_review(&approver, &request));
        assert!(can_review(&user(Role::Admin, None), &request));
        assert!(!can_review(&other_manager, &request));
    }

    #[test]
    fn managers_and_admins_approve_courses() {
        assert!(can_approve_courses(&user(Role::Admin, None)));
        assert!(can_approve_courses(&user(Role::Manager, None)));
        assert!(!can_approve_courses(&user(Role::Instructor, None)));
        assert!(!can_approve_courses(&user(Role::Collaborator, None)));
    }
}
