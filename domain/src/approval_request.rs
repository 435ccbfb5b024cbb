//! The approval workflow: submitting a course (or one of its modules or
//! lessons) for sign-off and reviewing the resulting requests.
//!
//! A review is always recorded once the request is pending. The course status
//! only follows along the conventional status graph; a course whose status
//! does not allow the move (for instance one already sent back for revision
//! by a sibling request) keeps its status.
use crate::access;
use crate::error::Error;
use crate::{
    approval_requests, approval_status::ApprovalStatus, approval_type::ApprovalType,
    course_status::CourseStatus, courses, users, Id,
};
use entity_api::query::{IntoQueryFilterMap, QuerySort};
use entity_api::{approval_request, course, course_module, lesson, user};
use log::*;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

pub use entity_api::approval_request::find_by_id;

/// Submits a request and moves the course to `Em aprovação`, in one
/// transaction.
pub async fn submit(
    db: &DatabaseConnection,
    request_model: approval_requests::Model,
    requester_id: Id,
) -> Result<approval_requests::Model, Error> {
    let txn = db.begin().await?;

    let target_course = course::find_by_id(&txn, request_model.course_id).await?;
    check_submittable(&txn, &target_course, &request_model).await?;
    check_approver(&txn, request_model.approver_id, requester_id).await?;

    let created = approval_request::create(&txn, request_model, requester_id).await?;
    if target_course.status != CourseStatus::InApproval {
        course::update_status(&txn, target_course.id, CourseStatus::InApproval).await?;
    }
    txn.commit().await?;

    info!(
        "Approval request {} ({}) submitted for course {} to {}",
        created.id, created.request_type, created.course_id, created.approver_id
    );
    Ok(created)
}

/// Approves a pending request. The course becomes `Aprovado` once no other
/// request of it is pending, provided it is still `Em aprovação`.
pub async fn approve(
    db: &DatabaseConnection,
    request_id: Id,
    reviewer: &users::Model,
    comments: Option<String>,
) -> Result<approval_requests::Model, Error> {
    let txn = db.begin().await?;
    let request = find_reviewable(&txn, request_id, reviewer).await?;
    let course_id = request.course_id;

    let reviewed = approval_request::review(
        &txn,
        request,
        ApprovalStatus::Approved,
        comments.filter(|comments| !comments.trim().is_empty()),
    )
    .await?;

    let still_pending = approval_request::count_pending_by_course_id(&txn, course_id, None).await?;
    if still_pending == 0 {
        let target_course = course::find_by_id(&txn, course_id).await?;
        follow(&txn, &target_course, CourseStatus::Approved).await?;
    } else {
        debug!("Course {course_id} still has {still_pending} pending request(s)");
    }
    txn.commit().await?;

    Ok(reviewed)
}

/// Rejects a pending request. Comments explaining the rejection are required;
/// the course goes back to its authors as `Revisão solicitada`.
pub async fn reject(
    db: &DatabaseConnection,
    request_id: Id,
    reviewer: &users::Model,
    comments: String,
) -> Result<approval_requests::Model, Error> {
    if comments.trim().is_empty() {
        warn!("Rejected review of request {request_id} without comments");
        return Err(Error::invalid());
    }

    let txn = db.begin().await?;
    let request = find_reviewable(&txn, request_id, reviewer).await?;
    let target_course = course::find_by_id(&txn, request.course_id).await?;

    let reviewed = approval_request::review(
        &txn,
        request,
        ApprovalStatus::Rejected,
        Some(comments.trim().to_owned()),
    )
    .await?;
    follow(&txn, &target_course, CourseStatus::RevisionRequested).await?;
    txn.commit().await?;

    Ok(reviewed)
}

/// Withdraws a pending request. Only the requester may do so. When nothing
/// else is pending the course returns to `Em andamento`.
pub async fn withdraw(
    db: &DatabaseConnection,
    request_id: Id,
    requester: &users::Model,
) -> Result<(), Error> {
    let txn = db.begin().await?;
    let request = approval_request::find_by_id(&txn, request_id).await?;
    if request.requester_id != requester.id {
        warn!(
            "User {} tried to withdraw request {request_id} of {}",
            requester.id, request.requester_id
        );
        return Err(Error::forbidden());
    }
    if request.status != ApprovalStatus::Pending {
        return Err(Error::invalid());
    }

    approval_request::delete_by_id(&txn, request_id).await?;

    let still_pending =
        approval_request::count_pending_by_course_id(&txn, request.course_id, None).await?;
    if still_pending == 0 {
        let target_course = course::find_by_id(&txn, request.course_id).await?;
        if target_course.status == CourseStatus::InApproval {
            course::update_status(&txn, target_course.id, CourseStatus::InProgress).await?;
        }
    }
    txn.commit().await?;

    info!("Approval request {request_id} withdrawn");
    Ok(())
}

pub async fn find_by_course(
    db: &DatabaseConnection,
    course_id: Id,
) -> Result<Vec<approval_requests::Model>, Error> {
    Ok(approval_request::find_by_course_id(db, course_id).await?)
}

pub async fn find_pending_for_approver(
    db: &DatabaseConnection,
    approver_id: Id,
) -> Result<Vec<approval_requests::Model>, Error> {
    Ok(approval_request::find_pending_by_approver_id(db, approver_id).await?)
}

pub async fn find_by_requester(
    db: &DatabaseConnection,
    requester_id: Id,
) -> Result<Vec<approval_requests::Model>, Error> {
    Ok(approval_request::find_by_requester_id(db, requester_id).await?)
}

pub async fn find_by<P>(
    db: &DatabaseConnection,
    params: P,
) -> Result<Vec<approval_requests::Model>, Error>
where
    P: IntoQueryFilterMap + QuerySort<approval_requests::Column>,
{
    Ok(approval_request::find_by(db, params).await?)
}

async fn check_submittable(
    db: &impl ConnectionTrait,
    target_course: &courses::Model,
    request: &approval_requests::Model,
) -> Result<(), Error> {
    match (request.request_type, request.target_item_id) {
        (ApprovalType::Course, None) => {
            if !target_course.status.accepts_submission()
                || approval_request::has_pending_course_request(db, target_course.id).await?
            {
                warn!(
                    "Course {} cannot be submitted while {}",
                    target_course.id, target_course.status
                );
                return Err(Error::invalid());
            }
        }
        (ApprovalType::Module, Some(module_id)) => {
            check_open(target_course)?;
            let module = course_module::find_by_id(db, module_id)
                .await
                .map_err(|_| Error::invalid())?;
            if module.course_id != target_course.id {
                return Err(Error::invalid());
            }
        }
        (ApprovalType::Lesson, Some(lesson_id)) => {
            check_open(target_course)?;
            let target_lesson = lesson::find_by_id(db, lesson_id)
                .await
                .map_err(|_| Error::invalid())?;
            let module = course_module::find_by_id(db, target_lesson.module_id).await?;
            if module.course_id != target_course.id {
                return Err(Error::invalid());
            }
        }
        (request_type, target) => {
            warn!("Request of type {request_type} has an inconsistent target {target:?}");
            return Err(Error::invalid());
        }
    }
    Ok(())
}

// Module and lesson requests may pile up on a course already in approval.
fn check_open(target_course: &courses::Model) -> Result<(), Error> {
    if target_course.status.accepts_submission()
        || target_course.status == CourseStatus::InApproval
    {
        Ok(())
    } else {
        Err(Error::invalid())
    }
}

async fn check_approver(
    db: &impl ConnectionTrait,
    approver_id: Id,
    requester_id: Id,
) -> Result<(), Error> {
    if approver_id == requester_id {
        return Err(Error::invalid());
    }
    let approver = user::find_by_id(db, approver_id)
        .await
        .map_err(|_| Error::invalid())?;
    if !access::can_approve_courses(&approver) {
        warn!("User {approver_id} ({}) cannot approve courses", approver.role);
        return Err(Error::invalid());
    }
    Ok(())
}

async fn find_reviewable(
    db: &impl ConnectionTrait,
    request_id: Id,
    reviewer: &users::Model,
) -> Result<approval_requests::Model, Error> {
    let request = approval_request::find_by_id(db, request_id).await?;
    if !access::can_review(reviewer, &request) {
        warn!("User {} may not review request {request_id}", reviewer.id);
        return Err(Error::forbidden());
    }
    if request.status != ApprovalStatus::Pending {
        warn!("Request {request_id} was already {}", request.status);
        return Err(Error::invalid());
    }
    Ok(request)
}

// Moves the course to `next` when the status graph allows it. Any other
// status, including `next` itself, is left untouched.
async fn follow(
    db: &impl ConnectionTrait,
    target_course: &courses::Model,
    next: CourseStatus,
) -> Result<(), Error> {
    if target_course.status == next {
        return Ok(());
    }
    if !target_course.status.can_transition_to(next) {
        info!(
            "Course {} stays {} instead of moving to {next}",
            target_course.id, target_course.status
        );
        return Ok(());
    }
    course::update_status(db, target_course.id, next).await?;
    Ok(())
}
