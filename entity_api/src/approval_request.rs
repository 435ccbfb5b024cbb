use super::error::Error;
use crate::query::{self, IntoQueryFilterMap, QuerySort};
use chrono::Utc;
use entity::approval_requests::{ActiveModel, Column, Entity, Model};
use entity::{approval_status::ApprovalStatus, approval_type::ApprovalType, Id};
use log::*;
use sea_orm::{entity::prelude::*, ActiveValue::Set, PaginatorTrait, QueryOrder};

/// Inserts a new `pendente` request on behalf of `requester_id`.
pub async fn create(
    db: &impl ConnectionTrait,
    request_model: Model,
    requester_id: Id,
) -> Result<Model, Error> {
    debug!("New Approval Request Model to be inserted: {request_model:?}");

    let now = Utc::now();
    let active_model = ActiveModel {
        course_id: Set(request_model.course_id),
        requester_id: Set(requester_id),
        approver_id: Set(request_model.approver_id),
        request_type: Set(request_model.request_type),
        target_item_id: Set(request_model.target_item_id),
        status: Set(ApprovalStatus::Pending),
        comments: Set(request_model.comments),
        reviewed_at: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(active_model.insert(db).await?)
}

/// Records the reviewer's decision on a request.
pub async fn review(
    db: &impl ConnectionTrait,
    request: Model,
    status: ApprovalStatus,
    comments: Option<String>,
) -> Result<Model, Error> {
    debug!("Approval Request {} reviewed as {status}", request.id);

    let now = Utc::now();
    let mut active_model: ActiveModel = request.into();
    active_model.status = Set(status);
    if comments.is_some() {
        active_model.comments = Set(comments);
    }
    active_model.reviewed_at = Set(Some(now.into()));
    active_model.updated_at = Set(now.into());

    Ok(active_model.update(db).await?)
}

pub async fn delete_by_id(db: &impl ConnectionTrait, id: Id) -> Result<(), Error> {
    let result = Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found());
    }
    Ok(())
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn find_by<P>(db: &impl ConnectionTrait, params: P) -> Result<Vec<Model>, Error>
where
    P: IntoQueryFilterMap + QuerySort<Column>,
{
    query::find_by::<Entity, Column, P>(db, params).await
}

/// Every request of a course, newest first.
pub async fn find_by_course_id(
    db: &impl ConnectionTrait,
    course_id: Id,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::CourseId.eq(course_id))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?)
}

/// Pending requests waiting on `approver_id`, oldest first.
pub async fn find_pending_by_approver_id(
    db: &impl ConnectionTrait,
    approver_id: Id,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::ApproverId.eq(approver_id))
        .filter(Column::Status.eq(ApprovalStatus::Pending))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn find_by_requester_id(
    db: &impl ConnectionTrait,
    requester_id: Id,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::RequesterId.eq(requester_id))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?)
}

/// Number of pending requests of a course, not counting `excluding`.
pub async fn count_pending_by_course_id(
    db: &impl ConnectionTrait,
    course_id: Id,
    excluding: Option<Id>,
) -> Result<u64, Error> {
    let mut query = Entity::find()
        .filter(Column::CourseId.eq(course_id))
        .filter(Column::Status.eq(ApprovalStatus::Pending));
    if let Some(id) = excluding {
        query = query.filter(Column::Id.ne(id));
    }
    Ok(query.count(db).await?)
}

pub async fn has_pending_course_request(
    db: &impl ConnectionTrait,
    course_id: Id,
) -> Result<bool, Error> {
    let count = Entity::find()
        .filter(Column::CourseId.eq(course_id))
        .filter(Column::Status.eq(ApprovalStatus::Pending))
        .filter(Column::RequestType.eq(ApprovalType::Course))
        .count(db)
        .await?;
    Ok(count > 0)
}
