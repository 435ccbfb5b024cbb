use super::error::Error;
use crate::query::contains_pattern;
use chrono::Utc;
use entity::dynamic_category::DynamicCategory;
use entity::dynamics::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{
    entity::prelude::*, sea_query::Func, ActiveValue::Set, ActiveValue::Unchanged, Condition,
    QueryOrder,
};

/// Filters accepted when searching the dynamics bank. Every field is optional
/// and the filters combine with AND.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DynamicQuery {
    pub category: Option<DynamicCategory>,
    pub tag: Option<String>,
    /// Case-insensitive substring of the title or the description.
    pub text: Option<String>,
    pub max_duration: Option<i32>,
    /// Only dynamics whose participant range includes this group size.
    pub group_size: Option<i32>,
}

pub async fn create(
    db: &impl ConnectionTrait,
    dynamic_model: Model,
    created_by: Id,
) -> Result<Model, Error> {
    debug!("New Dynamic Model to be inserted: {dynamic_model:?}");

    let now = Utc::now();
    let active_model = ActiveModel {
        title: Set(dynamic_model.title),
        description: Set(dynamic_model.description),
        objective: Set(dynamic_model.objective),
        category: Set(dynamic_model.category),
        min_participants: Set(dynamic_model.min_participants),
        max_participants: Set(dynamic_model.max_participants),
        duration: Set(dynamic_model.duration),
        materials: Set(dynamic_model.materials),
        instructions: Set(dynamic_model.instructions),
        tags: Set(dynamic_model.tags),
        created_by: Set(created_by),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(active_model.insert(db).await?)
}

pub async fn update(db: &impl ConnectionTrait, id: Id, model: Model) -> Result<Model, Error> {
    let dynamic = find_by_id(db, id).await?;
    debug!("Existing Dynamic Model to be updated: {dynamic:?}");

    let active_model = ActiveModel {
        id: Unchanged(dynamic.id),
        title: Set(model.title),
        description: Set(model.description),
        objective: Set(model.objective),
        category: Set(model.category),
        min_participants: Set(model.min_participants),
        max_participants: Set(model.max_participants),
        duration: Set(model.duration),
        materials: Set(model.materials),
        instructions: Set(model.instructions),
        tags: Set(model.tags),
        created_by: Unchanged(dynamic.created_by),
        created_at: Unchanged(dynamic.created_at),
        updated_at: Set(Utc::now().into()),
    };

    Ok(active_model.update(db).await?)
}

pub async fn delete_by_id(db: &impl ConnectionTrait, id: Id) -> Result<(), Error> {
    let dynamic = find_by_id(db, id).await?;
    dynamic.delete(db).await?;
    Ok(())
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn search(
    db: &impl ConnectionTrait,
    dynamic_query: DynamicQuery,
) -> Result<Vec<Model>, Error> {
    debug!("Searching dynamics with {dynamic_query:?}");

    let mut query = Entity::find();

    if let Some(category) = dynamic_query.category {
        query = query.filter(Column::Category.eq(category));
    }
    if let Some(tag) = dynamic_query.tag.filter(|tag| !tag.trim().is_empty()) {
        query = query.filter(Expr::cust_with_values(
            r#"$1 = ANY("dynamics"."tags")"#,
            [tag.trim().to_lowercase()],
        ));
    }
    if let Some(text) = dynamic_query.text.filter(|text| !text.trim().is_empty()) {
        let pattern = contains_pattern(&text);
        query = query.filter(
            Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col((Entity, Column::Title))))
                        .like(pattern.clone()),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col((Entity, Column::Description))))
                        .like(pattern),
                ),
        );
    }
    if let Some(max_duration) = dynamic_query.max_duration {
        query = query.filter(Column::Duration.lte(max_duration));
    }
    if let Some(group_size) = dynamic_query.group_size {
        query = query
            .filter(
                Condition::any()
                    .add(Column::MinParticipants.is_null())
                    .add(Column::MinParticipants.lte(group_size)),
            )
            .filter(
                Condition::any()
                    .add(Column::MaxParticipants.is_null())
                    .add(Column::MaxParticipants.gte(group_size)),
            );
    }

    Ok(query.order_by_asc(Column::Title).all(db).await?)
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn search_without_filters_lists_everything_by_title() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        search(&db, DynamicQuery::default()).await?;

        let log = format!("{:?}", db.into_transaction_log());
        assert!(!log.contains("WHERE"));
        assert!(log.contains(r#"ORDER BY \"dynamics\".\"title\" ASC"#));

        Ok(())
    }

    #[tokio::test]
    async fn search_combines_every_filter() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        search(
            &db,
            DynamicQuery {
                category: Some(DynamicCategory::Energizer),
                tag: Some(" Remoto ".to_owned()),
                text: Some("Bola".to_owned()),
                max_duration: Some(15),
                group_size: Some(8),
            },
        )
        .await?;

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("energizer"));
        assert!(log.contains(r#""remoto""#));
        assert!(log.contains("%bola%"));
        assert!(log.contains("ESCAPE"));
        assert!(log.contains(r#"\"dynamics\".\"duration\" <= $"#));
        assert!(log.contains(r#"\"dynamics\".\"min_participants\" IS NULL"#));
        assert!(log.contains(r#"\"dynamics\".\"max_participants\" >= $"#));

        Ok(())
    }
}
