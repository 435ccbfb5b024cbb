use crate::course::is_blank;
use crate::error::Error;
use crate::{roles::Role, users, Id};
use email_address::EmailAddress;
use entity_api::mutate::{self, IntoUpdateMap, UpdateMap};
use entity_api::query::{IntoQueryFilterMap, QuerySort};
use entity_api::{query, user};
use log::*;
use sea_orm::{DatabaseConnection, IntoActiveModel, TransactionTrait};

pub use entity_api::user::{
    find_all, find_by_email, find_by_id, AuthSession, Backend, Credentials,
};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Columns a user may change on their own profile.
const PROFILE_COLUMNS: [&str; 3] = ["first_name", "last_name", "display_name"];

/// Creates a user with a hashed password. The email must be valid and unused.
pub async fn create(
    db: &DatabaseConnection,
    user_model: users::Model,
) -> Result<users::Model, Error> {
    validate_new_user(&user_model)?;
    if user::find_by_email(db, &user_model.email).await?.is_some() {
        warn!("A user with email {} already exists", user_model.email);
        return Err(Error::invalid());
    }

    let created = user::create(db, user_model).await?;
    info!("User {} created with role {}", created.id, created.role);
    Ok(created)
}

/// Updates the caller's own profile. Keys other than the name fields are
/// ignored.
pub async fn update(
    db: &DatabaseConnection,
    user_id: Id,
    params: impl IntoUpdateMap,
) -> Result<users::Model, Error> {
    let mut requested = params.into_update_map();
    let mut update_map = UpdateMap::new();
    for column in PROFILE_COLUMNS {
        if let Some(value) = requested.remove(column) {
            update_map.insert(column.to_string(), Some(value));
        }
    }
    if is_blank(update_map.get("first_name")) || is_blank(update_map.get("last_name")) {
        return Err(Error::invalid());
    }

    let existing_user = find_by_id(db, user_id).await?;
    Ok(mutate::update::<users::ActiveModel, users::Column>(
        db,
        existing_user.into_active_model(),
        update_map,
    )
    .await?)
}

pub async fn update_role_and_department(
    db: &DatabaseConnection,
    user_id: Id,
    role: Role,
    department_id: Option<Id>,
) -> Result<users::Model, Error> {
    Ok(user::update_role_and_department(db, user_id, role, department_id).await?)
}

/// Changes the caller's own password after checking the current one.
pub async fn update_password(
    db: &DatabaseConnection,
    user_id: Id,
    current_password: String,
    new_password: String,
) -> Result<(), Error> {
    check_password_length(&new_password)?;

    let existing_user = find_by_id(db, user_id).await?;
    if user::verify_password(&current_password, &existing_user.password)
        .await
        .is_err()
    {
        warn!("User {user_id} gave a wrong current password");
        return Err(Error::invalid());
    }

    user::update_password(db, user_id, new_password).await?;
    info!("User {user_id} changed their password");
    Ok(())
}

/// Sets a new password for another user without knowing the old one.
pub async fn reset_password(
    db: &DatabaseConnection,
    user_id: Id,
    new_password: String,
) -> Result<(), Error> {
    check_password_length(&new_password)?;
    user::update_password(db, user_id, new_password).await?;
    info!("Password of user {user_id} was reset");
    Ok(())
}

/// Deletes a user. Nobody may delete their own account, and users that still
/// author courses, dynamics or approval requests are kept; their records
/// must be reassigned or removed first.
pub async fn delete(
    db: &DatabaseConnection,
    acting_user: &users::Model,
    user_id: Id,
) -> Result<(), Error> {
    if acting_user.id == user_id {
        warn!("User {user_id} tried to delete their own account");
        return Err(Error::invalid());
    }

    let txn = db.begin().await?;
    let authored = user::count_authored_records(&txn, user_id).await?;
    if authored > 0 {
        warn!("User {user_id} still authors {authored} records and cannot be deleted");
        return Err(Error::invalid());
    }
    user::delete(&txn, user_id).await?;
    txn.commit().await?;
    info!("User {user_id} deleted by {}", acting_user.id);
    Ok(())
}

pub async fn find_by<P>(db: &DatabaseConnection, params: P) -> Result<Vec<users::Model>, Error>
where
    P: IntoQueryFilterMap + QuerySort<users::Column>,
{
    Ok(query::find_by::<users::Entity, users::Column, P>(db, params).await?)
}

fn validate_new_user(user_model: &users::Model) -> Result<(), Error> {
    if !EmailAddress::is_valid(user_model.email.trim()) {
        warn!("Rejected user with invalid email {}", user_model.email);
        return Err(Error::invalid());
    }
    if user_model.first_name.trim().is_empty() || user_model.last_name.trim().is_empty() {
        return Err(Error::invalid());
    }
    check_password_length(&user_model.password)
}

fn check_password_length(password: &str) -> Result<(), Error> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(Error::invalid());
    }
    Ok(())
}


#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod mock_tests {
    use super::tests::user_model;
    use super::*;
    use crate::error::EntityErrorKind;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn nobody_deletes_themselves() {
        let admin = user_model("admin@example.com", "longenough");
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = delete(&db, &admin, admin.id).await;
        assert_eq!(
            result.unwrap_err().entity_error_kind(),
            Some(&EntityErrorKind::Invalid)
        );
        assert!(db.into_transaction_log().is_empty());
    }

    fn count_row(count: i64) -> [std::collections::BTreeMap<&'static str, sea_orm::Value>; 1] {
        [std::collections::BTreeMap::from([(
            "num_items",
            sea_orm::Value::BigInt(Some(count)),
        )])]
    }

    #[tokio::test]
    async fn users_that_still_author_courses_are_kept() {
        let admin = user_model("admin@example.com", "longenough");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([count_row(1)])
            .append_query_results([count_row(0)])
            .append_query_results([count_row(0)])
            .into_connection();

        let result = delete(&db, &admin, Id::new_v4()).await;
        assert_eq!(
            result.unwrap_err().entity_error_kind(),
            Some(&EntityErrorKind::Invalid)
        );

        let log = format!("{:?}", db.into_transaction_log());
        assert!(!log.contains("DELETE"));
        assert!(log.contains("ROLLBACK"));
    }

    #[tokio::test]
    async fn users_without_authored_records_are_deleted() -> Result<(), Error> {
        let admin = user_model("admin@example.com", "longenough");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([count_row(0)])
            .append_query_results([count_row(0)])
            .append_query_results([count_row(0)])
            .append_exec_results([sea_orm::MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        delete(&db, &admin, Id::new_v4()).await?;

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains(r#"DELETE FROM \"learning_platform\".\"users\""#));
        assert!(log.contains("COMMIT"));

        Ok(())
    }

    #[tokio::test]
    async fn create_rejects_a_taken_email() {
        let existing = user_model("carla@example.com", "hash");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing.clone()]])
            .into_connection();

        let result = create(&db, user_model("Carla@Example.com", "longenough")).await;
        assert_eq!(
            result.unwrap_err().entity_error_kind(),
            Some(&EntityErrorKind::Invalid)
        );
    }

    #[tokio::test]
    async fn update_password_checks_the_current_password() {
        let stored = user_model("carla@example.com", &user::generate_hash("original1".into()));
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stored.clone()]])
            .into_connection();

        let result = update_password(
            &db,
            stored.id,
            "not-the-password".to_owned(),
            "brand-new-pass".to_owned(),
        )
        .await;
        assert_eq!(
            result.unwrap_err().entity_error_kind(),
            Some(&EntityErrorKind::Invalid)
        );

        let log = format!("{:?}", db.into_transaction_log());
        assert!(!log.contains("UPDATE"));
    }

    #[tokio::test]
    async fn profile_updates_ignore_the_role() -> Result<(), Error> {
        struct Params;
        impl IntoUpdateMap for Params {
            fn into_update_map(self) -> UpdateMap {
                let mut update_map = UpdateMap::new();
                update_map.insert(
                    "display_name".to_string(),
                    Some(sea_orm::Value::String(Some(Box::new("Cacá".to_string())))),
                );
                update_map.insert(
                    "role".to_string(),
                    Some(sea_orm::Value::String(Some(Box::new("admin".to_string())))),
                );
                update_map
            }
        }

        let stored = user_model("carla@example.com", "hash");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stored.clone()]])
            .append_query_results([[users::Model {
                display_name: Some("Cacá".to_owned()),
                ..stored.clone()
            }]])
            .into_connection();

        update(&db, stored.id, Params).await?;

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains(r#"\"display_name\" = $"#));
        assert!(!log.contains(r#"\"role\" = $"#));

        Ok(())
    }
}
