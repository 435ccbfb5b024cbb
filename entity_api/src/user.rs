use super::error::{EntityApiErrorKind, Error};
use async_trait::async_trait;
use axum_login::{AuthnBackend, UserId};
use chrono::Utc;

use entity::users::{ActiveModel, Column, Entity, Model};
use entity::{approval_requests, courses, dynamics, Id};
use log::*;
use sea_orm::{
    entity::prelude::*, Condition, ConnectionTrait, DatabaseConnection, PaginatorTrait, QueryOrder,
    Set,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

pub use entity::users::Role;

pub async fn create(db: &impl ConnectionTrait, user_model: Model) -> Result<Model, Error> {
    debug!("New User Model to be inserted: {}", user_model.email);

    let now = Utc::now();
    let user_active_model: ActiveModel = ActiveModel {
        email: Set(user_model.email.trim().to_lowercase()),
        first_name: Set(user_model.first_name),
        last_name: Set(user_model.last_name),
        display_name: Set(user_model.display_name),
        password: Set(generate_hash(user_model.password)),
        role: Set(user_model.role),
        department_id: Set(user_model.department_id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(user_active_model.insert(db).await?)
}

pub async fn find_by_email(db: &impl ConnectionTrait, email: &str) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Email.eq(email.trim().to_lowercase()))
        .one(db)
        .await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn find_by_ids(db: &impl ConnectionTrait, ids: Vec<Id>) -> Result<Vec<Model>, Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(Entity::find()
        .filter(Column::Id.is_in(ids))
        .order_by_asc(Column::FirstName)
        .order_by_asc(Column::LastName)
        .all(db)
        .await?)
}

pub async fn find_all(db: &impl ConnectionTrait) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .order_by_asc(Column::FirstName)
        .order_by_asc(Column::LastName)
        .all(db)
        .await?)
}

/// Changes a user's role and department in one write. Passing `None` for the
/// department detaches the user from any department.
pub async fn update_role_and_department(
    db: &impl ConnectionTrait,
    id: Id,
    role: Role,
    department_id: Option<Id>,
) -> Result<Model, Error> {
    let user = find_by_id(db, id).await?;
    debug!(
        "Changing role of user {} from {} to {role} (department {department_id:?})",
        user.id, user.role
    );

    let mut active_model: ActiveModel = user.into();
    active_model.role = Set(role);
    active_model.department_id = Set(department_id);
    active_model.updated_at = Set(Utc::now().into());

    Ok(active_model.update(db).await?)
}

/// Stores a new password for the user. The plain text is hashed here and never
/// leaves this function.
pub async fn update_password(
    db: &impl ConnectionTrait,
    id: Id,
    new_password: String,
) -> Result<Model, Error> {
    let user = find_by_id(db, id).await?;

    let mut active_model: ActiveModel = user.into();
    active_model.password = Set(generate_hash(new_password));
    active_model.updated_at = Set(Utc::now().into());

    Ok(active_model.update(db).await?)
}

pub async fn delete(db: &impl ConnectionTrait, user_id: Id) -> Result<(), Error> {
    let result = Entity::delete_by_id(user_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found());
    }
    Ok(())
}

/// Number of courses, dynamics and approval requests that reference the user
/// as their creator, requester or approver.
pub async fn count_authored_records(db: &impl ConnectionTrait, user_id: Id) -> Result<u64, Error> {
    let courses = courses::Entity::find()
        .filter(courses::Column::CreatorId.eq(user_id))
        .count(db)
        .await?;
    let dynamics = dynamics::Entity::find()
        .filter(dynamics::Column::CreatedBy.eq(user_id))
        .count(db)
        .await?;
    let approvals = approval_requests::Entity::find()
        .filter(
            Condition::any()
                .add(approval_requests::Column::RequesterId.eq(user_id))
                .add(approval_requests::Column::ApproverId.eq(user_id)),
        )
        .count(db)
        .await?;
    debug!("User {user_id} authored {courses} courses, {dynamics} dynamics, {approvals} approvals");
    Ok(courses + dynamics + approvals)
}

pub async fn verify_password(password_to_verify: &str, password_hash: &str) -> Result<(), Error> {
    match password_auth::verify_password(password_to_verify, password_hash) {
        Ok(_) => Ok(()),
        Err(_) => Err(Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordUnauthenticated,
        }),
    }
}

pub fn generate_hash(password: String) -> String {
    password_auth::generate_hash(password)
}

async fn authenticate_user(creds: Credentials, user: Model) -> Result<Option<Model>, Error> {
    match verify_password(&creds.password, &user.password).await {
        Ok(_) => Ok(Some(user)),
        Err(_) => {
            warn!("Failed login attempt for {}", user.email);
            Ok(None)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Backend {
    db: Arc<DatabaseConnection>,
}

#[derive(Debug, Clone, ToSchema, IntoParams, Deserialize)]
#[schema(as = domain::user::Credentials)] // OpenAPI schema
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub next: Option<String>,
}

impl Backend {
    pub fn new(db: &Arc<DatabaseConnection>) -> Self {
        Self { db: Arc::clone(db) }
    }
}

#[async_trait]
impl AuthnBackend for Backend {
    type User = Model;
    type Credentials = Credentials;
    type Error = Error;

    async fn authenticate(
        &self,
        creds: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        match find_by_email(self.db.as_ref(), &creds.email).await? {
            Some(user) => authenticate_user(creds, user).await,
            None => Ok(None),
        }
    }

    async fn get_user(&self, user_id: &UserId<Self>) -> Result<Option<Self::User>, Self::Error> {
        Ok(Entity::find_by_id(*user_id).one(self.db.as_ref()).await?)
    }
}

pub type AuthSession = axum_login::AuthSession<Backend>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn verify_password_accepts_the_hashed_password() {
        let hash = generate_hash("s3cret!".to_string());
        assert!(verify_password("s3cret!", &hash).await.is_ok());

        let err = verify_password("wrong", &hash).await.unwrap_err();
        assert_eq!(err.error_kind, EntityApiErrorKind::RecordUnauthenticated);
    }
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod mock_tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn user_model(password: &str) -> Model {
        let now = Utc::now();
        Model {
            id: Id::new_v4(),
            email: "ana@example.com".to_owned(),
            first_name: "Ana".to_owned(),
            last_name: "Souza".to_owned(),
            display_name: None,
            password: password.to_owned(),
            role: Role::Instructor,
            department_id: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn find_by_email_normalizes_the_address() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        let user = find_by_email(&db, "  Ana@Example.com ").await?;
        assert!(user.is_none());

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains(r#"WHERE \"users\".\"email\" = $1"#));
        assert!(log.contains("ana@example.com"));

        Ok(())
    }

    #[tokio::test]
    async fn find_by_id_returns_not_found_when_missing() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        let result = find_by_id(&db, Id::new_v4()).await;
        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_role_and_department_writes_both_columns() -> Result<(), Error> {
        let user = user_model("hash");
        let department_id = Id::new_v4();
        let updated = Model {
            role: Role::Manager,
            department_id: Some(department_id),
            ..user.clone()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user.clone()]])
            .append_query_results([[updated.clone()]])
            .into_connection();

        let result =
            update_role_and_department(&db, user.id, Role::Manager, Some(department_id)).await?;

        assert_eq!(result.role, Role::Manager);
        assert_eq!(result.department_id, Some(department_id));

        Ok(())
    }

    #[tokio::test]
    async fn delete_of_missing_user_is_not_found() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = delete(&db, Id::new_v4()).await;
        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );

        Ok(())
    }

    #[tokio::test]
    async fn count_authored_records_adds_every_reference() -> Result<(), Error> {
        let count = |n: i64| {
            [std::collections::BTreeMap::from([(
                "num_items",
                sea_orm::Value::BigInt(Some(n)),
            )])]
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([count(2)])
            .append_query_results([count(0)])
            .append_query_results([count(1)])
            .into_connection();

        assert_eq!(count_authored_records(&db, Id::new_v4()).await?, 3);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains(r#"\"courses\".\"creator_id\" = $1"#));
        assert!(log.contains(r#"\"dynamics\".\"created_by\" = $1"#));
        assert!(log.contains(r#"\"approval_requests\".\"requester_id\" = $1 OR"#));

        Ok(())
    }

    #[tokio::test]
    async fn backend_authenticates_with_the_right_password() -> Result<(), Error> {
        let user = user_model(&generate_hash("password".to_string()));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .append_query_results([[user.clone()]])
                .into_connection(),
        );
        let backend = Backend::new(&db);

        let authenticated = backend
            .authenticate(Credentials {
                email: user.email.clone(),
                password: "password".to_string(),
                next: None,
            })
            .await?;
        assert_eq!(authenticated.map(|u| u.id), Some(user.id));

        let rejected = backend
            .authenticate(Credentials {
                email: user.email.clone(),
                password: "nope".to_string(),
                next: None,
            })
            .await?;
        assert!(rejected.is_none());

        Ok(())
    }
}
