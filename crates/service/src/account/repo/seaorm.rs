use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::account::domain::{NewUser, User};
use crate::account::errors::AccountError;
use crate::account::repository::UserRepository;

pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn to_model(user: &User) -> models::user::Model {
    models::user::Model {
        id: user.id,
        email: user.email.clone(),
        password_hash: user.password_hash.clone(),
        name: user.name.clone(),
        created_at: user.created_at.into(),
        updated_at: user.updated_at.into(),
        deleted_at: None,
    }
}

#[async_trait::async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AccountError> {
        let created = models::user::create(&self.db, &new_user.email, &new_user.password_hash, &new_user.name).await?;
        Ok(created.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AccountError> {
        let found = models::user::find_active_by_id(&self.db, id).await?;
        Ok(found.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountError> {
        let found = models::user::find_active_by_email(&self.db, email).await?;
        Ok(found.map(User::from))
    }

    async fn update(&self, user: &User) -> Result<User, AccountError> {
        let updated = models::user::update(&self.db, &to_model(user)).await?;
        Ok(updated.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AccountError> {
        models::user::soft_delete(&self.db, id).await?;
        tracing::debug!(user_id = %id, "user_soft_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

    const HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2hoYXNoaGFzaA";

    fn row(email: &str) -> models::user::Model {
        let now = Utc::now().into();
        models::user::Model {
            id: Uuid::new_v4(),
            email: email.into(),
            password_hash: HASH.into(),
            name: "A".into(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn create_maps_row_into_domain_user() {
        let r = row("a@b.com");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![r.clone()]])
            .into_connection();
        let repo = SeaOrmUserRepository::new(db);
        let user = repo
            .create(NewUser { email: r.email.clone(), password_hash: HASH.into(), name: "A".into() })
            .await
            .unwrap();
        assert_eq!(user.id, r.id);
        assert_eq!(user.password_hash, HASH);
    }

    #[tokio::test]
    async fn missing_email_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<models::user::Model>::new()])
            .into_connection();
        let repo = SeaOrmUserRepository::new(db);
        assert!(repo.find_by_email("nobody@b.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_of_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 0 }])
            .into_connection();
        let repo = SeaOrmUserRepository::new(db);
        let user = User::from(row("a@b.com"));
        assert!(matches!(repo.update(&user).await, Err(AccountError::NotFound)));
    }

    #[tokio::test]
    async fn unclassified_storage_errors_stay_opaque() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".into())])
            .into_connection();
        let repo = SeaOrmUserRepository::new(db);
        assert!(matches!(repo.find_by_id(Uuid::new_v4()).await, Err(AccountError::Storage(_))));
    }

    #[tokio::test]
    async fn live_round_trip_with_logical_delete() {
        if crate::test_support::db_tests_disabled() {
            return;
        }
        let db = crate::test_support::get_db().await.unwrap();
        let repo = SeaOrmUserRepository::new(db);
        let email = format!("live-{}@example.com", Uuid::new_v4());

        let created = repo
            .create(NewUser { email: email.clone(), password_hash: HASH.into(), name: "Live".into() })
            .await
            .unwrap();
        assert_eq!(repo.find_by_email(&email).await.unwrap().unwrap().id, created.id);

        let dup = repo
            .create(NewUser { email: email.clone(), password_hash: HASH.into(), name: "Again".into() })
            .await;
        assert!(matches!(dup, Err(AccountError::EmailExists)));

        repo.delete(created.id).await.unwrap();
        assert!(repo.find_by_id(created.id).await.unwrap().is_none());
        assert!(matches!(repo.delete(created.id).await, Err(AccountError::NotFound)));

        models::user::hard_delete(&repo.db, created.id).await.unwrap();
    }
}
