use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{NewUser, User};
use super::errors::AccountError;

/// Persistence for accounts.
///
/// Lookups never return logically deleted users. `create` and `update`
/// report a taken email as [`AccountError::EmailExists`]; `update` and
/// `delete` report a missing user as [`AccountError::NotFound`].
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, new_user: NewUser) -> Result<User, AccountError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AccountError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountError>;
    async fn update(&self, user: &User) -> Result<User, AccountError>;
    async fn delete(&self, id: Uuid) -> Result<(), AccountError>;
}

/// Simple in-memory repository for tests, benches and doc examples
pub mod mock {
    use super::*;
    use chrono::{SubsecRound, Utc};
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    struct Row {
        user: User,
        deleted: bool,
    }

    #[derive(Default)]
    pub struct InMemoryUserRepository {
        rows: Mutex<HashMap<Uuid, Row>>,
    }

    impl InMemoryUserRepository {
        /// Raw stored hash of any row, deleted or not.
        pub async fn stored_hash(&self, id: Uuid) -> Option<String> {
            self.rows.lock().await.get(&id).map(|r| r.user.password_hash.clone())
        }

        fn email_taken(rows: &HashMap<Uuid, Row>, email: &str, except: Option<Uuid>) -> bool {
            // Deleted rows keep their email, like the unique index does
            rows.values().any(|r| r.user.email == email && Some(r.user.id) != except)
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn create(&self, new_user: NewUser) -> Result<User, AccountError> {
            let mut rows = self.rows.lock().await;
            if Self::email_taken(&rows, &new_user.email, None) {
                return Err(AccountError::EmailExists);
            }
            let now = Utc::now().trunc_subsecs(6);
            let user = User {
                id: Uuid::new_v4(),
                email: new_user.email,
                password_hash: new_user.password_hash,
                name: new_user.name,
                created_at: now,
                updated_at: now,
            };
            rows.insert(user.id, Row { user: user.clone(), deleted: false });
            Ok(user)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AccountError> {
            let rows = self.rows.lock().await;
            Ok(rows.get(&id).filter(|r| !r.deleted).map(|r| r.user.clone()))
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountError> {
            let rows = self.rows.lock().await;
            Ok(rows
                .values()
                .find(|r| !r.deleted && r.user.email == email)
                .map(|r| r.user.clone()))
        }

        async fn update(&self, user: &User) -> Result<User, AccountError> {
            let mut rows = self.rows.lock().await;
            if Self::email_taken(&rows, &user.email, Some(user.id)) {
                return Err(AccountError::EmailExists);
            }
            match rows.get_mut(&user.id) {
                Some(row) if !row.deleted => {
                    row.user = user.clone();
                    Ok(user.clone())
                }
                _ => Err(AccountError::NotFound),
            }
        }

        async fn delete(&self, id: Uuid) -> Result<(), AccountError> {
            let mut rows = self.rows.lock().await;
            match rows.get_mut(&id) {
                Some(row) if !row.deleted => {
                    row.deleted = true;
                    row.user.updated_at = Utc::now();
                    Ok(())
                }
                _ => Err(AccountError::NotFound),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn new_user(email: &str) -> NewUser {
            NewUser { email: email.into(), password_hash: "$argon2id$fake".into(), name: "N".into() }
        }

        #[tokio::test]
        async fn duplicate_email_is_rejected_even_after_delete() {
            let repo = InMemoryUserRepository::default();
            let u = repo.create(new_user("a@b.com")).await.unwrap();
            assert!(matches!(repo.create(new_user("a@b.com")).await, Err(AccountError::EmailExists)));
            repo.delete(u.id).await.unwrap();
            assert!(matches!(repo.create(new_user("a@b.com")).await, Err(AccountError::EmailExists)));
        }

        #[tokio::test]
        async fn deleted_rows_are_invisible() {
            let repo = InMemoryUserRepository::default();
            let u = repo.create(new_user("a@b.com")).await.unwrap();
            repo.delete(u.id).await.unwrap();
            assert!(repo.find_by_id(u.id).await.unwrap().is_none());
            assert!(repo.find_by_email("a@b.com").await.unwrap().is_none());
            assert!(matches!(repo.update(&u).await, Err(AccountError::NotFound)));
            assert!(matches!(repo.delete(u.id).await, Err(AccountError::NotFound)));
        }

        #[tokio::test]
        async fn update_to_taken_email_conflicts() {
            let repo = InMemoryUserRepository::default();
            repo.create(new_user("a@b.com")).await.unwrap();
            let mut other = repo.create(new_user("c@d.com")).await.unwrap();
            other.email = "a@b.com".into();
            assert!(matches!(repo.update(&other).await, Err(AccountError::EmailExists)));
        }
    }
}
