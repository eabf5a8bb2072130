//! In-process account store used by tests and local demos.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use emporium_core::{Role, UserId};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::UserStore;
use crate::db::RepositoryError;
use crate::models::{NewUser, User};

#[derive(Debug, Default)]
struct Accounts {
    users: Vec<User>,
    /// token hash -> (user id, expiry)
    tokens: HashMap<String, (UserId, DateTime<Utc>)>,
}

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    inner: RwLock<Accounts>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let accounts = self.inner.read().await;
        Ok(accounts.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut accounts = self.inner.write().await;
        if accounts.users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let user = User {
            id: UserId::new(Uuid::new_v4().simple().to_string()),
            name: user.name,
            email: user.email,
            phone: user.phone,
            address: user.address,
            dob: user.dob,
            role: Role::Customer,
            password_hash: user.password_hash,
            answer_hash: user.answer_hash,
            created_at: Utc::now(),
        };
        accounts.users.push(user.clone());
        Ok(user)
    }

    async fn store_token(
        &self,
        user_id: &UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        self.inner
            .write()
            .await
            .tokens
            .insert(token_hash.to_owned(), (user_id.clone(), expires_at));
        Ok(())
    }

    async fn find_by_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, RepositoryError> {
        let accounts = self.inner.read().await;
        let Some((user_id, expires_at)) = accounts.tokens.get(token_hash) else {
            return Ok(None);
        };
        if *expires_at <= now {
            return Ok(None);
        }
        Ok(accounts.users.iter().find(|u| &u.id == user_id).cloned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ada".into(),
            email: email.into(),
            phone: "555".into(),
            address: "1 Loop".into(),
            dob: "1990-01-01".into(),
            password_hash: "hash".into(),
            answer_hash: "answer".into(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryUserStore::new();
        store.create(new_user("a@b.c")).await.unwrap();
        let err = store.create(new_user("a@b.c")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_token_expiry() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("a@b.c")).await.unwrap();
        let now = Utc::now();
        store
            .store_token(&user.id, "h", now + Duration::hours(1))
            .await
            .unwrap();

        assert!(store.find_by_token("h", now).await.unwrap().is_some());
        assert!(
            store
                .find_by_token("h", now + Duration::hours(2))
                .await
                .unwrap()
                .is_none()
        );
        assert!(store.find_by_token("other", now).await.unwrap().is_none());
    }
}
