use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use vericode_core::{Email, Password, UserStore, UserStoreError};

#[derive(Default, Clone)]
pub struct HashMapUserStore {
    users: Arc<RwLock<HashMap<Email, Password>>>,
    verified_emails: Arc<RwLock<HashSet<Email>>>,
}

impl HashMapUserStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            verified_emails: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    pub async fn add_user(&self, email: Email, password: Password) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&email) {
            return Err(UserStoreError::UserAlreadyExists);
        }
        users.insert(email, password);
        Ok(())
    }

    pub async fn password_for(&self, email: &Email) -> Result<Password, UserStoreError> {
        let users = self.users.read().await;
        users.get(email).cloned().ok_or(UserStoreError::UserNotFound)
    }

    pub async fn is_email_verified(&self, email: &Email) -> bool {
        self.verified_emails.read().await.contains(email)
    }
}

#[async_trait::async_trait]
impl UserStore for HashMapUserStore {
    async fn is_identifier_taken(&self, identifier: &Email) -> Result<bool, UserStoreError> {
        let users = self.users.read().await;
        Ok(users.contains_key(identifier))
    }

    async fn reset_password(
        &self,
        identifier: &Email,
        new_password: Password,
    ) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;
        let password = users
            .get_mut(identifier)
            .ok_or(UserStoreError::UserNotFound)?;

        *password = new_password;
        Ok(())
    }

    async fn mark_email_verified(&self, identifier: &Email) -> Result<(), UserStoreError> {
        let mut verified = self.verified_emails.write().await;
        verified.insert(identifier.clone());
        Ok(())
    }
}
