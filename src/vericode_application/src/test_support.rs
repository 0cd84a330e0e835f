//! Hand-rolled port doubles shared by the unit tests in this crate.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use secrecy::{ExposeSecret, Secret};
use tokio::sync::RwLock;
use vericode_core::{
    CodeGenerator, CodeStore, CodeStoreError, Email, Notifier, Password, Purpose, UserStore,
    UserStoreError, VerificationCode, VerificationError,
};

fn key_of(email: &Email) -> String {
    email.as_ref().expose_secret().clone()
}

#[derive(Clone, Default)]
pub struct MockUserStore {
    users: Arc<RwLock<HashSet<String>>>,
    verified: Arc<RwLock<HashSet<String>>>,
    passwords: Arc<RwLock<HashMap<String, String>>>,
    fail: bool,
}

impl MockUserStore {
    pub fn with_users(emails: &[&str]) -> Self {
        Self {
            users: Arc::new(RwLock::new(emails.iter().map(|e| e.to_string()).collect())),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub async fn is_verified(&self, email: &str) -> bool {
        self.verified.read().await.contains(email)
    }

    pub async fn password_of(&self, email: &str) -> Option<String> {
        self.passwords.read().await.get(email).cloned()
    }
}

#[async_trait::async_trait]
impl UserStore for MockUserStore {
    async fn is_identifier_taken(&self, identifier: &Email) -> Result<bool, UserStoreError> {
        if self.fail {
            return Err(UserStoreError::UnexpectedError("database offline".into()));
        }
        Ok(self.users.read().await.contains(&key_of(identifier)))
    }

    async fn reset_password(
        &self,
        identifier: &Email,
        new_password: Password,
    ) -> Result<(), UserStoreError> {
        let email = key_of(identifier);
        if !self.users.read().await.contains(&email) {
            return Err(UserStoreError::UserNotFound);
        }
        self.passwords
            .write()
            .await
            .insert(email, new_password.as_ref().expose_secret().clone());
        Ok(())
    }

    async fn mark_email_verified(&self, identifier: &Email) -> Result<(), UserStoreError> {
        self.verified.write().await.insert(key_of(identifier));
        Ok(())
    }
}

/// Code store without expiry; consumption semantics match the real stores.
#[derive(Clone, Default)]
pub struct MockCodeStore {
    codes: Arc<RwLock<HashMap<(String, Purpose), String>>>,
    last_ttl: Arc<RwLock<Option<Duration>>>,
    deletes: Arc<AtomicUsize>,
    fail: bool,
}

impl MockCodeStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub async fn stored(&self, email: &Email, purpose: Purpose) -> Option<String> {
        self.codes
            .read()
            .await
            .get(&(key_of(email), purpose))
            .cloned()
    }

    pub async fn is_empty(&self) -> bool {
        self.codes.read().await.is_empty()
    }

    pub async fn last_ttl(&self) -> Option<Duration> {
        *self.last_ttl.read().await
    }

    pub fn delete_calls(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<(), CodeStoreError> {
        if self.fail {
            return Err(CodeStoreError::PersistenceFailure("store offline".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CodeStore for MockCodeStore {
    async fn register(
        &self,
        identifier: Email,
        purpose: Purpose,
        code: VerificationCode,
        ttl: Duration,
    ) -> Result<(), CodeStoreError> {
        self.check_online()?;
        self.codes
            .write()
            .await
            .insert((key_of(&identifier), purpose), code.as_str().to_string());
        *self.last_ttl.write().await = Some(ttl);
        Ok(())
    }

    async fn verify_and_consume(
        &self,
        identifier: &Email,
        code: &VerificationCode,
        purpose: Purpose,
    ) -> Result<bool, CodeStoreError> {
        self.check_online()?;
        let mut codes = self.codes.write().await;
        let key = (key_of(identifier), purpose);
        match codes.get(&key) {
            Some(stored) if code.matches(stored) => {
                codes.remove(&key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, identifier: &Email, purpose: Purpose) -> Result<(), CodeStoreError> {
        self.check_online()?;
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.codes
            .write()
            .await
            .remove(&(key_of(identifier), purpose));
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub subject: String,
    pub recipient: String,
    pub body: String,
}

#[derive(Clone, Default)]
pub struct MockNotifier {
    sent: Arc<RwLock<Vec<SentMessage>>>,
    fail: bool,
}

impl MockNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.read().await.clone()
    }
}

#[async_trait::async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, subject: &str, recipient: &Email, body: &str) -> Result<(), String> {
        if self.fail {
            return Err("mail relay unavailable".to_string());
        }
        self.sent.write().await.push(SentMessage {
            subject: subject.to_string(),
            recipient: key_of(recipient),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// Hands out a fixed sequence of codes, ignoring the requested length.
pub struct SequenceGenerator {
    codes: Mutex<VecDeque<String>>,
}

impl SequenceGenerator {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
        }
    }
}

impl CodeGenerator for SequenceGenerator {
    fn generate(
        &self,
        length: usize,
        _purpose: Purpose,
    ) -> Result<VerificationCode, VerificationError> {
        if length == 0 {
            return Err(VerificationError::InvalidLength);
        }
        let next = self
            .codes
            .lock()
            .unwrap()
            .pop_front()
            .expect("sequence exhausted");
        Ok(VerificationCode::new(next))
    }

    fn generate_password(&self, _length: usize) -> Result<Password, VerificationError> {
        Ok(Password::try_from(Secret::from("Replacement1".to_string())).unwrap())
    }
}
