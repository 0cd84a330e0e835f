use std::{
    sync::{Arc, LazyLock},
    time::Duration,
};

use redis::{Client, Commands, Connection, RedisResult, Script};
use secrecy::ExposeSecret;
use tokio::sync::Mutex;

use vericode_core::{CodeStore, CodeStoreError, Email, Purpose, VerificationCode};

use crate::config::RedisSettings;

/// Code store backed by Redis, for deployments where several processes share
/// codes. Expiry is Redis' own key TTL.
#[derive(Clone)]
pub struct RedisCodeStore {
    conn: Arc<Mutex<Connection>>,
}

impl RedisCodeStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Open a dedicated connection to the configured Redis host.
    pub fn connect(settings: &RedisSettings) -> RedisResult<Self> {
        let conn = get_redis_client(settings)?.get_connection()?;
        Ok(Self::new(Arc::new(Mutex::new(conn))))
    }
}

pub fn get_redis_client(settings: &RedisSettings) -> RedisResult<Client> {
    Client::open(settings.url())
}

// Compare-and-delete in one server-side step so two verifiers cannot both
// observe the code before either deletes it.
static CONSUME_SCRIPT: LazyLock<Script> = LazyLock::new(|| {
    Script::new(
        r"
        if redis.call('GET', KEYS[1]) == ARGV[1] then
            return redis.call('DEL', KEYS[1])
        end
        return 0
        ",
    )
});

#[async_trait::async_trait]
impl CodeStore for RedisCodeStore {
    #[tracing::instrument(name = "RedisCodeStore::register", skip(self, identifier, code))]
    async fn register(
        &self,
        identifier: Email,
        purpose: Purpose,
        code: VerificationCode,
        ttl: Duration,
    ) -> Result<(), CodeStoreError> {
        let key = get_key(&identifier, purpose);
        let seconds = expiry_seconds(ttl);

        let mut conn = self.conn.lock().await;
        conn.set_ex(key, code.as_str(), seconds)
            .map_err(|e| CodeStoreError::PersistenceFailure(e.to_string()))
    }

    #[tracing::instrument(name = "RedisCodeStore::verify_and_consume", skip_all)]
    async fn verify_and_consume(
        &self,
        identifier: &Email,
        code: &VerificationCode,
        purpose: Purpose,
    ) -> Result<bool, CodeStoreError> {
        let key = get_key(identifier, purpose);

        let mut conn = self.conn.lock().await;
        let deleted: i64 = CONSUME_SCRIPT
            .key(key)
            .arg(code.as_str())
            .invoke(&mut *conn)
            .map_err(|e| CodeStoreError::PersistenceFailure(e.to_string()))?;

        Ok(deleted == 1)
    }

    #[tracing::instrument(name = "RedisCodeStore::delete", skip(self, identifier))]
    async fn delete(&self, identifier: &Email, purpose: Purpose) -> Result<(), CodeStoreError> {
        let key = get_key(identifier, purpose);

        let mut conn = self.conn.lock().await;
        conn.del::<_, ()>(key)
            .map_err(|e| CodeStoreError::PersistenceFailure(e.to_string()))
    }
}

// SET EX takes whole seconds and rejects 0, so partial seconds round up.
fn expiry_seconds(ttl: Duration) -> u64 {
    ttl.as_secs()
        .saturating_add(u64::from(ttl.subsec_nanos() > 0))
        .max(1)
}

// Key prefix keeps codes apart from other data; the purpose segment keeps
// purposes apart from each other.
const VERIFICATION_CODE_KEY_PREFIX: &str = "verification_code:";

fn get_key(identifier: &Email, purpose: Purpose) -> String {
    format!(
        "{}{}:{}",
        VERIFICATION_CODE_KEY_PREFIX,
        purpose.as_str(),
        identifier.as_ref().expose_secret()
    )
}
