use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use dashmap::DashMap;
use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};

use vericode_core::{CodeStore, CodeStoreError, Email, Purpose, VerificationCode};

/// Composite key: one live code per identifier and purpose.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CodeKey {
    identifier: Email,
    purpose: Purpose,
}

impl CodeKey {
    fn new(identifier: Email, purpose: Purpose) -> Self {
        Self {
            identifier,
            purpose,
        }
    }
}

#[derive(Debug)]
struct CodeRecord {
    code: VerificationCode,
    expires_at: Instant,
}

impl CodeRecord {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

type Codes = DashMap<CodeKey, CodeRecord>;

/// In-process code store.
///
/// Every operation on a key runs under the write lock of the key's shard, so
/// `register` and `verify_and_consume` on the same key are linearizable and a
/// correct code is consumed by exactly one caller.
#[derive(Default, Clone)]
pub struct HashMapCodeStore {
    codes: Arc<Codes>,
}

impl HashMapCodeStore {
    pub fn new() -> Self {
        Self {
            codes: Arc::new(DashMap::new()),
        }
    }

    /// Number of records held, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Drop every expired record. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        purge(&self.codes, Instant::now())
    }

    /// Purge expired records every `period` on a background task. The task
    /// ends on its own once the last clone of the store is dropped.
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let codes: Weak<Codes> = Arc::downgrade(&self.codes);
        let period = period.max(Duration::from_millis(1));

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(codes) = codes.upgrade() else {
                    break;
                };
                let purged = purge(&codes, Instant::now());
                if purged > 0 {
                    tracing::debug!(purged, event = "expired_codes_purged", "Purged expired codes");
                }
            }
        })
    }
}

fn purge(codes: &Codes, now: Instant) -> usize {
    let mut purged = 0;
    codes.retain(|_, record| {
        let expired = record.is_expired(now);
        purged += usize::from(expired);
        !expired
    });
    purged
}

#[async_trait::async_trait]
impl CodeStore for HashMapCodeStore {
    #[tracing::instrument(name = "HashMapCodeStore::register", skip(self, identifier, code))]
    async fn register(
        &self,
        identifier: Email,
        purpose: Purpose,
        code: VerificationCode,
        ttl: Duration,
    ) -> Result<(), CodeStoreError> {
        let expires_at = Instant::now().checked_add(ttl).ok_or_else(|| {
            CodeStoreError::PersistenceFailure(format!("ttl of {ttl:?} is out of range"))
        })?;

        self.codes
            .insert(CodeKey::new(identifier, purpose), CodeRecord { code, expires_at });
        Ok(())
    }

    #[tracing::instrument(name = "HashMapCodeStore::verify_and_consume", skip_all)]
    async fn verify_and_consume(
        &self,
        identifier: &Email,
        code: &VerificationCode,
        purpose: Purpose,
    ) -> Result<bool, CodeStoreError> {
        let key = CodeKey::new(identifier.clone(), purpose);
        let now = Instant::now();

        // Remove when the presented code is right, or lazily when the record
        // is already dead. A wrong guess against a live record removes nothing.
        let removed = self.codes.remove_if(&key, |_, record| {
            record.is_expired(now) || record.code == *code
        });

        Ok(matches!(removed, Some((_, record)) if !record.is_expired(now)))
    }

    #[tracing::instrument(name = "HashMapCodeStore::delete", skip(self, identifier))]
    async fn delete(&self, identifier: &Email, purpose: Purpose) -> Result<(), CodeStoreError> {
        self.codes.remove(&CodeKey::new(identifier.clone(), purpose));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(10 * 60);

    fn email() -> Email {
        Email::parse("alice@example.com").unwrap()
    }

    fn code(value: &str) -> VerificationCode {
        VerificationCode::new(value.to_string())
    }

    async fn seeded(value: &str) -> HashMapCodeStore {
        let store = HashMapCodeStore::new();
        store
            .register(email(), Purpose::EmailVerification, code(value), TTL)
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_correct_code_is_single_use() {
        let store = seeded("123456").await;

        assert!(store.verify_and_consume(&email(), &code("123456"), Purpose::EmailVerification).await.unwrap());
        assert!(!store.verify_and_consume(&email(), &code("123456"), Purpose::EmailVerification).await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_code_does_not_consume() {
        let store = seeded("123456").await;

        assert!(!store.verify_and_consume(&email(), &code("654321"), Purpose::EmailVerification).await.unwrap());
        assert!(store.verify_and_consume(&email(), &code("123456"), Purpose::EmailVerification).await.unwrap());
    }

    #[tokio::test]
    async fn test_reregister_supersedes_previous_code() {
        let store = seeded("111111").await;
        store
            .register(email(), Purpose::EmailVerification, code("222222"), TTL)
            .await
            .unwrap();

        assert!(!store.verify_and_consume(&email(), &code("111111"), Purpose::EmailVerification).await.unwrap());
        assert!(store.verify_and_consume(&email(), &code("222222"), Purpose::EmailVerification).await.unwrap());
    }

    #[tokio::test]
    async fn test_purposes_do_not_collide() {
        let store = seeded("123456").await;
        store
            .register(email(), Purpose::PasswordReset, code("Reset9"), TTL)
            .await
            .unwrap();

        assert_eq!(store.len(), 2);
        assert!(!store.verify_and_consume(&email(), &code("123456"), Purpose::PasswordReset).await.unwrap());
        assert!(store.verify_and_consume(&email(), &code("Reset9"), Purpose::PasswordReset).await.unwrap());
        assert!(store.verify_and_consume(&email(), &code("123456"), Purpose::EmailVerification).await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_code_fails_once_ttl_elapsed() {
        let store = seeded("123456").await;

        tokio::time::advance(TTL).await;

        assert!(!store.verify_and_consume(&email(), &code("123456"), Purpose::EmailVerification).await.unwrap());
        // Expired record was purged on access.
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_code_verifies_just_before_expiry() {
        let store = seeded("123456").await;

        tokio::time::advance(TTL - Duration::from_secs(1)).await;

        assert!(store.verify_and_consume(&email(), &code("123456"), Purpose::EmailVerification).await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_code_against_expired_record_purges_it() {
        let store = seeded("123456").await;

        tokio::time::advance(TTL + Duration::from_secs(1)).await;

        assert!(!store.verify_and_consume(&email(), &code("000000"), Purpose::EmailVerification).await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = seeded("123456").await;

        store.delete(&email(), Purpose::EmailVerification).await.unwrap();
        store.delete(&email(), Purpose::EmailVerification).await.unwrap();

        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired_only_removes_dead_records() {
        let store = HashMapCodeStore::new();
        store
            .register(email(), Purpose::EmailVerification, code("123456"), Duration::from_secs(30))
            .await
            .unwrap();
        store
            .register(email(), Purpose::PasswordReset, code("Reset9"), TTL)
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(31)).await;

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_purge_count_ignores_concurrent_inserts() {
        const EXPIRED: usize = 64;

        let store = HashMapCodeStore::new();
        for i in 0..EXPIRED {
            let identifier = Email::parse(&format!("stale{i}@example.com")).unwrap();
            store
                .register(identifier, Purpose::EmailVerification, code("123456"), Duration::from_millis(1))
                .await
                .unwrap();
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        let inserter = {
            let store = store.clone();
            tokio::spawn(async move {
                for i in 0..512 {
                    let identifier = Email::parse(&format!("fresh{i}@example.com")).unwrap();
                    store
                        .register(identifier, Purpose::PasswordReset, code("Reset9"), TTL)
                        .await
                        .unwrap();
                }
            })
        };
        let purged = store.purge_expired();
        inserter.await.unwrap();

        assert_eq!(purged, EXPIRED);
        assert_eq!(store.len(), 512);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_purges_in_background() {
        let store = HashMapCodeStore::new();
        store
            .register(email(), Purpose::EmailVerification, code("123456"), Duration::from_secs(30))
            .await
            .unwrap();

        let _sweeper = store.spawn_sweeper(Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(61)).await;

        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_stops_when_store_dropped() {
        let store = HashMapCodeStore::new();
        let sweeper = store.spawn_sweeper(Duration::from_secs(60));
        drop(store);

        tokio::time::sleep(Duration::from_secs(61)).await;

        assert!(sweeper.is_finished());
    }

    #[tokio::test]
    async fn test_out_of_range_ttl_is_persistence_failure() {
        let store = HashMapCodeStore::new();
        let result = store
            .register(email(), Purpose::EmailVerification, code("123456"), Duration::MAX)
            .await;
        assert!(matches!(result, Err(CodeStoreError::PersistenceFailure(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_consumption_has_one_winner() {
        let store = seeded("123456").await;

        let attempts: Vec<_> = (0..32)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .verify_and_consume(&email(), &code("123456"), Purpose::EmailVerification)
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut successes = 0;
        for attempt in attempts {
            if attempt.await.unwrap() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_register_and_verify_never_double_consume() {
        const CODES: usize = 4;
        const VERIFIERS_PER_CODE: usize = 4;

        for round in 0..50 {
            let store = HashMapCodeStore::new();
            let codes: Vec<String> = (0..CODES).map(|i| format!("{round:04}{i:02}")).collect();
            let barrier = Arc::new(tokio::sync::Barrier::new(CODES * (1 + VERIFIERS_PER_CODE) + 1));

            let registers: Vec<_> = codes
                .iter()
                .cloned()
                .map(|value| {
                    let store = store.clone();
                    let barrier = barrier.clone();
                    tokio::spawn(async move {
                        barrier.wait().await;
                        store
                            .register(email(), Purpose::EmailVerification, code(&value), TTL)
                            .await
                            .unwrap();
                    })
                })
                .collect();

            let verifiers: Vec<_> = codes
                .iter()
                .enumerate()
                .flat_map(|(index, value)| {
                    std::iter::repeat_n((index, value.clone()), VERIFIERS_PER_CODE)
                })
                .chain(std::iter::once((CODES, "999999".to_string())))
                .map(|(index, value)| {
                    let store = store.clone();
                    let barrier = barrier.clone();
                    tokio::spawn(async move {
                        barrier.wait().await;
                        let verified = store
                            .verify_and_consume(&email(), &code(&value), Purpose::EmailVerification)
                            .await
                            .unwrap();
                        (index, verified)
                    })
                })
                .collect();

            for register in registers {
                register.await.unwrap();
            }
            let mut successes = [0usize; CODES + 1];
            for verifier in verifiers {
                let (index, verified) = verifier.await.unwrap();
                if verified {
                    successes[index] += 1;
                }
            }

            // Never-registered code.
            assert_eq!(successes[CODES], 0, "round {round}");
            for (index, count) in successes[..CODES].iter().enumerate() {
                assert!(*count <= 1, "round {round}: code {index} consumed {count} times");
            }

            // One record at most survives, and only a code nobody consumed
            // can be in it.
            let mut survivors = Vec::new();
            for (index, value) in codes.iter().enumerate() {
                if store
                    .verify_and_consume(&email(), &code(value), Purpose::EmailVerification)
                    .await
                    .unwrap()
                {
                    survivors.push(index);
                }
            }
            assert!(survivors.len() <= 1, "round {round}");
            for index in survivors {
                assert_eq!(successes[index], 0, "round {round}: code {index} verified twice");
            }
            assert!(store.is_empty());
        }
    }
}
