//! Result cache - memoized `ProcessingResult`s keyed by content hash

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use lru::LruCache;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use crate::domain::entities::{PlayerSnapshot, SituationalContext};
use crate::domain::value_objects::{ProcessingResult, RecognitionConfig};

/// Size and age bounds supplied by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub max_entries: usize,
    pub ttl: Duration,
    /// Lifetime of results produced while a backend was down
    pub degraded_ttl: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            max_entries: 1024,
            ttl: Duration::from_secs(30 * 60),
            degraded_ttl: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub hit_rate: f64,
}

struct CacheEntry {
    stored_at: Instant,
    ttl: Duration,
    result: ProcessingResult,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.stored_at.elapsed() > self.ttl
    }
}

/// LRU-bounded cache with per-entry expiry
pub struct ResultCache {
    policy: CachePolicy,
    entries: Mutex<LruCache<String, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResultCache {
    pub fn new(policy: CachePolicy) -> Self {
        let capacity = NonZeroUsize::new(policy.max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            policy,
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// SHA-256 over the input, the context, the player and the settings that steer routing
    pub fn key(
        input: &str,
        context: &SituationalContext,
        player: Option<&PlayerSnapshot>,
        config: &RecognitionConfig,
    ) -> String {
        let settings = (
            config.method,
            config.text_match_precision,
            config.enable_programmatic_calculation,
            config.ai_backup_enabled,
        );

        let mut hasher = Sha256::new();
        hasher.update(input.as_bytes());
        hasher.update(b"\x1f");
        hasher.update(serde_json::to_vec(context).unwrap_or_default());
        hasher.update(b"\x1f");
        hasher.update(serde_json::to_vec(&player).unwrap_or_default());
        hasher.update(b"\x1f");
        hasher.update(serde_json::to_vec(&settings).unwrap_or_default());
        hex::encode(hasher.finalize())
    }

    pub async fn get(&self, key: &str) -> Option<ProcessingResult> {
        let mut entries = self.entries.lock().await;

        let expired = match entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Result cache hit");
                return Some(entry.result.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.pop(key);
            tracing::debug!("Expired result cache entry removed");
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store a result; degraded ones live for `degraded_ttl` only
    pub async fn insert(&self, key: String, result: ProcessingResult) {
        if self.policy.max_entries == 0 {
            return;
        }

        let ttl = if result.degraded {
            self.policy.degraded_ttl
        } else {
            self.policy.ttl
        };

        let mut entries = self.entries.lock().await;
        if let Some((evicted, _)) = entries.push(
            key.clone(),
            CacheEntry {
                stored_at: Instant::now(),
                ttl,
                result,
            },
        ) {
            if evicted != key {
                tracing::debug!("Result cache full, least recently used entry evicted");
            }
        }
    }

    pub async fn clear(&self) {
        let mut entries = self.entries.lock().await;
        let removed = entries.len();
        entries.clear();
        tracing::info!(removed, "Result cache cleared");
    }

    pub async fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;
        CacheStats {
            hits,
            misses,
            entries: self.entries.lock().await.len(),
            hit_rate: if lookups == 0 {
                0.0
            } else {
                hits as f64 / lookups as f64
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{
        MatchPrecision, ProcessingMethod, RealmStage, RecognitionMethod, ScenarioType,
        UserPreferences,
    };
    use std::sync::Arc;

    fn result(input: &str) -> ProcessingResult {
        ProcessingResult {
            scenario: ScenarioType::Combat,
            confidence: 0.95,
            method: ProcessingMethod::TextOnly,
            calculation: None,
            final_content: format!("You decide to {}.", input),
            processing_time_ms: 3,
            cost_estimate: 0.0,
            degraded: false,
            classification_reasoning: vec![],
            input: input.to_string(),
        }
    }

    #[test]
    fn test_key_depends_on_every_part() {
        let context = SituationalContext::new().with_location("Azure Peak");
        let player = PlayerSnapshot::new(3, RealmStage::Late);
        let config = RecognitionConfig::default();

        let base = ResultCache::key("attack", &context, Some(&player), &config);
        assert_eq!(base.len(), 64);
        assert_eq!(base, ResultCache::key("attack", &context, Some(&player), &config));
        assert_ne!(base, ResultCache::key("attack!", &context, Some(&player), &config));
        assert_ne!(
            base,
            ResultCache::key("attack", &SituationalContext::default(), Some(&player), &config)
        );
        assert_ne!(base, ResultCache::key("attack", &context, None, &config));
        assert_ne!(
            base,
            ResultCache::key(
                "attack",
                &context,
                Some(&PlayerSnapshot::new(4, RealmStage::Late)),
                &config
            )
        );
    }

    #[test]
    fn test_key_follows_routing_settings() {
        let context = SituationalContext::default();
        let config = RecognitionConfig::default();
        let base = ResultCache::key("attack", &context, None, &config);

        let variants = [
            config.clone().with_method(RecognitionMethod::TextOnly),
            config.clone().with_precision(MatchPrecision::Strict),
            RecognitionConfig {
                enable_programmatic_calculation: false,
                ..config.clone()
            },
            RecognitionConfig {
                ai_backup_enabled: false,
                ..config.clone()
            },
        ];
        for variant in &variants {
            assert_ne!(base, ResultCache::key("attack", &context, None, variant), "{:?}", variant);
        }

        // preferences only feed the recommender
        let preferences_only = RecognitionConfig {
            preferences: UserPreferences {
                prefer_speed: false,
                prefer_cost: true,
                prefer_accuracy: true,
            },
            ..config.clone()
        };
        assert_eq!(base, ResultCache::key("attack", &context, None, &preferences_only));
    }

    #[tokio::test]
    async fn test_hit_and_miss_counting() {
        let cache = ResultCache::new(CachePolicy::default());
        assert!(cache.get("k").await.is_none());

        cache.insert("k".to_string(), result("attack")).await;
        assert_eq!(cache.get("k").await.unwrap().input, "attack");

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert!((stats.hit_rate - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_expired_entries_are_removed() {
        let cache = ResultCache::new(CachePolicy {
            max_entries: 8,
            ttl: Duration::from_millis(10),
            degraded_ttl: Duration::from_millis(10),
        });
        cache.insert("k".to_string(), result("attack")).await;
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert!(cache.get("k").await.is_none());
        assert_eq!(cache.stats().await.entries, 0);
    }

    #[tokio::test]
    async fn test_degraded_results_expire_sooner() {
        let cache = ResultCache::new(CachePolicy {
            max_entries: 8,
            ttl: Duration::from_secs(60),
            degraded_ttl: Duration::from_millis(10),
        });
        cache.insert("healthy".to_string(), result("attack")).await;
        cache
            .insert(
                "degraded".to_string(),
                ProcessingResult {
                    degraded: true,
                    ..result("wander")
                },
            )
            .await;

        assert!(cache.get("degraded").await.is_some());
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert!(cache.get("degraded").await.is_none());
        assert!(cache.get("healthy").await.is_some());
    }

    #[tokio::test]
    async fn test_capacity_evicts_least_recently_used() {
        let cache = ResultCache::new(CachePolicy {
            max_entries: 2,
            ..CachePolicy::default()
        });
        cache.insert("a".to_string(), result("a")).await;
        cache.insert("b".to_string(), result("b")).await;
        assert!(cache.get("a").await.is_some());
        cache.insert("c".to_string(), result("c")).await;

        assert!(cache.get("b").await.is_none());
        assert!(cache.get("a").await.is_some());
        assert!(cache.get("c").await.is_some());
        assert_eq!(cache.stats().await.entries, 2);
    }

    #[tokio::test]
    async fn test_zero_capacity_disables_storage() {
        let cache = ResultCache::new(CachePolicy {
            max_entries: 0,
            ..CachePolicy::default()
        });
        cache.insert("a".to_string(), result("a")).await;
        assert!(cache.get("a").await.is_none());
        assert_eq!(cache.stats().await.entries, 0);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_of_same_key() {
        let cache = Arc::new(ResultCache::new(CachePolicy::default()));
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.insert("same".to_string(), result("attack")).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(cache.stats().await.entries, 1);
        cache.clear().await;
        assert_eq!(cache.stats().await.entries, 0);
    }
}
