//! In-process cache store for tests and local development.

use crate::{CacheResult, CacheStore};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    ttl: Duration,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Cache store backed by a map, with per-entry expiry and Redis-style glob
/// matching for pattern deletes.
///
/// Expiry uses tokio's clock, so tests can pause and advance time.
#[derive(Debug)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, Entry>>,
    enabled: bool,
}

impl MemoryCacheStore {
    /// Creates an empty, enabled store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            enabled: true,
        }
    }

    /// Creates a store that behaves like a cache with no endpoint.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            enabled: false,
        }
    }

    /// Returns the TTL a live entry was written with.
    #[must_use]
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.entries
            .lock()
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.ttl)
    }

    /// Returns true if a live entry exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.ttl(key).is_some()
    }

    /// Returns the live keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .entries
            .lock()
            .iter()
            .filter(|(_, entry)| entry.is_live(now))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Returns the number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys().len()
    }

    /// Returns true if there are no live entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get_raw(&self, key: &str) -> CacheResult<Option<String>> {
        if !self.enabled {
            return Ok(None);
        }

        let now = Instant::now();
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        if !self.enabled {
            return Ok(());
        }

        let ttl = ttl.max(Duration::from_secs(1));
        self.entries.lock().insert(
            key.to_owned(),
            Entry {
                value: value.to_owned(),
                ttl,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        if !self.enabled {
            return Ok(false);
        }

        let now = Instant::now();
        Ok(self
            .entries
            .lock()
            .remove(key)
            .is_some_and(|entry| entry.is_live(now)))
    }

    async fn delete_pattern(&self, pattern: &str) -> CacheResult<u64> {
        if !self.enabled {
            return Ok(0);
        }

        let now = Instant::now();
        let pattern: Vec<char> = pattern.chars().collect();
        let mut entries = self.entries.lock();
        let mut live_matches = 0_u64;

        entries.retain(|key, entry| {
            let chars: Vec<char> = key.chars().collect();
            if glob_match(&pattern, &chars) {
                if entry.is_live(now) {
                    live_matches += 1;
                }
                false
            } else {
                true
            }
        });

        Ok(live_matches)
    }

    async fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Matches `text` against a Redis `KEYS` style glob.
///
/// Supports `*`, `?`, `[abc]`, `[a-z]`, `[^a]` and `\` escapes.
pub fn glob_match(pattern: &[char], text: &[char]) -> bool {
    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() {
            match pattern[p] {
                '*' => {
                    backtrack = Some((p, t));
                    p += 1;
                    continue;
                }
                '?' => {
                    p += 1;
                    t += 1;
                    continue;
                }
                '[' => {
                    if let Some((matched, next)) = match_class(pattern, p, text[t]) {
                        if matched {
                            p = next;
                            t += 1;
                            continue;
                        }
                    } else if text[t] == '[' {
                        p += 1;
                        t += 1;
                        continue;
                    }
                }
                '\\' if p + 1 < pattern.len() => {
                    if pattern[p + 1] == text[t] {
                        p += 2;
                        t += 1;
                        continue;
                    }
                }
                c => {
                    if c == text[t] {
                        p += 1;
                        t += 1;
                        continue;
                    }
                }
            }
        }

        match backtrack {
            Some((star, consumed)) => {
                p = star + 1;
                t = consumed + 1;
                backtrack = Some((star, consumed + 1));
            }
            None => return false,
        }
    }

    pattern[p..].iter().all(|c| *c == '*')
}

/// Evaluates the character class starting at `pattern[start] == '['`.
///
/// Returns whether `c` matched and the index after the closing `]`, or
/// `None` if the class is unterminated.
fn match_class(pattern: &[char], start: usize, c: char) -> Option<(bool, usize)> {
    let mut i = start + 1;
    let negated = matches!(pattern.get(i), Some('^' | '!'));
    if negated {
        i += 1;
    }

    let mut matched = false;
    let mut first = true;
    while i < pattern.len() {
        let current = pattern[i];
        if current == ']' && !first {
            return Some((matched != negated, i + 1));
        }
        first = false;

        let literal = if current == '\\' && i + 1 < pattern.len() {
            i += 1;
            pattern[i]
        } else {
            current
        };

        if pattern.get(i + 1) == Some(&'-') && pattern.get(i + 2).is_some_and(|end| *end != ']') {
            let end = pattern[i + 2];
            if (literal..=end).contains(&c) {
                matched = true;
            }
            i += 3;
        } else {
            if literal == c {
                matched = true;
            }
            i += 1;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, text: &str) -> bool {
        let pattern: Vec<char> = pattern.chars().collect();
        let text: Vec<char> = text.chars().collect();
        glob_match(&pattern, &text)
    }

    #[test]
    fn test_glob_star() {
        assert!(matches("movies:*", "movies:latest:page:1:per:10"));
        assert!(matches("movie*", "movie:slug:alien"));
        assert!(matches("movie*", "movies:count"));
        assert!(!matches("movies:*", "movie:slug:alien"));
        assert!(matches("*", ""));
        assert!(matches("*:count", "articles:count"));
    }

    #[test]
    fn test_glob_question_and_class() {
        assert!(matches("movies:genre:?:*", "movies:genre:7:page:1:per:10"));
        assert!(matches("articles:lang:[ei][nd]:*", "articles:lang:en:page:1:per:10"));
        assert!(!matches("articles:lang:[^e]*", "articles:lang:en:page:1"));
        assert!(matches("page:[0-9]", "page:4"));
        assert!(!matches("page:[0-3]", "page:4"));
    }

    #[test]
    fn test_glob_escape() {
        assert!(matches(r"title\*", "title*"));
        assert!(!matches(r"title\*", "titles"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire() {
        let store = MemoryCacheStore::new();
        store
            .set_raw("k", "v", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(store.ttl("k"), Some(Duration::from_secs(5)));

        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(store.get_raw("k").await.unwrap().as_deref(), Some("v"));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(store.get_raw("k").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_delete_pattern_counts_live_keys() {
        let store = MemoryCacheStore::new();
        let ttl = Duration::from_secs(60);
        store.set_raw("movies:count", "1", ttl).await.unwrap();
        store.set_raw("movie:slug:alien", "{}", ttl).await.unwrap();
        store.set_raw("article:slug:hello", "{}", ttl).await.unwrap();

        assert_eq!(store.delete_pattern("movie*").await.unwrap(), 2);
        assert_eq!(store.keys(), vec!["article:slug:hello".to_string()]);
    }

    #[tokio::test]
    async fn test_disabled_store() {
        let store = MemoryCacheStore::disabled();
        assert!(!store.is_enabled().await);
        store.set_raw("k", "v", Duration::from_secs(5)).await.unwrap();
        assert_eq!(store.get_raw("k").await.unwrap(), None);
        assert!(store.is_empty());
    }
}
