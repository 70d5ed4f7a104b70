//! 内存 TTL 缓存
//!
//! 使用 DashMap 实现无锁并发读写。条目在写入后 `ttl` 时间内有效。
//! 过期条目在读取该 key 时移除，每次写入前也会清理全部过期条目，
//! 因此缓存大小受最近 `ttl` 内写入的 key 数量约束。`ttl` 为 0 时等同于关闭缓存。

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

#[derive(Debug, Clone)]
pub struct TtlCache<V: Clone> {
    entries: Arc<DashMap<String, (Instant, V)>>,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// 读取未过期的条目
    pub fn get(&self, key: &str) -> Option<V> {
        let entry = self.entries.get(key)?;
        let (stored_at, value) = entry.value();
        if stored_at.elapsed() < self.ttl {
            return Some(value.clone());
        }
        // 先释放读锁再删除，否则同一分片会死锁
        drop(entry);
        self.entries.remove(key);
        None
    }

    pub fn insert(&self, key: impl Into<String>, value: V) {
        if self.ttl.is_zero() {
            return;
        }
        self.purge_expired();
        self.entries.insert(key.into(), (Instant::now(), value));
    }

    /// 移除所有过期条目
    fn purge_expired(&self) {
        let ttl = self.ttl;
        self.entries
            .retain(|_, (stored_at, _)| stored_at.elapsed() < ttl);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 由 id 列表生成缓存 key，例如 `[1, 2, 3]` → `"1:2:3"`
pub fn ids_key(ids: &[i64]) -> String {
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("1:2", vec![1, 2]);
        assert_eq!(cache.get("1:2"), Some(vec![1, 2]));
        assert_eq!(cache.get("3"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.insert("k", 1);
        assert!(cache.is_empty());
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_expired_entry_removed() {
        let cache = TtlCache::new(Duration::from_millis(10));
        cache.insert("k", 1);
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_drops_expired_keys() {
        let cache = TtlCache::new(Duration::from_millis(5));
        for i in 0..1_000 {
            cache.insert(ids_key(&[i, i + 1]), i);
        }
        std::thread::sleep(Duration::from_millis(30));

        // Distinct keys are never read back; writing a new one sweeps them
        cache.insert("fresh", 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_insert_keeps_live_keys() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some(1));
    }

    #[test]
    fn test_ids_key() {
        assert_eq!(ids_key(&[1, 2, 3]), "1:2:3");
        assert_eq!(ids_key(&[]), "");
    }
}
