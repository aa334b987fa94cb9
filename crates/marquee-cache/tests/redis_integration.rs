//! Integration tests for the Redis cache store.
//!
//! These tests run against a real Redis server using testcontainers.
//! Requires Docker to be available on the system.

use chrono::{DateTime, TimeZone, Utc};
use marquee_cache::{CacheClient, CacheConfig, CacheExt, CacheStore, RedisCacheStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::redis::Redis;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Named {
    name: String,
    #[serde(with = "marquee_core::timestamp")]
    when: DateTime<Utc>,
}

async fn start() -> (ContainerAsync<Redis>, Arc<CacheClient>) {
    let container = Redis::default()
        .start()
        .await
        .expect("Failed to start Redis container");
    let port = container
        .get_host_port_ipv4(6379)
        .await
        .expect("Failed to get Redis port");

    let client = CacheClient::new(CacheConfig {
        url: Some(format!("redis://127.0.0.1:{port}")),
        pool_size: 4,
        ..CacheConfig::default()
    });

    (container, Arc::new(client))
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_round_trip_against_redis() {
    let (_container, client) = start().await;
    let store = RedisCacheStore::new(Arc::clone(&client));
    assert!(store.is_enabled().await);

    let value = Named {
        name: "x".into(),
        when: Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap(),
    };
    store.write("k1", &value, Duration::from_secs(5)).await;

    let raw = store.get_raw("k1").await.unwrap().unwrap();
    assert!(raw.contains(r#"{"__type":"Date","value":"2024-05-01T08:30:00Z"}"#));
    assert_eq!(store.read::<Named>("k1").await, Some(value));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_expiry_is_set() {
    let (_container, client) = start().await;
    let store = RedisCacheStore::new(Arc::clone(&client));

    store.write("short", &1_u8, Duration::from_secs(1)).await;
    assert_eq!(store.read::<u8>("short").await, Some(1));

    tokio::time::sleep(Duration::from_millis(2100)).await;
    assert_eq!(store.read::<u8>("short").await, None);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_pattern_invalidation_and_single_delete() {
    let (_container, client) = start().await;
    let store = RedisCacheStore::new(client);
    let ttl = Duration::from_secs(60);

    store.write("movies:latest:page:1:per:10", &vec![1, 2], ttl).await;
    store.write("movies:count", &2_u64, ttl).await;
    store.write("movie:slug:alien", "alien", ttl).await;

    assert_eq!(store.delete_pattern("movies:*").await.unwrap(), 2);
    assert_eq!(store.read::<u64>("movies:count").await, None);
    assert_eq!(store.read::<String>("movie:slug:alien").await.as_deref(), Some("alien"));

    store.remove("movie:slug:alien").await;
    assert_eq!(store.read::<String>("movie:slug:alien").await, None);
}
