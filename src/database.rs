//! # Redis
//!
//! Document store for the whole backend.
//!
//! ## Layout
//!
//! - `users` (**set**): ids of every registered user, the directory index.
//! - `user:{id}` (**string**): the profile document as JSON.
//! - `user:{id}:friends` (**set**): mutual-friend user ids.
//! - `user:{id}:requests:in` / `user:{id}:requests:out` (**set**): pending
//!   request ids indexed by recipient/sender. Trimmed inside the acceptance
//!   transaction, so membership implies pending.
//! - `request:{id}` (**string**): the friend-request document as JSON.
//! - `request:pair:{a}:{b}` (**string**, `a < b`): pair guard, claimed with
//!   SET NX when a request is sent and never deleted. At most one request
//!   ever exists per unordered pair, in either direction, even under
//!   concurrent sends.
//! - `session:{token}` (**string**): user id for a bearer token.
//!
//! Friend sets and pending indexes are Redis sets rather than fields inside
//! the documents: SADD/SREM are atomic and idempotent, so the acceptance
//! pipeline never needs a read-modify-write on a document.

use std::time::Duration;

use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Set of all registered user ids.
pub const USERS_INDEX: &str = "users";

pub async fn init_redis(redis_url: &str) -> ConnectionManager {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url).unwrap();
    let connection_manager = client
        .get_connection_manager_with_config(config)
        .await
        .unwrap();

    connection_manager
}

pub fn user_key(id: &str) -> String {
    format!("user:{id}")
}

pub fn friends_key(id: &str) -> String {
    format!("user:{id}:friends")
}

pub fn incoming_key(id: &str) -> String {
    format!("user:{id}:requests:in")
}

pub fn outgoing_key(id: &str) -> String {
    format!("user:{id}:requests:out")
}

pub fn request_key(id: &str) -> String {
    format!("request:{id}")
}

pub fn session_key(token: &str) -> String {
    format!("session:{token}")
}

/// Order-normalized guard key for the unordered (a, b) pair, so `send(A, B)`
/// and `send(B, A)` collide on the same key.
pub fn pair_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("request:pair:{a}:{b}")
    } else {
        format!("request:pair:{b}:{a}")
    }
}

/// Fetches and decodes one JSON document, `None` if the key is absent.
pub async fn get_doc<T: DeserializeOwned>(
    conn: &mut ConnectionManager,
    key: &str,
) -> Result<Option<T>, AppError> {
    let raw: Option<String> = conn.get(key).await?;
    match raw {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Fetches and decodes a batch of JSON documents, skipping absent keys.
/// MGET with zero keys is a Redis error, so an empty batch short-circuits.
pub async fn mget_docs<T: DeserializeOwned>(
    conn: &mut ConnectionManager,
    keys: &[String],
) -> Result<Vec<T>, AppError> {
    if keys.is_empty() {
        return Ok(Vec::new());
    }

    let raw: Vec<Option<String>> = conn.mget(keys).await?;
    raw.into_iter()
        .flatten()
        .map(|doc| serde_json::from_str(&doc).map_err(AppError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_key_is_order_independent() {
        assert_eq!(pair_key("alice", "bob"), pair_key("bob", "alice"));
        assert_eq!(pair_key("alice", "bob"), "request:pair:alice:bob");
    }

    #[test]
    fn keys_do_not_collide_across_namespaces() {
        assert_eq!(user_key("x"), "user:x");
        assert_eq!(friends_key("x"), "user:x:friends");
        assert_eq!(incoming_key("x"), "user:x:requests:in");
        assert_eq!(outgoing_key("x"), "user:x:requests:out");
        assert_eq!(request_key("x"), "request:x");
        assert_eq!(session_key("x"), "session:x");
    }
}
