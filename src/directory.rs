//! User directory: registration, friend lists, and introductions.

use std::collections::HashSet;

use redis::{AsyncCommands, aio::ConnectionManager};

use crate::{
    database::{USERS_INDEX, friends_key, mget_docs, user_key},
    error::AppError,
    models::{PublicProfile, User},
};

/// The introduction rule: never the caller, never an existing friend, only
/// users who finished onboarding. No ranking, no pagination.
pub fn filter_recommended(
    caller_id: &str,
    friends: &HashSet<String>,
    candidates: Vec<User>,
) -> Vec<User> {
    candidates
        .into_iter()
        .filter(|user| user.id != caller_id && !friends.contains(&user.id) && user.is_onboarded)
        .collect()
}

/// Users the caller could be introduced to.
pub async fn recommended(
    conn: &mut ConnectionManager,
    caller_id: &str,
) -> Result<Vec<User>, AppError> {
    let ids: Vec<String> = conn.smembers(USERS_INDEX).await?;
    let friends: HashSet<String> = conn.smembers(friends_key(caller_id)).await?;

    let keys: Vec<String> = ids.iter().map(|id| user_key(id)).collect();
    let candidates: Vec<User> = mget_docs(conn, &keys).await?;

    Ok(filter_recommended(caller_id, &friends, candidates))
}

/// The caller's friends, projected to their public profiles.
pub async fn friends_of(
    conn: &mut ConnectionManager,
    user_id: &str,
) -> Result<Vec<PublicProfile>, AppError> {
    let ids: Vec<String> = conn.smembers(friends_key(user_id)).await?;

    let keys: Vec<String> = ids.iter().map(|id| user_key(id)).collect();
    let friends: Vec<User> = mget_docs(conn, &keys).await?;

    Ok(friends.iter().map(PublicProfile::from).collect())
}

pub async fn is_friend(
    conn: &mut ConnectionManager,
    user_id: &str,
    other_id: &str,
) -> Result<bool, AppError> {
    let member: bool = conn.sismember(friends_key(user_id), other_id).await?;
    Ok(member)
}

/// Stores a profile document and registers it in the directory index.
pub async fn create_user(conn: &mut ConnectionManager, user: &User) -> Result<(), AppError> {
    let doc = serde_json::to_string(user)?;

    let mut pipe = redis::pipe();
    pipe.atomic()
        .set(user_key(&user.id), doc)
        .ignore()
        .sadd(USERS_INDEX, &user.id)
        .ignore();
    let _: () = pipe.query_async(conn).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, onboarded: bool) -> User {
        User {
            id: id.into(),
            full_name: format!("User {id}"),
            profile_pic: String::new(),
            native_language: "spanish".into(),
            learning_language: "english".into(),
            is_onboarded: onboarded,
            bio: String::new(),
            location: String::new(),
        }
    }

    #[test]
    fn never_recommends_the_caller() {
        let candidates = vec![user("me", true), user("a", true)];
        let picked = filter_recommended("me", &HashSet::new(), candidates);

        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].id, "a");
    }

    #[test]
    fn never_recommends_existing_friends() {
        let friends: HashSet<String> = ["a".to_string(), "b".to_string()].into();
        let candidates = vec![user("a", true), user("b", true), user("c", true)];
        let picked = filter_recommended("me", &friends, candidates);

        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].id, "c");
    }

    #[test]
    fn only_recommends_onboarded_users() {
        let candidates = vec![user("a", false), user("b", true)];
        let picked = filter_recommended("me", &HashSet::new(), candidates);

        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].id, "b");
    }

    #[test]
    fn empty_directory_recommends_nothing() {
        assert!(filter_recommended("me", &HashSet::new(), Vec::new()).is_empty());
    }
}
