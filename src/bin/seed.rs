//! Populates Redis with demo users and one session token each. Stands in for
//! the auth service during development; prints a `curl`-ready token per user.

use linguamatch::{
    config::Config,
    database::{init_redis, session_key},
    directory::create_user,
    models::User,
};
use redis::AsyncCommands;
use uuid::Uuid;

const DEMO_USERS: &[(&str, &str, &str, bool, &str)] = &[
    (
        "Mia Tanaka",
        "japanese",
        "english",
        true,
        "Tokyo, Japan",
    ),
    (
        "Leo Costa",
        "portuguese",
        "german",
        true,
        "Lisbon, Portugal",
    ),
    (
        "Amara Diallo",
        "french",
        "korean",
        true,
        "Dakar, Senegal",
    ),
    ("Noah Fischer", "german", "spanish", true, "Vienna, Austria"),
    // Still onboarding, must never show up in recommendations.
    ("Sam Park", "korean", "french", false, ""),
];

#[tokio::main]
async fn main() {
    let config = Config::load();
    let mut conn = init_redis(&config.redis_url).await;

    for (full_name, native, learning, onboarded, location) in DEMO_USERS {
        let user = User {
            id: Uuid::new_v4().to_string(),
            full_name: full_name.to_string(),
            profile_pic: format!("https://avatar.iran.liara.run/public/{}", avatar_seed(full_name)),
            native_language: native.to_string(),
            learning_language: learning.to_string(),
            is_onboarded: *onboarded,
            bio: String::new(),
            location: location.to_string(),
        };

        create_user(&mut conn, &user)
            .await
            .expect("Failed to store demo user");

        let token = Uuid::new_v4().to_string();
        let _: () = conn
            .set(session_key(&token), &user.id)
            .await
            .expect("Failed to store demo session");

        println!("{full_name}\n  id:    {}\n  token: {token}", user.id);
    }
}

fn avatar_seed(name: &str) -> usize {
    // Stable avatar per name, 1..=100 like the upstream avatar service.
    name.bytes().map(usize::from).sum::<usize>() % 100 + 1
}
