use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::sync::OnceLock;
use uuid::Uuid;

use crate::models::normalize_coin_id;

/// Coins every new user starts out tracking.
pub const DEFAULT_TRACKED_COINS: [(&str, &str); 3] = [
    ("bitcoin", "Bitcoin"),
    ("ethereum", "Ethereum"),
    ("cardano", "Cardano"),
];

// A coin a user watches. Unique per (user_id, coin_id).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct TrackedCoin {
    pub id: Uuid,
    pub user_id: Uuid,
    pub coin_id: String,
    pub coin_name: String,
    pub created_at: DateTime<Utc>,
}

impl TrackedCoin {
    pub fn new(user_id: Uuid, input: CreateTrackedCoin) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            coin_id: input.coin_id,
            coin_name: input.coin_name,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTrackedCoin {
    pub coin_id: String,
    pub coin_name: String,
}

fn coin_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // CoinGecko-style ids: lower-case alphanumerics separated by single hyphens
    PATTERN.get_or_init(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("valid coin id regex"))
}

impl CreateTrackedCoin {
    pub fn validated(self) -> Result<Self, String> {
        if self.coin_id.trim().is_empty() || self.coin_name.trim().is_empty() {
            return Err("Please provide both coin ID and name.".to_string());
        }

        let coin_id = normalize_coin_id(&self.coin_id);
        if !coin_id_pattern().is_match(&coin_id) {
            return Err(format!(
                "Invalid coin ID '{}': use the CoinGecko ID (letters, digits and hyphens)",
                coin_id
            ));
        }

        Ok(Self {
            coin_id,
            coin_name: self.coin_name.trim().to_string(),
        })
    }

    pub fn defaults() -> Vec<Self> {
        DEFAULT_TRACKED_COINS
            .iter()
            .map(|(id, name)| Self {
                coin_id: id.to_string(),
                coin_name: name.to_string(),
            })
            .collect()
    }
}
