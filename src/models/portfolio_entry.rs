use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::normalize_coin_id;

// One lot of a coin held by a user. Several lots of the same coin are allowed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct PortfolioEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub coin_id: String,
    pub coin_name: String,
    pub amount: f64,
    pub avg_buy_price: f64,
    pub buy_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl PortfolioEntry {
    pub fn new(user_id: Uuid, input: CreatePortfolioEntry) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            coin_id: input.coin_id,
            coin_name: input.coin_name,
            amount: input.amount,
            avg_buy_price: input.avg_buy_price,
            buy_date: input.buy_date,
            created_at: Utc::now(),
        }
    }

    pub fn total_invested(&self) -> f64 {
        self.amount * self.avg_buy_price
    }
}

/// Holdings need a finite, strictly positive amount and buy price.
pub fn check_amount_and_price(amount: f64, avg_buy_price: f64) -> Result<(), String> {
    if !amount.is_finite() || !avg_buy_price.is_finite() || amount <= 0.0 || avg_buy_price <= 0.0 {
        return Err("Amount and price must be positive numbers.".to_string());
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePortfolioEntry {
    pub coin_id: String,
    pub coin_name: String,
    pub amount: f64,
    pub avg_buy_price: f64,
    #[serde(default)]
    pub buy_date: Option<NaiveDate>,
}

impl CreatePortfolioEntry {
    /// Validates the entry and returns it with a normalized coin id.
    pub fn validated(self) -> Result<Self, String> {
        if self.coin_id.trim().is_empty() || self.coin_name.trim().is_empty() {
            return Err("Please fill in all fields.".to_string());
        }
        check_amount_and_price(self.amount, self.avg_buy_price)?;

        Ok(Self {
            coin_id: normalize_coin_id(&self.coin_id),
            coin_name: self.coin_name.trim().to_string(),
            ..self
        })
    }
}

/// Listing returned by `GET /api/portfolio`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub entries: Vec<PortfolioEntry>,
    pub total_invested: f64,
}

impl From<Vec<PortfolioEntry>> for PortfolioSummary {
    fn from(entries: Vec<PortfolioEntry>) -> Self {
        let total_invested = entries.iter().map(PortfolioEntry::total_invested).sum();
        Self { entries, total_invested }
    }
}
