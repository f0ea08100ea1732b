use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::portfolio_entry::check_amount_and_price;
use crate::models::{ChatRole, ChatTurn, PortfolioEntry};

/// Holding as sent to the assistant. Accepts both the stored row shape
/// (`coin_id`, `avg_buy_price`) and the compact client shape (`coin`, `avgBuyPrice`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioSnapshotEntry {
    #[serde(alias = "coin")]
    pub coin_id: String,
    #[serde(default, alias = "coinName")]
    pub coin_name: Option<String>,
    pub amount: f64,
    #[serde(alias = "avgBuyPrice")]
    pub avg_buy_price: f64,
    #[serde(default, alias = "buyDate")]
    pub buy_date: Option<NaiveDate>,
}

impl PortfolioSnapshotEntry {
    pub fn validate(&self) -> Result<(), String> {
        check_amount_and_price(self.amount, self.avg_buy_price)
            .map_err(|e| format!("{} ({})", e, self.coin_id))
    }
}

impl From<&PortfolioEntry> for PortfolioSnapshotEntry {
    fn from(entry: &PortfolioEntry) -> Self {
        Self {
            coin_id: entry.coin_id.clone(),
            coin_name: Some(entry.coin_name.clone()),
            amount: entry.amount,
            avg_buy_price: entry.avg_buy_price,
            buy_date: entry.buy_date,
        }
    }
}

/// Prior turn forwarded for conversation continuity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryTurn {
    #[serde(deserialize_with = "history_role")]
    pub role: ChatRole,
    #[serde(alias = "message")]
    pub content: String,
}

impl HistoryTurn {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}

// Clients send free-form roles; anything that is not the user is the model's side.
fn history_role<'de, D>(deserializer: D) -> Result<ChatRole, D::Error>
where
    D: Deserializer<'de>,
{
    let role = String::deserialize(deserializer)?;
    Ok(if role.trim().eq_ignore_ascii_case("user") {
        ChatRole::User
    } else {
        ChatRole::Assistant
    })
}

impl From<&ChatTurn> for HistoryTurn {
    fn from(turn: &ChatTurn) -> Self {
        Self {
            role: turn.role,
            content: turn.message.clone(),
        }
    }
}

/// Body of `POST /api/chat-with-ai`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub portfolio: Vec<PortfolioSnapshotEntry>,
    #[serde(default, alias = "selected_coins")]
    pub selected_coins: Vec<String>,
    #[serde(default, alias = "chat_history")]
    pub chat_history: Vec<HistoryTurn>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendChatMessage {
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TurnOutcome {
    Replied,
    SignInRequired,
    OnboardingRequired,
}

/// Result of one chat session turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionReply {
    pub outcome: TurnOutcome,
    pub message: String,
}
