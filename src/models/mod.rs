mod portfolio_entry;
mod tracked_coin;
mod chat;
mod assistant;
pub mod market;

pub use portfolio_entry::{PortfolioEntry, CreatePortfolioEntry, PortfolioSummary};
pub use tracked_coin::{TrackedCoin, CreateTrackedCoin, DEFAULT_TRACKED_COINS};
pub use chat::{ChatRole, ChatTurn, ContextSnapshot};
pub use assistant::{
    PortfolioSnapshotEntry, HistoryTurn, ChatRequest, ChatResponse,
    SendChatMessage, TurnOutcome, SessionReply,
};
pub use market::{CatalogCoin, CoinMarketStats, CoinSearchParams};

/// Coin ids are stored trimmed and lower-cased.
pub fn normalize_coin_id(raw: &str) -> String {
    raw.trim().to_lowercase()
}
