pub mod portfolio_entry_queries;
pub mod tracked_coin_queries;
pub mod chat_queries;
