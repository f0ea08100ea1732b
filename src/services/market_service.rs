use std::collections::HashSet;

use crate::models::market::{MARKET_STATS, POPULAR_COINS};
use crate::models::{CatalogCoin, CoinMarketStats};

/// Popular coins whose id or name contains `search` (case-insensitive),
/// minus those in `exclude`.
pub fn search_catalog(search: Option<&str>, exclude: &HashSet<String>) -> Vec<CatalogCoin> {
    let needle = search.map(|s| s.trim().to_lowercase()).unwrap_or_default();

    POPULAR_COINS
        .iter()
        .filter(|coin| !exclude.contains(coin.id))
        .filter(|coin| {
            needle.is_empty() || coin.id.contains(&needle) || coin.name.to_lowercase().contains(&needle)
        })
        .copied()
        .collect()
}

/// Statistics for `coin_id`, falling back to bitcoin for coins without data.
pub fn market_stats(coin_id: &str) -> CoinMarketStats {
    let coin_id = coin_id.trim().to_lowercase();
    MARKET_STATS
        .iter()
        .find(|stats| stats.coin_id == coin_id)
        .copied()
        .unwrap_or(MARKET_STATS[0])
}
