use serde::{Deserialize, Serialize};

// ==============================================================================
// Coin catalog
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CatalogCoin {
    pub id: &'static str,
    pub name: &'static str,
}

/// Popular coins offered for tracking, keyed by CoinGecko id.
pub const POPULAR_COINS: [CatalogCoin; 20] = [
    CatalogCoin { id: "bitcoin", name: "Bitcoin" },
    CatalogCoin { id: "ethereum", name: "Ethereum" },
    CatalogCoin { id: "cardano", name: "Cardano" },
    CatalogCoin { id: "ripple", name: "XRP" },
    CatalogCoin { id: "binancecoin", name: "BNB" },
    CatalogCoin { id: "solana", name: "Solana" },
    CatalogCoin { id: "polkadot", name: "Polkadot" },
    CatalogCoin { id: "dogecoin", name: "Dogecoin" },
    CatalogCoin { id: "avalanche-2", name: "Avalanche" },
    CatalogCoin { id: "chainlink", name: "Chainlink" },
    CatalogCoin { id: "polygon", name: "Polygon" },
    CatalogCoin { id: "shiba-inu", name: "Shiba Inu" },
    CatalogCoin { id: "litecoin", name: "Litecoin" },
    CatalogCoin { id: "ethereum-classic", name: "Ethereum Classic" },
    CatalogCoin { id: "stellar", name: "Stellar" },
    CatalogCoin { id: "cosmos", name: "Cosmos" },
    CatalogCoin { id: "algorand", name: "Algorand" },
    CatalogCoin { id: "tron", name: "TRON" },
    CatalogCoin { id: "near", name: "NEAR Protocol" },
    CatalogCoin { id: "uniswap", name: "Uniswap" },
];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoinSearchParams {
    pub search: Option<String>,
}

// ==============================================================================
// Market statistics
// ==============================================================================

/// Display figures for the market statistics panel. Static sample data, not a price feed.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct CoinMarketStats {
    pub coin_id: &'static str,
    pub name: &'static str,
    pub market_cap: &'static str,
    pub market_cap_change: f64,
    pub volume: &'static str,
    pub volume_change: f64,
    pub dominance: &'static str,
    pub dominance_change: f64,
}

pub const MARKET_STATS: [CoinMarketStats; 4] = [
    CoinMarketStats {
        coin_id: "bitcoin",
        name: "Bitcoin",
        market_cap: "$1.2T",
        market_cap_change: 2.4,
        volume: "$28.5B",
        volume_change: 5.1,
        dominance: "42.1%",
        dominance_change: -0.8,
    },
    CoinMarketStats {
        coin_id: "ethereum",
        name: "Ethereum",
        market_cap: "$421.8B",
        market_cap_change: 3.2,
        volume: "$15.2B",
        volume_change: 7.3,
        dominance: "18.2%",
        dominance_change: 0.5,
    },
    CoinMarketStats {
        coin_id: "solana",
        name: "Solana",
        market_cap: "$58.9B",
        market_cap_change: 8.7,
        volume: "$3.1B",
        volume_change: 12.4,
        dominance: "2.8%",
        dominance_change: 1.2,
    },
    CoinMarketStats {
        coin_id: "cardano",
        name: "Cardano",
        market_cap: "$22.1B",
        market_cap_change: -1.3,
        volume: "$1.8B",
        volume_change: 4.2,
        dominance: "1.1%",
        dominance_change: -0.2,
    },
];
