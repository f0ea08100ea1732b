use crate::models::PortfolioSnapshotEntry;

pub const NO_PORTFOLIO_SENTENCE: &str = "User has not entered any portfolio data yet.";
pub const NO_TRACKED_COINS_SENTENCE: &str = "User has not selected specific coins to track.";
pub const OFF_TOPIC_REDIRECT: &str =
    "I'm a cryptocurrency specialist. Please ask me about crypto investments, market analysis, or your portfolio.";

/// Build the natural-language summary of the user's holdings and tracked coins.
///
/// Deterministic: the same snapshot always yields the same text.
pub fn compose_context_block(portfolio: &[PortfolioSnapshotEntry], tracked_coins: &[String]) -> String {
    let mut block = String::new();

    if portfolio.is_empty() {
        block.push_str(NO_PORTFOLIO_SENTENCE);
        block.push_str("\n\n");
    } else {
        block.push_str("User's Portfolio:\n");
        for entry in portfolio {
            block.push_str(&portfolio_line(entry));
            block.push('\n');
        }
        block.push('\n');
    }

    if tracked_coins.is_empty() {
        block.push_str(NO_TRACKED_COINS_SENTENCE);
    } else {
        let coins: Vec<String> = tracked_coins.iter().map(|c| c.trim().to_uppercase()).collect();
        block.push_str(&format!("User is tracking these coins: {}", coins.join(", ")));
    }
    block.push_str("\n\n");

    block
}

fn portfolio_line(entry: &PortfolioSnapshotEntry) -> String {
    let id = entry.coin_id.trim().to_uppercase();
    let label = match entry.coin_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => format!("{} ({})", name, id),
        _ => id,
    };

    let mut line = format!(
        "- {}: {} tokens at ${:.2} average buy price (Total invested: ${:.2})",
        label,
        entry.amount,
        entry.avg_buy_price,
        entry.amount * entry.avg_buy_price
    );
    if let Some(date) = entry.buy_date {
        line.push_str(&format!(", bought on {}", date.format("%Y-%m-%d")));
    }
    line
}

/// Wrap a context block with the assistant persona and domain-scoping rules.
///
/// Scoping is advisory: the model is asked to redirect off-topic questions,
/// nothing checks that it does.
pub fn build_system_prompt(context_block: &str) -> String {
    format!(
        r#"You are a cryptocurrency portfolio advisor and market analyst. You have access to the user's portfolio data and their selected coins for tracking.

{context_block}
IMPORTANT RULES:
1. ONLY answer questions related to cryptocurrency, blockchain, trading, investments, and financial markets
2. If asked about anything else (weather, cooking, general topics, etc.), politely redirect: "{redirect}"
3. If the user has no portfolio data, encourage them to add their investments first for personalized advice

Your role is to:
1. Analyze the user's portfolio performance and provide insights
2. Suggest investment strategies based on their current holdings
3. Provide market analysis and trends for their tracked coins
4. Help with risk management and portfolio diversification
5. Answer questions about cryptocurrency markets and investment strategies
6. Provide education about blockchain technology and crypto fundamentals

Always be helpful, accurate, and provide actionable advice. If you don't have real-time data, make that clear and provide general guidance based on historical trends and market principles. Keep responses concise but informative."#,
        context_block = context_block,
        redirect = OFF_TOPIC_REDIRECT,
    )
}
