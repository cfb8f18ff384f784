use crate::types::ProviderError;

/// USDT/USDC are treated as USD proxies for the quote-currency enforcement
/// (§4.A: "non-USDT-proxy symbols fail with `NonUSDSymbol`").
const USD_PROXY_QUOTES: &[&str] = &["USD", "USDT", "USDC"];

/// Enforce that `symbol` (e.g. `"BTC-USD"`, `"ETHUSDT"`) is USD-quoted.
///
/// Accepts both hyphenated (`BASE-QUOTE`) and concatenated (`BASEQUOTE`)
/// conventions since different venues format symbols differently.
pub fn enforce_usd_quote(symbol: &str) -> Result<(), ProviderError> {
    let upper = symbol.to_ascii_uppercase();

    if let Some((_, quote)) = upper.rsplit_once('-') {
        if USD_PROXY_QUOTES.contains(&quote) {
            return Ok(());
        }
        return Err(ProviderError::NonUSDSymbol {
            symbol: symbol.to_string(),
        });
    }

    if USD_PROXY_QUOTES
        .iter()
        .any(|q| upper.ends_with(q) && upper.len() > q.len())
    {
        return Ok(());
    }

    Err(ProviderError::NonUSDSymbol {
        symbol: symbol.to_string(),
    })
}
