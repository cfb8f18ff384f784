use cryptorun_providers::{enforce_usd_quote, ProviderError};

#[test]
fn scenario_non_usd_symbol_rejected() {
    assert_eq!(
        enforce_usd_quote("BTC-EUR"),
        Err(ProviderError::NonUSDSymbol {
            symbol: "BTC-EUR".to_string()
        })
    );
    assert_eq!(
        enforce_usd_quote("ETHBTC"),
        Err(ProviderError::NonUSDSymbol {
            symbol: "ETHBTC".to_string()
        })
    );

    assert!(enforce_usd_quote("BTC-USD").is_ok());
    assert!(enforce_usd_quote("ETHUSDT").is_ok());
}
