//! Purchase catalogue offered by the dashboard.

use serde::Serialize;

/// Icon shown for tickers without a dedicated one.
pub const DEFAULT_ICON: &str = "📈";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueEntry {
    pub name: &'static str,
    pub ticker: &'static str,
}

const CATALOGUE: &[CatalogueEntry] = &[
    CatalogueEntry { name: "MSCI World (CW8)", ticker: "CW8.PA" },
    CatalogueEntry { name: "S&P 500", ticker: "^GSPC" },
    CatalogueEntry { name: "CAC 40", ticker: "^FCHI" },
    CatalogueEntry { name: "Nasdaq 100", ticker: "^IXIC" },
    CatalogueEntry { name: "Airbus", ticker: "AIR.PA" },
    CatalogueEntry { name: "LVMH", ticker: "MC.PA" },
    CatalogueEntry { name: "Michelin", ticker: "ML.PA" },
    CatalogueEntry { name: "TotalEnergies", ticker: "TTE.PA" },
    CatalogueEntry { name: "Hermès", ticker: "RMS.PA" },
    CatalogueEntry { name: "L'Oréal", ticker: "OR.PA" },
    CatalogueEntry { name: "Sanofi", ticker: "SAN.PA" },
    CatalogueEntry { name: "AXA", ticker: "CS.PA" },
    CatalogueEntry { name: "Apple", ticker: "AAPL" },
    CatalogueEntry { name: "Microsoft", ticker: "MSFT" },
    CatalogueEntry { name: "Nvidia", ticker: "NVDA" },
    CatalogueEntry { name: "Tesla", ticker: "TSLA" },
    CatalogueEntry { name: "Bitcoin", ticker: "BTC-EUR" },
    CatalogueEntry { name: "Ethereum", ticker: "ETH-EUR" },
];

const ICONS: &[(&str, &str)] = &[
    ("AAPL", "🍎"),
    ("MSFT", "💻"),
    ("TSLA", "⚡"),
    ("NVDA", "🎮"),
    ("MC.PA", "👜"),
    ("AIR.PA", "✈️"),
    ("TTE.PA", "⛽"),
    ("ML.PA", "🛞"),
    ("BTC-EUR", "₿"),
    ("ETH-EUR", "Ξ"),
    ("CW8.PA", "🌍"),
    ("^FCHI", "🇫🇷"),
];

/// Catalogue entries in display order.
pub fn entries() -> &'static [CatalogueEntry] {
    CATALOGUE
}

/// Ticker for a catalogue display name.
pub fn lookup_ticker(name: &str) -> Option<&'static str> {
    CATALOGUE
        .iter()
        .find(|entry| entry.name == name)
        .map(|entry| entry.ticker)
}

/// Display icon for a ticker.
pub fn icon_for(ticker: &str) -> &'static str {
    ICONS
        .iter()
        .find(|(t, _)| t.eq_ignore_ascii_case(ticker))
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}
