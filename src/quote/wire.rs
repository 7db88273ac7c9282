use serde::Deserialize;

#[derive(Deserialize)]
pub(crate) struct ChartEnvelope {
    pub(crate) chart: Option<ChartNode>,
}

#[derive(Deserialize)]
pub(crate) struct ChartNode {
    #[serde(default)]
    pub(crate) result: Option<Vec<ChartResult>>,
    /// Any non-null value means the provider rejected the symbol.
    #[serde(default)]
    pub(crate) error: Option<serde_json::Value>,
}

#[derive(Deserialize)]
pub(crate) struct ChartResult {
    #[serde(default)]
    pub(crate) meta: Option<MetaNode>,
}

#[derive(Deserialize)]
pub(crate) struct MetaNode {
    /// Kept loosely typed: a non-numeric price is "no price", not a parse failure.
    #[serde(default, rename = "regularMarketPrice")]
    pub(crate) regular_market_price: Option<serde_json::Value>,
    #[serde(default)]
    pub(crate) currency: Option<String>,
    #[serde(default, rename = "exchangeName")]
    pub(crate) exchange_name: Option<String>,
}
