// meta_client.rs
use crate::insights::{MetaInsights, FALLBACK_INSIGHTS};

use anyhow::{anyhow, Context};
use log::{debug, error, info, warn};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const GRAPH_API_URL: &str = "https://graph.facebook.com/v19.0";

const CONVERSION_ACTIONS: &[&str] = &["purchase", "lead", "offsite_conversion.fb_pixel_purchase"];

#[derive(Deserialize, Debug)]
struct InsightsResponse {
    #[serde(default)]
    data: Vec<InsightsRow>,
}

#[derive(Deserialize, Debug)]
struct InsightsRow {
    #[serde(default)]
    spend: Option<String>,
    #[serde(default)]
    impressions: Option<String>,
    #[serde(default)]
    clicks: Option<String>,
    #[serde(default)]
    actions: Vec<ActionValue>,
}

#[derive(Deserialize, Debug)]
struct ActionValue {
    action_type: String,
    value: String,
}

#[derive(Deserialize, Debug)]
struct PreviewResponse {
    #[serde(default)]
    data: Vec<PreviewBody>,
}

#[derive(Deserialize, Debug)]
struct PreviewBody {
    body: String,
}

fn parse_number<T: std::str::FromStr>(field: &str, raw: Option<&str>) -> anyhow::Result<T> {
    let raw = raw.ok_or_else(|| anyhow!("missing field {}", field))?;
    raw.parse::<T>()
        .map_err(|_| anyhow!("field {} is not numeric: {}", field, raw))
}

impl InsightsRow {
    fn into_insights(self) -> anyhow::Result<MetaInsights> {
        let conversions = self
            .actions
            .iter()
            .filter(|a| CONVERSION_ACTIONS.contains(&a.action_type.as_str()))
            .map(|a| a.value.parse::<f64>().unwrap_or(0.0).round() as u64)
            .sum();
        Ok(MetaInsights {
            spend: parse_number("spend", self.spend.as_deref())?,
            impressions: parse_number("impressions", self.impressions.as_deref())?,
            clicks: parse_number("clicks", self.clicks.as_deref())?,
            conversions,
        })
    }
}

pub fn mock_preview_html(creative_id: &str) -> String {
    format!(
        "<div style=\"padding: 20px; background: #f0f0f0; border-radius: 8px; text-align: center;\"><h3>Vista previa del anuncio</h3><p>Creative ID: {}</p><p>🎯 Tu anuncio se mostrará aquí cuando esté listo</p></div>",
        creative_id
    )
}

pub fn simulated_preview_html(creative_id: &str, error: &str) -> String {
    format!(
        "<div style=\"padding: 20px; background: #fff3cd; border: 1px solid #ffc107; border-radius: 8px; text-align: center;\"><h3 style=\"color: #856404;\">Vista previa simulada</h3><p style=\"color: #856404;\">Creative ID: {}</p><p style=\"color: #856404;\">🎯 Tu anuncio se mostrará similar a esto en Meta</p><small style=\"color: #6c757d;\">Error: {}</small></div>",
        creative_id, error
    )
}

/// Client for the advertising insights and creative preview endpoints. Every
/// call degrades to a fixed value when the token is missing or the request
/// fails.
#[derive(Clone)]
pub struct MetaClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    ad_account_id: Option<String>,
}

impl MetaClient {
    pub fn new(client: Client, token: Option<String>, ad_account_id: Option<String>) -> Self {
        Self::with_base_url(client, GRAPH_API_URL, token, ad_account_id)
    }

    pub fn with_base_url(
        client: Client,
        base_url: &str,
        token: Option<String>,
        ad_account_id: Option<String>,
    ) -> Self {
        MetaClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            ad_account_id,
        }
    }

    pub async fn fetch_insights(&self) -> MetaInsights {
        match self.try_fetch_insights().await {
            Ok(insights) => {
                info!("Fetched insights: {:?}", insights);
                insights
            }
            Err(e) => {
                warn!("Insights unavailable, using fallback figures: {}", e);
                FALLBACK_INSIGHTS
            }
        }
    }

    async fn try_fetch_insights(&self) -> anyhow::Result<MetaInsights> {
        let token = self.token.as_deref().ok_or_else(|| anyhow!("META_TOKEN not set"))?;
        let account = self
            .ad_account_id
            .as_deref()
            .ok_or_else(|| anyhow!("META_AD_ACCOUNT_ID not set"))?;

        let response = self
            .client
            .get(format!("{}/act_{}/insights", self.base_url, account))
            .query(&[
                ("fields", "spend,impressions,clicks,actions"),
                ("access_token", token),
            ])
            .timeout(Duration::from_secs(10))
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;
        debug!("Insights response text: {}", response_text);
        if !status.is_success() {
            error!("Insights API error {}: {}", status, response_text);
            return Err(anyhow!("insights request returned {}", status));
        }

        let parsed: InsightsResponse =
            serde_json::from_str(&response_text).context("invalid insights body")?;
        parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("no insights rows"))?
            .into_insights()
    }

    /// Returns preview markup for a creative. Without a token this is a
    /// placeholder card; on failure it is a simulated card naming the error.
    pub async fn fetch_ad_preview(&self, creative_id: &str) -> String {
        if self.token.is_none() {
            warn!("Meta token not available, using mock preview");
            return mock_preview_html(creative_id);
        }

        match self.try_fetch_preview(creative_id).await {
            Ok(body) => {
                info!("Fetched preview for creative {}", creative_id);
                body
            }
            Err(e) => {
                error!("Error fetching preview: {}", e);
                simulated_preview_html(creative_id, &e.to_string())
            }
        }
    }

    async fn try_fetch_preview(&self, creative_id: &str) -> anyhow::Result<String> {
        let token = self.token.as_deref().unwrap_or_default();
        let response = self
            .client
            .get(format!("{}/{}/previews", self.base_url, creative_id))
            .query(&[("ad_format", "DESKTOP_FEED_STANDARD"), ("access_token", token)])
            .timeout(Duration::from_secs(10))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Error HTTP: {}", status.as_u16()));
        }

        let is_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map_or(false, |v| v.contains("application/json"));
        if !is_json {
            return Err(anyhow!("response is not JSON"));
        }

        let parsed: PreviewResponse = response.json().await?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|p| p.body)
            .ok_or_else(|| anyhow!("no preview found for creative {}", creative_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_graph_insights_rows() {
        let body = r#"{"data":[{"spend":"123.45","impressions":"9000","clicks":"310",
            "actions":[{"action_type":"link_click","value":"310"},{"action_type":"purchase","value":"12"},{"action_type":"lead","value":"3"}]}]}"#;
        let parsed: InsightsResponse = serde_json::from_str(body).unwrap();
        let insights = parsed.data.into_iter().next().unwrap().into_insights().unwrap();
        assert_eq!(
            insights,
            MetaInsights {
                spend: 123.45,
                impressions: 9000,
                clicks: 310,
                conversions: 15,
            }
        );
    }

    #[test]
    fn missing_fields_are_errors() {
        let row: InsightsRow = serde_json::from_str(r#"{"spend":"1"}"#).unwrap();
        assert!(row.into_insights().is_err());
    }

    #[tokio::test]
    async fn without_token_uses_fallbacks() {
        let meta = MetaClient::new(Client::new(), None, None);
        assert_eq!(meta.fetch_insights().await, FALLBACK_INSIGHTS);
        assert_eq!(meta.fetch_ad_preview("123").await, mock_preview_html("123"));
    }

    #[tokio::test]
    async fn unreachable_api_uses_fallbacks() {
        let meta = MetaClient::with_base_url(
            Client::new(),
            "http://127.0.0.1:9",
            Some("token".to_string()),
            Some("42".to_string()),
        );
        assert_eq!(meta.fetch_insights().await, FALLBACK_INSIGHTS);
        let html = meta.fetch_ad_preview("777").await;
        assert!(html.contains("Vista previa simulada"));
        assert!(html.contains("Creative ID: 777"));
    }
}
