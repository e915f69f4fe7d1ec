// image_api.rs
use crate::error::TukiError;
use crate::image_prompt::{extract_keywords, fallback_image};

use log::{debug, error, info, warn};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const UNSPLASH_API_URL: &str = "https://api.unsplash.com";

/// Stock photos offered by the campaign image gallery.
pub const GALLERY_IMAGES: [&str; 4] = [
    "https://images.unsplash.com/photo-1560472354-b33ff0c44a43?w=400&h=400&fit=crop",
    "https://images.unsplash.com/photo-1533750349088-cd871a92f312?w=400&h=400&fit=crop",
    "https://images.unsplash.com/photo-1486312338219-ce68d2c6f44d?w=400&h=400&fit=crop",
    "https://images.unsplash.com/photo-1551288049-bebda4e38f71?w=400&h=400&fit=crop",
];

#[derive(Deserialize, Debug)]
struct SearchPhotosResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Deserialize, Debug)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Deserialize, Debug)]
struct PhotoUrls {
    regular: String,
}

/// Looks up an image for a prompt: image search first, keyword table
/// otherwise.
#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    base_url: String,
    access_key: Option<String>,
}

impl ImageClient {
    pub fn new(client: Client, access_key: Option<String>) -> Self {
        Self::with_base_url(client, UNSPLASH_API_URL, access_key)
    }

    pub fn with_base_url(client: Client, base_url: &str, access_key: Option<String>) -> Self {
        ImageClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key,
        }
    }

    pub async fn generate_image(&self, prompt: &str) -> Result<String, TukiError> {
        if prompt.trim().is_empty() {
            return Err(TukiError::Validation("Prompt is required".to_string()));
        }

        match self.search(prompt).await {
            Ok(Some(url)) => {
                info!("Image search returned {}", url);
                Ok(url)
            }
            Ok(None) => {
                debug!("No search result, using fallback image");
                Ok(fallback_image(prompt).to_string())
            }
            Err(e) => {
                warn!("Image search failed, using fallback image: {}", e);
                Ok(fallback_image(prompt).to_string())
            }
        }
    }

    async fn search(&self, prompt: &str) -> anyhow::Result<Option<String>> {
        let access_key = match &self.access_key {
            Some(key) => key,
            None => return Ok(None),
        };

        let query = extract_keywords(prompt).join(" ");
        debug!("Searching images for '{}'", query);

        let response = self
            .client
            .get(format!("{}/search/photos", self.base_url))
            .query(&[
                ("query", query.as_str()),
                ("per_page", "1"),
                ("orientation", "landscape"),
            ])
            .header("Authorization", format!("Client-ID {}", access_key))
            .timeout(Duration::from_secs(10))
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;
        if !status.is_success() {
            error!("Image search error {}: {}", status, response_text);
            anyhow::bail!("image search returned {}", status);
        }

        let parsed: SearchPhotosResponse = serde_json::from_str(&response_text)?;
        Ok(parsed.results.into_iter().next().map(|p| p.urls.regular))
    }
}

/// Mock image generation for a campaign: a fixed set of candidates the user
/// picks from.
#[derive(Debug, Clone, Default)]
pub struct ImageGallery {
    generated: Vec<String>,
    selected: Vec<String>,
}

impl ImageGallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the candidates after the simulated rendering delay.
    pub async fn generate(&mut self, delay: Duration) -> &[String] {
        tokio::time::sleep(delay).await;
        self.generated = GALLERY_IMAGES.iter().map(|s| s.to_string()).collect();
        self.selected.retain(|url| GALLERY_IMAGES.contains(&url.as_str()));
        &self.generated
    }

    pub fn toggle(&mut self, url: &str) -> Result<(), TukiError> {
        if !self.generated.iter().any(|g| g == url) {
            return Err(TukiError::Validation(format!("unknown image '{}'", url)));
        }
        if let Some(pos) = self.selected.iter().position(|s| s == url) {
            self.selected.remove(pos);
        } else {
            self.selected.push(url.to_string());
        }
        Ok(())
    }

    /// Hands the selection over; at least one image has to be picked.
    pub fn finish(self) -> Result<Vec<String>, TukiError> {
        if self.selected.is_empty() {
            return Err(TukiError::Validation(
                "Seleccioná al menos una imagen para continuar.".to_string(),
            ));
        }
        Ok(self.selected)
    }

    pub fn skip(self) -> Vec<String> {
        Vec::new()
    }
}
