// instagram_publisher.rs
use crate::campaign::{Campaign, UserData};
use crate::error::TukiError;

use chrono::Utc;
use log::info;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const BASE_HASHTAGS: [&str; 3] = ["#emprendimiento", "#argentina", "#negocio"];
const MAX_HASHTAGS: usize = 8;
const MAX_PRODUCT_HASHTAGS: usize = 2;
const PREVIEW_CAPTION_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Scheduled,
    Published,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstagramPost {
    pub id: String,
    pub caption: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub hashtags: Vec<String>,
    pub timestamp: String,
    pub platform: String,
    pub status: PostStatus,
}

pub fn generate_hashtags(product: &str, objective: &str) -> Vec<String> {
    let product_tags = product
        .to_lowercase()
        .split(' ')
        .filter(|word| word.chars().count() > 3)
        .take(MAX_PRODUCT_HASHTAGS)
        .map(|word| format!("#{}", word))
        .collect::<Vec<_>>();

    let objective = objective.to_lowercase();
    let objective_tags: [&str; 2] = if objective.contains("venta") {
        ["#ventas", "#ofertas"]
    } else if objective.contains("marca") {
        ["#branding", "#marketing"]
    } else {
        ["#crecimiento", "#clientes"]
    };

    BASE_HASHTAGS
        .iter()
        .map(|t| t.to_string())
        .chain(product_tags)
        .chain(objective_tags.iter().map(|t| t.to_string()))
        .take(MAX_HASHTAGS)
        .collect()
}

fn post_id<R: Rng>(rng: &mut R) -> String {
    let suffix: String = rng
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect();
    format!("ig_{}_{}", Utc::now().timestamp_millis(), suffix)
}

/// Simulates scheduling a post; nothing leaves the process.
pub async fn publish_to_instagram(
    campaign: &Campaign,
    user_data: &UserData,
    image_url: &str,
    delay: Duration,
) -> Result<InstagramPost, TukiError> {
    if image_url.trim().is_empty() {
        return Err(TukiError::MissingImage);
    }

    tokio::time::sleep(delay).await;

    let hashtags = generate_hashtags(&user_data.product_service, &user_data.marketing_objective);
    let caption = format!("{}\n\n{}", campaign.body, hashtags.join(" "));

    let post = InstagramPost {
        id: post_id(&mut rand::thread_rng()),
        caption,
        image_url: image_url.trim().to_string(),
        hashtags,
        timestamp: Utc::now().to_rfc3339(),
        platform: "instagram".to_string(),
        status: PostStatus::Scheduled,
    };
    info!("Simulated Instagram post {}", post.id);
    Ok(post)
}

/// Feed preview text: long captions are cut with a "ver más" tail.
pub fn preview_caption(caption: &str) -> String {
    if caption.chars().count() > PREVIEW_CAPTION_LEN {
        let cut: String = caption.chars().take(PREVIEW_CAPTION_LEN).collect();
        format!("{}... ver más", cut)
    } else {
        caption.to_string()
    }
}
