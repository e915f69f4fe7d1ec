// api_routes.rs
use crate::campaign::{AudienceData, Campaign, UserData};
use crate::campaign_generator::{create_campaign, validate_audience};
use crate::config::Config;
use crate::error::TukiError;
use crate::image_api::{ImageClient, ImageGallery};
use crate::image_prompt::auto_image_prompt;
use crate::insights::{
    dashboard_snapshot, generate_mock_insights, generate_positive_insights, MetaInsights, RoiSummary,
};
use crate::instagram_publisher::{preview_caption, publish_to_instagram, InstagramPost};
use crate::meta_client::MetaClient;
use crate::questions::Question;
use crate::session_manager::SessionManager;
use crate::user_store::UserDataStore;
use crate::wizard::{ChatMessage, OnboardingSummary, OnboardingWizard, Outcome};

use actix_web::{web, HttpResponse};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use uuid::Uuid;

/// Shared state behind every route.
pub struct AppState {
    pub config: Config,
    pub images: ImageClient,
    pub meta: MetaClient,
    pub store: UserDataStore,
    pub sessions: Mutex<SessionManager>,
}

impl AppState {
    pub fn new(config: Config, client: reqwest::Client) -> Self {
        AppState {
            images: ImageClient::new(client.clone(), config.unsplash_access_key.clone()),
            meta: MetaClient::new(
                client,
                config.meta_token.clone(),
                config.meta_ad_account_id.clone(),
            ),
            store: UserDataStore::new(&config.storage_dir),
            sessions: Mutex::new(SessionManager::with_limits(
                config.max_sessions,
                config.session_ttl,
            )),
            config,
        }
    }

    fn with_sessions<T>(
        &self,
        f: impl FnOnce(&mut SessionManager) -> Result<T, TukiError>,
    ) -> Result<T, TukiError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| TukiError::Internal("session store unavailable".to_string()))?;
        f(&mut sessions)
    }
}

#[derive(Deserialize)]
struct ImageRequest {
    #[serde(default)]
    prompt: Option<String>,
}

#[derive(Serialize)]
struct ImageResponse {
    url: String,
}

#[derive(Deserialize)]
struct AnswerRequest {
    text: String,
}

#[derive(Deserialize)]
struct OptionRequest {
    option: String,
}

#[derive(Serialize)]
struct SessionView {
    id: Uuid,
    messages: Vec<ChatMessage>,
    question: Option<&'static Question>,
    selected: Vec<String>,
    complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<OnboardingSummary>,
}

impl SessionView {
    fn of(id: Uuid, wizard: &OnboardingWizard, outcome: Option<Outcome>) -> Self {
        SessionView {
            id,
            messages: wizard.messages().to_vec(),
            question: wizard.current_question(),
            selected: wizard.selected().to_vec(),
            complete: wizard.is_complete(),
            outcome,
            summary: wizard.is_complete().then(|| wizard.summary()),
        }
    }
}

#[derive(Deserialize)]
struct CampaignRequest {
    #[serde(rename = "userData")]
    user_data: UserData,
    #[serde(default)]
    audience: Option<AudienceData>,
}

#[derive(Deserialize)]
struct GalleryRequest {
    #[serde(rename = "productoServicio")]
    product_service: String,
}

#[derive(Serialize)]
struct GalleryResponse {
    prompt: String,
    images: Vec<String>,
}

#[derive(Deserialize)]
struct ImageSelectionRequest {
    campaign: Campaign,
    #[serde(default)]
    selected: Vec<String>,
    #[serde(default)]
    skip: bool,
}

#[derive(Serialize)]
struct PublishView {
    #[serde(flatten)]
    post: InstagramPost,
    preview: String,
}

#[derive(Deserialize)]
struct PublishRequest {
    campaign: Campaign,
    #[serde(rename = "userData")]
    user_data: UserData,
    #[serde(rename = "imageUrl", default)]
    image_url: String,
}

#[derive(Deserialize)]
struct MockInsightsQuery {
    #[serde(default)]
    positive: bool,
}

#[derive(Serialize)]
struct InsightsView {
    insights: MetaInsights,
    roi: RoiSummary,
}

#[derive(Serialize)]
struct PreviewView {
    html: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/ai-image", web::post().to(ai_image_route))
            .route("/onboarding", web::post().to(create_session_route))
            .route("/onboarding/{id}", web::get().to(get_session_route))
            .route("/onboarding/{id}/answer", web::post().to(answer_route))
            .route("/onboarding/{id}/select", web::post().to(select_route))
            .route("/onboarding/{id}/toggle", web::post().to(toggle_route))
            .route("/onboarding/{id}/confirm", web::post().to(confirm_route))
            .route("/onboarding/{id}/restart", web::post().to(restart_route))
            .route("/campaigns", web::post().to(campaign_route))
            .route("/images/gallery", web::post().to(gallery_route))
            .route("/images/select", web::post().to(image_selection_route))
            .route("/instagram/publish", web::post().to(publish_route))
            .route("/insights", web::get().to(insights_route))
            .route("/insights/mock", web::get().to(mock_insights_route))
            .route("/ad-preview/{creative_id}", web::get().to(ad_preview_route))
            .route("/dashboard", web::get().to(dashboard_route))
            .route("/user-data", web::get().to(user_data_route)),
    );
}

async fn ai_image_route(
    req: web::Json<ImageRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, TukiError> {
    let prompt = req.into_inner().prompt.unwrap_or_default();
    let url = state.images.generate_image(&prompt).await?;
    Ok(HttpResponse::Ok().json(ImageResponse { url }))
}

async fn create_session_route(state: web::Data<AppState>) -> Result<HttpResponse, TukiError> {
    let view = state.with_sessions(|sessions| {
        let id = sessions.create_session();
        info!("Created onboarding session {} ({} open)", id, sessions.len());
        let wizard = sessions.get_session(&id)?;
        Ok(SessionView::of(id, wizard, None))
    })?;
    Ok(HttpResponse::Created().json(view))
}

async fn get_session_route(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, TukiError> {
    let id = path.into_inner();
    let view = state.with_sessions(|sessions| Ok(SessionView::of(id, sessions.get_session(&id)?, None)))?;
    Ok(HttpResponse::Ok().json(view))
}

/// Runs one wizard step and persists the answers once onboarding completes.
async fn step<F>(state: &AppState, id: Uuid, f: F) -> Result<HttpResponse, TukiError>
where
    F: FnOnce(&mut OnboardingWizard) -> Result<Outcome, TukiError>,
{
    let (view, completed) = state.with_sessions(|sessions| {
        let wizard = sessions.get_session(&id)?;
        let outcome = f(wizard)?;
        let completed = (outcome == Outcome::Completed).then(|| wizard.user_data().clone());
        Ok((SessionView::of(id, wizard, Some(outcome)), completed))
    })?;

    if let Some(user_data) = completed {
        if let Err(e) = state.store.save(&user_data).await {
            error!("Failed to store user data for session {}: {}", id, e);
        }
    }
    Ok(HttpResponse::Ok().json(view))
}

async fn answer_route(
    path: web::Path<Uuid>,
    req: web::Json<AnswerRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, TukiError> {
    step(&state, path.into_inner(), |w| w.submit_text(&req.text)).await
}

async fn select_route(
    path: web::Path<Uuid>,
    req: web::Json<OptionRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, TukiError> {
    step(&state, path.into_inner(), |w| w.select_option(&req.option)).await
}

async fn toggle_route(
    path: web::Path<Uuid>,
    req: web::Json<OptionRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, TukiError> {
    step(&state, path.into_inner(), |w| w.toggle_option(&req.option)).await
}

async fn confirm_route(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, TukiError> {
    step(&state, path.into_inner(), |w| w.confirm_selection()).await
}

async fn restart_route(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, TukiError> {
    let id = path.into_inner();
    let view = state.with_sessions(|sessions| {
        let wizard = sessions.get_session(&id)?;
        wizard.restart();
        Ok(SessionView::of(id, wizard, None))
    })?;
    Ok(HttpResponse::Ok().json(view))
}

async fn campaign_route(
    req: web::Json<CampaignRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, TukiError> {
    let CampaignRequest { user_data, audience } = req.into_inner();
    if let Some(audience) = &audience {
        validate_audience(audience)?;
    }

    tokio::time::sleep(state.config.simulated_delay).await;
    let campaign = create_campaign(&user_data, audience.as_ref(), &mut rand::thread_rng());
    Ok(HttpResponse::Ok().json(campaign))
}

async fn gallery_route(
    req: web::Json<GalleryRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, TukiError> {
    let mut gallery = ImageGallery::new();
    let images = gallery.generate(state.config.simulated_delay).await.to_vec();
    Ok(HttpResponse::Ok().json(GalleryResponse {
        prompt: auto_image_prompt(&req.product_service),
        images,
    }))
}

/// Attaches the images picked from the gallery to a campaign.
async fn image_selection_route(req: web::Json<ImageSelectionRequest>) -> Result<HttpResponse, TukiError> {
    let ImageSelectionRequest {
        mut campaign,
        selected,
        skip,
    } = req.into_inner();

    let mut gallery = ImageGallery::new();
    gallery.generate(std::time::Duration::ZERO).await;
    let images = if skip {
        gallery.skip()
    } else {
        for url in &selected {
            gallery.toggle(url)?;
        }
        gallery.finish()?
    };

    campaign.images = Some(images);
    Ok(HttpResponse::Ok().json(campaign))
}

async fn publish_route(
    req: web::Json<PublishRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, TukiError> {
    let post = publish_to_instagram(
        &req.campaign,
        &req.user_data,
        &req.image_url,
        state.config.simulated_delay,
    )
    .await?;
    let preview = preview_caption(&post.caption);
    Ok(HttpResponse::Ok().json(PublishView { post, preview }))
}

async fn insights_route(state: web::Data<AppState>) -> HttpResponse {
    let insights = state.meta.fetch_insights().await;
    let roi = RoiSummary::from_insights(&insights, state.config.average_sale_value);
    HttpResponse::Ok().json(InsightsView { insights, roi })
}

async fn mock_insights_route(
    query: web::Query<MockInsightsQuery>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let sale_value = state.config.average_sale_value;
    let mut rng = rand::thread_rng();
    let insights = if query.positive {
        generate_positive_insights(&mut rng, sale_value)
    } else {
        generate_mock_insights(&mut rng)
    };
    let roi = RoiSummary::from_insights(&insights, sale_value);
    HttpResponse::Ok().json(InsightsView { insights, roi })
}

async fn ad_preview_route(path: web::Path<String>, state: web::Data<AppState>) -> HttpResponse {
    let html = state.meta.fetch_ad_preview(&path.into_inner()).await;
    HttpResponse::Ok().json(PreviewView { html })
}

async fn dashboard_route() -> HttpResponse {
    HttpResponse::Ok().json(dashboard_snapshot())
}

async fn user_data_route(state: web::Data<AppState>) -> Result<HttpResponse, TukiError> {
    Ok(HttpResponse::Ok().json(state.store.load().await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::{CHANNEL_META, OBJECTIVE_SALES};
    use crate::image_prompt::DEFAULT_IMAGE;
    use crate::questions::QuestionId;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};
    use std::time::Duration;

    fn state(dir: &std::path::Path) -> web::Data<AppState> {
        let config = Config {
            storage_dir: dir.to_string_lossy().into_owned(),
            simulated_delay: Duration::ZERO,
            ..Config::default()
        };
        web::Data::new(AppState::new(config, reqwest::Client::new()))
    }

    #[actix_web::test]
    async fn ai_image_requires_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(App::new().app_data(state(dir.path())).configure(configure)).await;

        let req = test::TestRequest::post().uri("/api/ai-image").set_json(json!({})).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/ai-image")
            .set_json(json!({ "prompt": "velas aromáticas" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["url"], DEFAULT_IMAGE);
    }

    #[actix_web::test]
    async fn onboarding_flow_persists_user_data() {
        let dir = tempfile::tempdir().unwrap();
        let app_state = state(dir.path());
        let app = test::init_service(App::new().app_data(app_state.clone()).configure(configure)).await;

        let req = test::TestRequest::post().uri("/api/onboarding").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let id = body["id"].as_str().unwrap().to_string();
        assert_eq!(body["question"]["id"], QuestionId::ProductService.as_str());

        let post = |path: &str, payload: Value| {
            test::TestRequest::post()
                .uri(&format!("/api/onboarding/{}/{}", id, path))
                .set_json(payload)
                .to_request()
        };

        let body: Value = test::call_and_read_body_json(&app, post("answer", json!({ "text": "asdf" }))).await;
        assert_eq!(body["outcome"]["outcome"], "rejected");

        let body: Value =
            test::call_and_read_body_json(&app, post("answer", json!({ "text": "vendo zapatos de cuero" }))).await;
        assert_eq!(body["outcome"]["question"], "clienteIdeal");

        test::call_service(&app, post("answer", json!({ "text": "hombres de 30 a 50 años" }))).await;
        test::call_service(&app, post("select", json!({ "option": OBJECTIVE_SALES }))).await;
        test::call_service(&app, post("toggle", json!({ "option": "Instagram" }))).await;
        let body: Value = test::call_and_read_body_json(&app, post("confirm", json!({}))).await;
        assert_eq!(body["complete"], true);
        assert_eq!(body["summary"]["redesSociales"], "Instagram");

        let stored = app_state.store.load().await.unwrap().unwrap();
        assert_eq!(stored.product_service, "vendo zapatos de cuero");
        assert_eq!(stored.social_networks, vec!["Instagram".to_string()]);
    }

    #[actix_web::test]
    async fn session_count_stays_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            storage_dir: dir.path().to_string_lossy().into_owned(),
            simulated_delay: Duration::ZERO,
            max_sessions: 2,
            ..Config::default()
        };
        let app_state = web::Data::new(AppState::new(config, reqwest::Client::new()));
        let app = test::init_service(App::new().app_data(app_state.clone()).configure(configure)).await;

        for _ in 0..5 {
            let req = test::TestRequest::post().uri("/api/onboarding").to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
        }
        assert_eq!(app_state.sessions.lock().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn poisoned_session_store_is_a_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let app_state = state(dir.path());
        let poisoner = app_state.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.sessions.lock().unwrap();
            panic!("poison the session lock");
        })
        .join();

        let app = test::init_service(App::new().app_data(app_state).configure(configure)).await;
        let req = test::TestRequest::post().uri("/api/onboarding").to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn unknown_session_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(App::new().app_data(state(dir.path())).configure(configure)).await;
        let req = test::TestRequest::get()
            .uri(&format!("/api/onboarding/{}", Uuid::new_v4()))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn campaign_and_publish() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(App::new().app_data(state(dir.path())).configure(configure)).await;
        let user_data = json!({
            "productoServicio": "vendo mates artesanales",
            "clienteIdeal": "turistas",
            "objetivoMarketing": OBJECTIVE_SALES,
            "redesSociales": ["Facebook"]
        });

        let req = test::TestRequest::post()
            .uri("/api/campaigns")
            .set_json(json!({ "userData": user_data, "audience": {} }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/campaigns")
            .set_json(json!({ "userData": user_data }))
            .to_request();
        let campaign: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(campaign["canal"], CHANNEL_META);
        assert_eq!(campaign["presupuesto"], "$25-40 por día");

        let req = test::TestRequest::post()
            .uri("/api/instagram/publish")
            .set_json(json!({ "campaign": campaign, "userData": user_data }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/instagram/publish")
            .set_json(json!({ "campaign": campaign, "userData": user_data, "imageUrl": DEFAULT_IMAGE }))
            .to_request();
        let post: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(post["status"], "scheduled");
        assert_eq!(post["preview"], preview_caption(post["caption"].as_str().unwrap()));
        assert!(post["hashtags"].as_array().unwrap().contains(&json!("#ventas")));
    }

    #[actix_web::test]
    async fn gallery_selection_attaches_images() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(App::new().app_data(state(dir.path())).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/images/gallery")
            .set_json(json!({ "productoServicio": "velas" }))
            .to_request();
        let gallery: Value = test::call_and_read_body_json(&app, req).await;
        let first = gallery["images"][0].clone();
        assert_eq!(gallery["images"].as_array().unwrap().len(), 4);

        let campaign = json!({
            "titulo": "Velas de primera calidad.",
            "texto": "Somos referentes en velas.",
            "publicoObjetivo": "Argentina",
            "presupuesto": "$15-25 por día",
            "duracion": "7 días",
            "canal": "Google Ads"
        });

        let req = test::TestRequest::post()
            .uri("/api/images/select")
            .set_json(json!({ "campaign": campaign, "selected": [] }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/images/select")
            .set_json(json!({ "campaign": campaign, "selected": [first] }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["imagenes"], json!([first]));

        let req = test::TestRequest::post()
            .uri("/api/images/select")
            .set_json(json!({ "campaign": campaign, "skip": true }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["imagenes"], json!([]));
    }

    #[actix_web::test]
    async fn dashboards_and_insights() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(App::new().app_data(state(dir.path())).configure(configure)).await;

        let req = test::TestRequest::get().uri("/api/dashboard").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["roi"]["percent"], 314.0);

        let req = test::TestRequest::get().uri("/api/insights").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["insights"]["impressions"], 2847);

        let req = test::TestRequest::get().uri("/api/insights/mock?positive=true").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["roi"]["income"].as_f64().unwrap() > body["insights"]["spend"].as_f64().unwrap());

        let req = test::TestRequest::get().uri("/api/ad-preview/555").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["html"].as_str().unwrap().contains("Creative ID: 555"));

        let req = test::TestRequest::get().uri("/api/user-data").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body.is_null());
    }
}
