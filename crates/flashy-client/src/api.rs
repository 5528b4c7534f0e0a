//! Typed HTTP client for the Flashy API.
//!
//! Every request carries the device identity in `X-Device-Id`. A non-success
//! response is turned into [`ClientError::Api`] using the server's
//! `{ "error": ... }` message. Nothing is retried.

use flashy_shared::constants::DEVICE_ID_HEADER;
use flashy_shared::protocol::{
    CardRequest, CardResponse, CardsResponse, CreateDeckRequest, DeckResponse, DecksResponse,
    ErrorResponse, HealthResponse, SuccessResponse, UpdateDeckRequest,
};
use flashy_shared::{validation, Card, Deck, DeviceId};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::device::DeviceIdentity;
use crate::error::{ClientError, Result};
use crate::review::ReviewSession;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    device_id: DeviceId,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, device_id: DeviceId) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            device_id,
        }
    }

    /// Build a client from configuration, loading (or creating) the device identity.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let path = match &config.device_id_path {
            Some(path) => path.clone(),
            None => DeviceIdentity::default_path()?,
        };
        let identity = DeviceIdentity::load_or_create(&path)?;
        Ok(Self::new(config.base_url.clone(), identity.id().clone()))
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header(DEVICE_ID_HEADER, self.device_id.as_str())
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .map(|e| e.error)
            .unwrap_or(text);
        debug!(status = status.as_u16(), %message, "API request failed");
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    // ─── Health ───

    /// Server and database liveness.
    pub async fn health(&self) -> Result<HealthResponse> {
        self.send(self.request(Method::GET, "/health")).await
    }

    // ─── Decks ───

    pub async fn list_decks(&self) -> Result<Vec<Deck>> {
        let resp: DecksResponse = self.send(self.request(Method::GET, "/decks")).await?;
        Ok(resp.decks)
    }

    pub async fn get_deck(&self, deck_id: Uuid) -> Result<Deck> {
        let resp: DeckResponse = self
            .send(self.request(Method::GET, &format!("/decks/{deck_id}")))
            .await?;
        Ok(resp.deck)
    }

    pub async fn create_deck(
        &self,
        title: &str,
        description: Option<&str>,
        color: Option<&str>,
    ) -> Result<Deck> {
        let title = validation::deck_title(Some(title))?;
        let body = CreateDeckRequest {
            title: Some(title),
            description: description.map(str::to_string),
            color: color.map(str::to_string),
        };
        let resp: DeckResponse = self
            .send(self.request(Method::POST, "/decks").json(&body))
            .await?;
        Ok(resp.deck)
    }

    pub async fn update_deck(
        &self,
        deck_id: Uuid,
        title: &str,
        description: Option<&str>,
    ) -> Result<Deck> {
        let title = validation::deck_title(Some(title))?;
        let body = UpdateDeckRequest {
            title: Some(title),
            description: description.map(str::to_string),
        };
        let resp: DeckResponse = self
            .send(
                self.request(Method::PUT, &format!("/decks/{deck_id}"))
                    .json(&body),
            )
            .await?;
        Ok(resp.deck)
    }

    pub async fn delete_deck(&self, deck_id: Uuid) -> Result<()> {
        let _: SuccessResponse = self
            .send(self.request(Method::DELETE, &format!("/decks/{deck_id}")))
            .await?;
        Ok(())
    }

    // ─── Cards ───

    pub async fn list_cards(&self, deck_id: Uuid) -> Result<Vec<Card>> {
        let resp: CardsResponse = self
            .send(self.request(Method::GET, &format!("/decks/{deck_id}/cards")))
            .await?;
        Ok(resp.cards)
    }

    pub async fn create_card(&self, deck_id: Uuid, front: &str, back: &str) -> Result<Card> {
        let body = card_body(front, back)?;
        let resp: CardResponse = self
            .send(
                self.request(Method::POST, &format!("/decks/{deck_id}/cards"))
                    .json(&body),
            )
            .await?;
        Ok(resp.card)
    }

    pub async fn update_card(
        &self,
        deck_id: Uuid,
        card_id: Uuid,
        front: &str,
        back: &str,
    ) -> Result<Card> {
        let body = card_body(front, back)?;
        let resp: CardResponse = self
            .send(
                self.request(Method::PUT, &format!("/decks/{deck_id}/cards/{card_id}"))
                    .json(&body),
            )
            .await?;
        Ok(resp.card)
    }

    pub async fn delete_card(&self, deck_id: Uuid, card_id: Uuid) -> Result<()> {
        let _: SuccessResponse = self
            .send(self.request(Method::DELETE, &format!("/decks/{deck_id}/cards/{card_id}")))
            .await?;
        Ok(())
    }

    // ─── Review ───

    /// Load a deck's cards and start a fresh review session over them.
    pub async fn start_review(&self, deck_id: Uuid) -> Result<ReviewSession> {
        let cards = self.list_cards(deck_id).await?;
        Ok(ReviewSession::start(cards)?)
    }
}

fn card_body(front: &str, back: &str) -> Result<CardRequest> {
    let (front, back) = validation::card_sides_for_submit(front, back)?;
    Ok(CardRequest {
        front: Some(front),
        back: Some(back),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use chrono::Utc;
    use flashy_shared::constants::MAX_CARD_TEXT_LEN;
    use flashy_shared::ValidationError;
    use serde_json::json;

    /// Serve a stub API on an ephemeral port.
    ///
    /// `/decks` echoes the device header back as the owner of one deck;
    /// `/decks/:id/cards` returns two cards; everything else is a 404.
    async fn stub_server() -> String {
        async fn decks(headers: HeaderMap) -> Json<serde_json::Value> {
            let owner = headers
                .get("x-device-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            Json(json!({ "decks": [{
                "id": Uuid::nil(),
                "device_id": owner,
                "title": "Echo",
                "description": null,
                "color": "#6B4EFF",
                "created_at": Utc::now(),
                "card_count": 0,
                "is_starter": false
            }]}))
        }

        async fn cards(Path(deck_id): Path<Uuid>) -> Json<serde_json::Value> {
            let card = |front: &str| {
                json!({
                    "id": Uuid::new_v4(),
                    "deck_id": deck_id,
                    "front": front,
                    "back": "back",
                    "created_at": Utc::now()
                })
            };
            Json(json!({ "cards": [card("one"), card("two")] }))
        }

        async fn missing() -> (StatusCode, Json<serde_json::Value>) {
            (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
        }

        let app = Router::new()
            .route("/decks", get(decks))
            .route("/decks/:deck_id/cards", get(cards))
            .fallback(missing);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn sends_device_header() {
        let base = stub_server().await;
        let client = ApiClient::new(base, DeviceId::parse("device-a").unwrap());

        let decks = client.list_decks().await.unwrap();
        assert_eq!(decks.len(), 1);
        assert_eq!(decks[0].owner_id.as_str(), "device-a");
        assert!(decks[0].editable_by(client.device_id()));
    }

    #[tokio::test]
    async fn error_body_becomes_api_error() {
        let base = stub_server().await;
        let client = ApiClient::new(base, DeviceId::generate());

        let err = client.get_deck(Uuid::new_v4()).await.unwrap_err();
        assert!(err.is_not_found());
        match err {
            ClientError::Api { message, .. } => assert_eq!(message, "Not found"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn start_review_shuffles_loaded_cards() {
        let base = stub_server().await;
        let client = ApiClient::new(base, DeviceId::generate());

        let session = client.start_review(Uuid::new_v4()).await.unwrap();
        assert_eq!(session.total(), 2);
        assert_eq!(session.position(), 1);
    }

    #[tokio::test]
    async fn card_text_validated_before_sending() {
        // Nothing listens here; validation must fail first.
        let client = ApiClient::new("http://127.0.0.1:9", DeviceId::generate());
        let deck = Uuid::new_v4();

        let err = client.create_card(deck, " ", "back").await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::FrontBackRequired)
        ));

        let long = "x".repeat(MAX_CARD_TEXT_LEN + 1);
        let err = client.update_card(deck, Uuid::new_v4(), &long, "b").await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::TooLong { field: "front", .. })
        ));
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = ApiClient::new("http://localhost:8080/", DeviceId::generate());
        assert_eq!(client.url("/decks"), "http://localhost:8080/decks");
    }
}
