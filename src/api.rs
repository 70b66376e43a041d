//! Client for the race server's REST API.
//!
//! [`RaceApi`] is the seam the race controller talks to; [`HttpClient`] is
//! the browser implementation built on `fetch`. Every call returns a
//! `Result`, and failures are logged where they happen so an empty list can
//! be told apart from a failed request.

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::model::{CreateRace, CreatedRace, RaceId, RaceSnapshot, Racer, Track};
use log::{info, warn};
use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

/// The six calls the client makes against the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Tracks,
    Racers,
    CreateRace,
    Race(RaceId),
    StartRace(RaceId),
    Accelerate(RaceId),
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Endpoint::Tracks => "/api/tracks".to_string(),
            Endpoint::Racers => "/api/cars".to_string(),
            Endpoint::CreateRace => "/api/races".to_string(),
            Endpoint::Race(id) => format!("/api/races/{}", id),
            Endpoint::StartRace(id) => format!("/api/races/{}/start", id),
            Endpoint::Accelerate(id) => format!("/api/races/{}/accelerate", id),
        }
    }

    pub fn method(&self) -> &'static str {
        match self {
            Endpoint::Tracks | Endpoint::Racers | Endpoint::Race(_) => "GET",
            Endpoint::CreateRace | Endpoint::StartRace(_) | Endpoint::Accelerate(_) => "POST",
        }
    }
}

/// Classify a response status; anything outside 2xx is an error.
pub fn check_status(status: u16, url: &str) -> Result<(), ApiError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(ApiError::Http {
            status,
            url: url.to_string(),
        })
    }
}

pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    Ok(serde_json::from_str(body)?)
}

/// Operations the race controller and the UI need from the server.
#[allow(async_fn_in_trait)]
pub trait RaceApi {
    async fn tracks(&self) -> Result<Vec<Track>, ApiError>;
    async fn racers(&self) -> Result<Vec<Racer>, ApiError>;
    async fn create_race(&self, request: CreateRace) -> Result<CreatedRace, ApiError>;
    async fn race(&self, id: RaceId) -> Result<RaceSnapshot, ApiError>;
    async fn start_race(&self, id: RaceId) -> Result<(), ApiError>;
    async fn accelerate(&self, id: RaceId) -> Result<(), ApiError>;
}

/// `fetch`-backed client used in the browser.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HttpClient {
    config: ApiConfig,
}

impl HttpClient {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    fn build_request(
        &self,
        endpoint: Endpoint,
        url: &str,
        body: Option<String>,
    ) -> Result<Request, JsValue> {
        let opts = RequestInit::new();
        opts.set_method(endpoint.method());
        if endpoint.method() == "POST" {
            opts.set_mode(RequestMode::Cors);
            let headers = Headers::new()?;
            headers.set("Content-Type", "application/json")?;
            headers.set("Access-Control-Allow-Origin", &self.config.base_url)?;
            opts.set_headers(&headers);
        }
        if let Some(body) = body {
            opts.set_body(&JsValue::from_str(&body));
        }
        Request::new_with_str_and_init(url, &opts)
    }

    /// Issue one request and hand back the response body as text.
    async fn send(&self, endpoint: Endpoint, body: Option<String>) -> Result<String, ApiError> {
        let url = self.config.url(&endpoint.path());
        info!("calling server :: {} {}", endpoint.method(), url);

        let window = web_sys::window().ok_or_else(|| ApiError::Transport("no window".into()))?;
        let request = self
            .build_request(endpoint, &url, body)
            .map_err(|e| ApiError::Transport(format!("{:?}", e)))?;

        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| ApiError::Transport(format!("{:?}", e)))?
            .dyn_into()
            .map_err(|_| ApiError::Transport("fetch did not return a Response".into()))?;

        check_status(response.status(), &url)?;

        let text = response
            .text()
            .map_err(|e| ApiError::Transport(format!("{:?}", e)))?;
        let text = JsFuture::from(text)
            .await
            .map_err(|e| ApiError::Transport(format!("{:?}", e)))?;
        Ok(text.as_string().unwrap_or_default())
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, ApiError> {
        let body = self.send(endpoint, None).await?;
        decode(&body)
    }
}

fn logged<T>(what: &str, result: Result<T, ApiError>) -> Result<T, ApiError> {
    if let Err(ref err) = result {
        warn!("Problem with {} :: {}", what, err);
    }
    result
}

impl RaceApi for HttpClient {
    async fn tracks(&self) -> Result<Vec<Track>, ApiError> {
        logged("getTracks", self.get_json(Endpoint::Tracks).await)
    }

    async fn racers(&self) -> Result<Vec<Racer>, ApiError> {
        logged("getRacers", self.get_json(Endpoint::Racers).await)
    }

    async fn create_race(&self, request: CreateRace) -> Result<CreatedRace, ApiError> {
        let result: Result<CreatedRace, ApiError> = async {
            let body = serde_json::to_string(&request)?;
            let text = self.send(Endpoint::CreateRace, Some(body)).await?;
            decode(&text)
        }
        .await;
        logged("createRace", result)
    }

    async fn race(&self, id: RaceId) -> Result<RaceSnapshot, ApiError> {
        logged("getRace", self.get_json(Endpoint::Race(id)).await)
    }

    async fn start_race(&self, id: RaceId) -> Result<(), ApiError> {
        let result = self.send(Endpoint::StartRace(id), None).await.map(|_| ());
        logged("startRace", result)
    }

    async fn accelerate(&self, id: RaceId) -> Result<(), ApiError> {
        let result = self.send(Endpoint::Accelerate(id), None).await.map(|_| ());
        logged("accelerate", result)
    }
}
