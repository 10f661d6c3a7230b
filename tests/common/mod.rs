#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::{json, Value};

use mygram_api::config::AppConfig;
use mygram_api::database::InMemoryStore;
use mygram_api::state::AppState;

pub const PASSWORD: &str = "secret123";

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Serve a fresh app backed by an empty in-memory store on an ephemeral port
    pub async fn spawn() -> Result<Self> {
        let state = AppState::new(
            Arc::new(InMemoryStore::new()),
            AppConfig::in_memory("integration-test-secret"),
        )?;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind test listener")?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            let _ = axum::serve(listener, mygram_api::app(state)).await;
        });

        Ok(Self {
            base_url: format!("http://{}", addr),
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.get(self.url(path)).bearer_auth(token)
    }

    pub fn post(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.post(self.url(path)).bearer_auth(token)
    }

    pub fn put(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.put(self.url(path)).bearer_auth(token)
    }

    pub fn delete(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.delete(self.url(path)).bearer_auth(token)
    }

    pub async fn register(&self, username: &str, email: &str) -> Result<Value> {
        let res = self
            .client
            .post(self.url("/users/register"))
            .json(&json!({
                "username": username,
                "email": email,
                "password": PASSWORD,
                "age": 21
            }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());
        Ok(res.json().await?)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/users/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?)
    }

    /// Register a user and return a bearer token for it
    pub async fn user_token(&self, username: &str) -> Result<String> {
        let email = format!("{}@mygram.test", username);
        self.register(username, &email).await?;

        let res = self.login(&email, PASSWORD).await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        let body: Value = res.json().await?;
        body["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }

    pub async fn create_photo(&self, token: &str, title: &str) -> Result<i64> {
        let res = self
            .post("/photos", token)
            .json(&json!({
                "title": title,
                "caption": "caption",
                "photo_url": "https://img.example/1.jpg"
            }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create photo failed: {}", res.status());
        let body: Value = res.json().await?;
        body["id"].as_i64().context("photo has no id")
    }
}
