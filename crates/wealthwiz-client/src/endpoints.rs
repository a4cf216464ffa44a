//! Typed endpoint wrappers
//!
//! One method per backend route. Every call goes through
//! `ApiClient::request`, so authenticated routes get the bearer token and
//! the refresh-and-retry behaviour for free; public routes simply carry no
//! token when none is held.

use reqwest::Method;
use serde_json::Value;
use tracing::info;
use wealthwiz_auth::{
    AuthResponse, LOGIN_PATH, LoginRequest, ME_PATH, REGISTER_PATH, RegisterRequest, TokenPair,
};

use crate::client::{ApiClient, RequestOptions};
use crate::error::Result;
use crate::types::{
    DailyAdviceResponse, EducationCardResponse, MarketMoodResponse, MarketSummaryResponse,
    Movers, OneOrMany, ReadinessResponse, SectorResponse, SectorsPayload,
};

pub const PROFILE_PATH: &str = "/profile/";
pub const FINANCIAL_PATH: &str = "/financial/";
pub const RISK_PATH: &str = "/risk/";
pub const GOALS_PATH: &str = "/goals/";
pub const READINESS_PATH: &str = "/readiness/";
pub const READINESS_HISTORY_PATH: &str = "/readiness/history/";
pub const MARKET_SUMMARY_PATH: &str = "/market/summary/";
pub const MARKET_EXPLAINED_PATH: &str = "/market/explained/";
pub const MARKET_RISK_PATH: &str = "/market/risk/";
pub const SECTORS_PATH: &str = "/sectors/";
pub const MOVERS_PATH: &str = "/movers/";
pub const DAILY_ADVICE_PATH: &str = "/advice/today/";
pub const PATTERN_INSIGHT_PATH: &str = "/insights/pattern/";
pub const EDUCATION_PATH: &str = "/education/today/";
pub const EXPLAIN_PATH: &str = "/explain/";
pub const NOTIFICATION_PREVIEW_PATH: &str = "/notifications/preview/";

impl ApiClient {
    // --- session ---

    /// Create an account and store the issued token pair.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        let options = RequestOptions::new().method(Method::POST).json(request)?;
        let response: AuthResponse = self.request(REGISTER_PATH, options).await?;
        self.set_tokens(
            response.tokens.access.clone(),
            response.tokens.refresh.clone(),
        )
        .await?;
        info!(user_id = response.user.id, "registered");
        Ok(response)
    }

    /// Obtain a token pair for existing credentials and store it.
    pub async fn login(&self, request: &LoginRequest) -> Result<TokenPair> {
        let options = RequestOptions::new().method(Method::POST).json(request)?;
        let tokens: TokenPair = self.request(LOGIN_PATH, options).await?;
        self.set_tokens(tokens.access.clone(), tokens.refresh.clone())
            .await?;
        info!("logged in");
        Ok(tokens)
    }

    /// Forget the held tokens. No server call is made.
    pub async fn logout(&self) -> Result<()> {
        self.clear_tokens().await?;
        info!("logged out");
        Ok(())
    }

    /// Current user with their profile.
    pub async fn me(&self) -> Result<Value> {
        self.request(ME_PATH, RequestOptions::new()).await
    }

    // --- profiles ---

    pub async fn profile(&self) -> Result<Value> {
        self.request(PROFILE_PATH, RequestOptions::new()).await
    }

    pub async fn update_profile(&self, data: &Value) -> Result<Value> {
        self.put(PROFILE_PATH, data).await
    }

    pub async fn financial_profile(&self) -> Result<Value> {
        self.request(FINANCIAL_PATH, RequestOptions::new()).await
    }

    pub async fn update_financial_profile(&self, data: &Value) -> Result<Value> {
        self.put(FINANCIAL_PATH, data).await
    }

    pub async fn risk_profile(&self) -> Result<Value> {
        self.request(RISK_PATH, RequestOptions::new()).await
    }

    pub async fn update_risk_profile(&self, data: &Value) -> Result<Value> {
        self.put(RISK_PATH, data).await
    }

    // --- goals ---

    pub async fn goals(&self) -> Result<Value> {
        self.request(GOALS_PATH, RequestOptions::new()).await
    }

    pub async fn create_goal(&self, goal: &Value) -> Result<Value> {
        let options = RequestOptions::new().method(Method::POST).body(goal.clone());
        self.request(GOALS_PATH, options).await
    }

    pub async fn update_goal(&self, id: u64, goal: &Value) -> Result<Value> {
        self.put(&goal_path(id), goal).await
    }

    pub async fn delete_goal(&self, id: u64) -> Result<()> {
        let options = RequestOptions::new().method(Method::DELETE);
        let _: Value = self.request(&goal_path(id), options).await?;
        Ok(())
    }

    // --- readiness ---

    pub async fn readiness(&self) -> Result<ReadinessResponse> {
        self.request(READINESS_PATH, RequestOptions::new()).await
    }

    pub async fn readiness_history(&self) -> Result<Value> {
        self.request(READINESS_HISTORY_PATH, RequestOptions::new())
            .await
    }

    // --- market ---

    pub async fn market_summary(&self) -> Result<MarketSummaryResponse> {
        self.request(MARKET_SUMMARY_PATH, RequestOptions::new())
            .await
    }

    pub async fn market_explained(&self) -> Result<MarketMoodResponse> {
        self.request(MARKET_EXPLAINED_PATH, RequestOptions::new())
            .await
    }

    pub async fn market_risk(&self) -> Result<Value> {
        self.request(MARKET_RISK_PATH, RequestOptions::new()).await
    }

    pub async fn sectors(&self) -> Result<Vec<SectorResponse>> {
        let payload: SectorsPayload = self.request(SECTORS_PATH, RequestOptions::new()).await?;
        Ok(payload.into())
    }

    /// Top `count` gainers and losers.
    pub async fn movers(&self, count: u32) -> Result<Movers> {
        let path = format!("{MOVERS_PATH}?count={count}");
        self.request(&path, RequestOptions::new()).await
    }

    // --- advice & education ---

    pub async fn daily_advice(&self) -> Result<DailyAdviceResponse> {
        self.request(DAILY_ADVICE_PATH, RequestOptions::new()).await
    }

    pub async fn pattern_insight(&self) -> Result<Value> {
        self.request(PATTERN_INSIGHT_PATH, RequestOptions::new())
            .await
    }

    /// Today's education cards. A single card is returned as a one-item list.
    pub async fn education_cards(&self) -> Result<Vec<EducationCardResponse>> {
        let cards: OneOrMany<EducationCardResponse> =
            self.request(EDUCATION_PATH, RequestOptions::new()).await?;
        Ok(cards.into())
    }

    /// Plain-language answer to a beginner question.
    pub async fn beginner_explanation(&self, query: &str) -> Result<Value> {
        let path = format!("{EXPLAIN_PATH}?q={}", urlencoding::encode(query));
        self.request(&path, RequestOptions::new()).await
    }

    pub async fn notification_preview(&self) -> Result<Value> {
        self.request(NOTIFICATION_PREVIEW_PATH, RequestOptions::new())
            .await
    }

    async fn put(&self, path: &str, data: &Value) -> Result<Value> {
        let options = RequestOptions::new().method(Method::PUT).body(data.clone());
        self.request(path, options).await
    }
}

fn goal_path(id: u64) -> String {
    format!("{GOALS_PATH}{id}/")
}
