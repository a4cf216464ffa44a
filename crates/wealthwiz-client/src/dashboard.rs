//! Dashboard aggregation
//!
//! Combines the public market endpoints (and, when signed in, readiness and
//! the user's name) into the single view model the dashboard renders. A
//! failing source never fails the whole load; its section falls back to a
//! placeholder instead.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::client::ApiClient;
use crate::types::{
    DailyAdviceResponse, EducationCardResponse, MarketMoodResponse, MarketSummaryResponse,
    ReadinessResponse, SectorResponse, StockMoverResponse, Tone,
};

const DEFAULT_USER_NAME: &str = "User";
const DEFAULT_READINESS_SCORE: f64 = 62.0;
const DEFAULT_SCORE_MESSAGE: &str =
    "Complete your profile to get your personalized readiness score.";
const DEFAULT_MARKET_STATUS: &str = "Market data loading...";
const DEFAULT_MARKET_DESCRIPTION: &str = "Connect to backend to see live market analysis.";
const MAX_MOVERS: usize = 5;

const BROKERS: [(&str, &str); 3] = [
    ("Groww", "https://groww.in"),
    ("Zerodha", "https://zerodha.com"),
    ("INDmoney", "https://indmoney.com"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub name: String,
    pub readiness_score: f64,
    pub score_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketMood {
    pub status: String,
    pub status_color: Tone,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorHighlight {
    pub name: String,
    pub change: f64,
    pub reason: String,
    pub weather_icon: String,
    pub weather_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestorAdvice {
    #[serde(rename = "type")]
    pub kind: String,
    pub advice: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationalCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub cta_text: String,
    pub cta_link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrokerPlatform {
    pub name: String,
    pub url: String,
}

/// Everything the dashboard shows, in the camelCase shape the UI consumes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub user: UserSummary,
    pub market_mood: MarketMood,
    pub sector_highlights: Vec<SectorHighlight>,
    pub stock_movers: Vec<StockMoverResponse>,
    pub investor_advice: Vec<InvestorAdvice>,
    pub educational_cards: Vec<EducationalCard>,
    pub broker_platforms: Vec<BrokerPlatform>,
}

/// Raw results of the individual fetches, `None` where a call failed.
#[derive(Debug, Default)]
struct Sources {
    summary: Option<MarketSummaryResponse>,
    explained: Option<MarketMoodResponse>,
    sectors: Vec<SectorResponse>,
    advice: Option<DailyAdviceResponse>,
    education: Vec<EducationCardResponse>,
    readiness: Option<ReadinessResponse>,
    user_name: Option<String>,
}

impl ApiClient {
    /// Load the dashboard. Never fails; unavailable sections use defaults.
    #[instrument(skip_all)]
    pub async fn dashboard(&self) -> DashboardData {
        let (summary, explained, sectors, advice, education) = tokio::join!(
            self.market_summary(),
            self.market_explained(),
            self.sectors(),
            self.daily_advice(),
            self.education_cards(),
        );

        let mut sources = Sources {
            summary: ok_or_log("market summary", summary),
            explained: ok_or_log("market explanation", explained),
            sectors: ok_or_log("sectors", sectors).unwrap_or_default(),
            advice: ok_or_log("daily advice", advice),
            education: ok_or_log("education", education).unwrap_or_default(),
            ..Sources::default()
        };

        if self.is_authenticated().await {
            // The name is only looked up once readiness is known to work
            match self.readiness().await {
                Ok(readiness) => {
                    sources.readiness = Some(readiness);
                    sources.user_name = ok_or_log("me", self.me().await)
                        .as_ref()
                        .and_then(profile_name);
                }
                Err(e) => debug!(error = %e, "readiness unavailable, using defaults"),
            }
        }

        assemble(sources)
    }
}

fn ok_or_log<T>(source: &str, result: crate::Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(source, error = %e, "dashboard source unavailable");
            None
        }
    }
}

fn profile_name(me: &Value) -> Option<String> {
    me.pointer("/profile/full_name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
}

fn assemble(sources: Sources) -> DashboardData {
    let user = UserSummary {
        name: sources
            .user_name
            .unwrap_or_else(|| DEFAULT_USER_NAME.to_string()),
        readiness_score: sources
            .readiness
            .as_ref()
            .map_or(DEFAULT_READINESS_SCORE, |r| r.score),
        score_message: sources
            .readiness
            .map_or_else(|| DEFAULT_SCORE_MESSAGE.to_string(), |r| r.status_message),
    };

    let market_mood = match sources.explained {
        Some(mood) => MarketMood {
            status: mood.headline,
            status_color: mood.tone,
            description: mood.summary,
        },
        None => MarketMood {
            status: DEFAULT_MARKET_STATUS.to_string(),
            status_color: Tone::Neutral,
            description: DEFAULT_MARKET_DESCRIPTION.to_string(),
        },
    };

    let sector_highlights = sources
        .sectors
        .into_iter()
        .map(|s| SectorHighlight {
            name: s.name,
            change: s.change,
            reason: s.reason,
            weather_icon: s.weather_icon,
            weather_label: s.weather_label,
        })
        .collect();

    let stock_movers = sources
        .summary
        .map(|summary| {
            summary
                .movers
                .gainers
                .into_iter()
                .chain(summary.movers.losers)
                .take(MAX_MOVERS)
                .collect()
        })
        .unwrap_or_default();

    let investor_advice = sources
        .advice
        .map(|daily| {
            let a = daily.advice;
            [
                ("SIPs", a.sips),
                ("Lump-sum", a.lumpsum),
                ("Long-term investors", a.long_term),
                ("High-vol traders", a.traders),
            ]
            .into_iter()
            .map(|(kind, advice)| InvestorAdvice {
                kind: kind.to_string(),
                advice,
            })
            .collect()
        })
        .unwrap_or_default();

    let educational_cards = sources
        .education
        .into_iter()
        .enumerate()
        .map(|(idx, card)| EducationalCard {
            id: if card.id.is_empty() {
                (idx + 1).to_string()
            } else {
                card.id
            },
            title: card.title,
            description: card.description,
            cta_text: card.cta_text,
            cta_link: card.cta_link,
        })
        .collect();

    let broker_platforms = BROKERS
        .iter()
        .map(|(name, url)| BrokerPlatform {
            name: name.to_string(),
            url: url.to_string(),
        })
        .collect();

    DashboardData {
        user,
        market_mood,
        sector_highlights,
        stock_movers,
        investor_advice,
        educational_cards,
        broker_platforms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::client_for;
    use axum::Json;
    use axum::response::{IntoResponse, Response};
    use std::sync::Arc;
    use tokio::net::TcpListener;
    use wealthwiz_auth::MemoryTokenStore;

    fn mover(symbol: &str, change: f64) -> Value {
        serde_json::json!({"symbol": symbol, "change": change, "reason": "news"})
    }

    async fn market_backend(request: axum::extract::Request) -> Response {
        let authed = request.headers().contains_key("authorization");
        let body = match request.uri().path() {
            "/market/summary/" => serde_json::json!({
                "movers": {
                    "gainers": [mover("TCS", 2.0), mover("INFY", 1.5), mover("HCL", 1.1)],
                    "losers": [mover("ITC", -1.0), mover("SBI", -1.2), mover("LT", -2.0)]
                }
            }),
            "/market/explained/" => serde_json::json!({
                "headline": "Markets up", "summary": "Broad rally.", "tone": "positive"
            }),
            "/sectors/" => serde_json::json!([
                {
                    "name": "IT",
                    "change": 1.3,
                    "reason": "Deals",
                    "weather_icon": "☀️",
                    "weather_label": "Sunny"
                }
            ]),
            "/advice/today/" => serde_json::json!({
                "advice": {
                    "sips": "Continue",
                    "lumpsum": "Stagger",
                    "long_term": "Hold",
                    "traders": "Tight stops"
                }
            }),
            "/education/today/" => serde_json::json!([
                {
                    "title": "SIP basics",
                    "description": "Monthly",
                    "cta_text": "Learn",
                    "cta_link": "/learn"
                },
                {"id": "vol", "title": "Volatility"}
            ]),
            "/readiness/" if authed => serde_json::json!({"score": 81, "status_message": "Ready"}),
            "/auth/me/" if authed => serde_json::json!({"profile": {"full_name": "Asha Rao"}}),
            _ => return axum::http::StatusCode::UNAUTHORIZED.into_response(),
        };
        Json(body).into_response()
    }

    async fn start_market_backend() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let app = axum::Router::new().fallback(market_backend);
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn all_sources_failing_yields_defaults() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = client_for(&format!("http://{addr}"), Arc::new(MemoryTokenStore::new()));

        let data = client.dashboard().await;
        assert_eq!(data.user.name, "User");
        assert_eq!(data.user.readiness_score, 62.0);
        assert_eq!(data.user.score_message, DEFAULT_SCORE_MESSAGE);
        assert_eq!(data.market_mood.status, "Market data loading...");
        assert_eq!(data.market_mood.status_color, Tone::Neutral);
        assert_eq!(
            data.market_mood.description,
            "Connect to backend to see live market analysis."
        );
        assert!(data.sector_highlights.is_empty());
        assert!(data.stock_movers.is_empty());
        assert!(data.investor_advice.is_empty());
        assert!(data.educational_cards.is_empty());
        assert_eq!(data.broker_platforms.len(), 3);
        assert_eq!(data.broker_platforms[0].name, "Groww");
    }

    #[tokio::test]
    async fn anonymous_dashboard_maps_public_sources() {
        let url = start_market_backend().await;
        let client = client_for(&url, Arc::new(MemoryTokenStore::new()));

        let data = client.dashboard().await;

        assert_eq!(data.user.name, "User");
        assert_eq!(data.user.readiness_score, 62.0);
        assert_eq!(data.market_mood.status, "Markets up");
        assert_eq!(data.market_mood.status_color, Tone::Positive);
        assert_eq!(data.sector_highlights[0].weather_label, "Sunny");

        let symbols: Vec<_> = data.stock_movers.iter().map(|m| m.symbol.as_str()).collect();
        assert_eq!(symbols, ["TCS", "INFY", "HCL", "ITC", "SBI"]);

        let kinds: Vec<_> = data.investor_advice.iter().map(|a| a.kind.as_str()).collect();
        assert_eq!(kinds, ["SIPs", "Lump-sum", "Long-term investors", "High-vol traders"]);
        assert_eq!(data.investor_advice[3].advice, "Tight stops");

        assert_eq!(data.educational_cards[0].id, "1");
        assert_eq!(data.educational_cards[1].id, "vol");
    }

    #[tokio::test]
    async fn signed_in_dashboard_uses_readiness_and_name() {
        let url = start_market_backend().await;
        let client = client_for(&url, Arc::new(MemoryTokenStore::new()));
        client.set_tokens("tok".into(), "rt".into()).await.unwrap();

        let data = client.dashboard().await;
        assert_eq!(data.user.name, "Asha Rao");
        assert_eq!(data.user.readiness_score, 81.0);
        assert_eq!(data.user.score_message, "Ready");
    }

    #[test]
    fn serializes_in_camel_case() {
        let data = assemble(Sources::default());
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["user"]["readinessScore"], 62.0);
        assert_eq!(json["marketMood"]["statusColor"], "neutral");
        assert!(json["brokerPlatforms"].is_array());
        assert!(json.get("sector_highlights").is_none());
    }

    #[test]
    fn blank_profile_name_falls_back() {
        assert_eq!(profile_name(&serde_json::json!({"profile": {"full_name": ""}})), None);
        assert_eq!(profile_name(&serde_json::json!({"profile": null})), None);
        assert_eq!(
            profile_name(&serde_json::json!({"profile": {"full_name": "Ravi"}})),
            Some("Ravi".to_string())
        );
    }
}
