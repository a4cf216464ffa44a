//! Response models for the typed endpoint wrappers
//!
//! Decoding is tolerant: missing fields fall back to defaults and a few
//! fields accept the alternative names the backend uses (`change_percent`,
//! `content`). Endpoints whose payload is free-form (profiles, goals,
//! history) return `serde_json::Value` instead.

use serde::{Deserialize, Serialize};

/// Readiness score and its components.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ReadinessResponse {
    pub score: f64,
    pub status: String,
    pub status_message: String,
    pub breakdown: ReadinessBreakdown,
    pub suggestions: Vec<String>,
    pub ready_to_invest: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ReadinessBreakdown {
    pub emergency_fund: f64,
    pub savings_rate: f64,
    pub debt_ratio: f64,
    pub risk_alignment: f64,
    pub market_adjustment: f64,
}

/// Market direction used to colour mood indicators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Negative,
    #[default]
    #[serde(other)]
    Neutral,
}

/// Plain-language market explanation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MarketMoodResponse {
    pub headline: String,
    pub summary: String,
    pub tone: Tone,
    pub index_change: f64,
    pub provider: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct IndexQuote {
    pub symbol: String,
    pub value: f64,
    pub change: f64,
    pub change_percent: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SectorResponse {
    pub name: String,
    #[serde(alias = "change_percent")]
    pub change: f64,
    pub reason: String,
    pub weather_icon: String,
    pub weather_label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StockMoverResponse {
    pub symbol: String,
    #[serde(alias = "change_percent")]
    pub change: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Movers {
    pub gainers: Vec<StockMoverResponse>,
    pub losers: Vec<StockMoverResponse>,
}

/// Index, sectors and top movers for the day.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MarketSummaryResponse {
    pub index: IndexQuote,
    pub sectors: Vec<SectorResponse>,
    pub movers: Movers,
    pub mood: String,
    pub mood_emoji: String,
    pub timestamp: String,
}

/// Sector list. The backend may wrap it as `{"sectors": [...], "insight": ...}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum SectorsPayload {
    List(Vec<SectorResponse>),
    Wrapped {
        #[serde(default)]
        sectors: Vec<SectorResponse>,
    },
}

impl From<SectorsPayload> for Vec<SectorResponse> {
    fn from(payload: SectorsPayload) -> Self {
        match payload {
            SectorsPayload::List(sectors) | SectorsPayload::Wrapped { sectors } => sectors,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AdviceText {
    pub sips: String,
    pub lumpsum: String,
    pub long_term: String,
    pub traders: String,
    pub provider: String,
}

/// Personalised advice for each investor type.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DailyAdviceResponse {
    pub readiness_score: f64,
    pub market_risk: String,
    pub advice: AdviceText,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EducationCardResponse {
    pub id: String,
    pub title: String,
    #[serde(alias = "content")]
    pub description: String,
    pub cta_text: String,
    pub cta_link: String,
    pub topic: String,
}

/// Education endpoint answers with one card or a list of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        match value {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readiness_tolerates_missing_fields() {
        let r: ReadinessResponse =
            serde_json::from_str(r#"{"score": 74, "status": "READY"}"#).unwrap();
        assert_eq!(r.score, 74.0);
        assert!(r.suggestions.is_empty());
        assert!(!r.ready_to_invest);
    }

    #[test]
    fn unknown_tone_is_neutral() {
        let m: MarketMoodResponse =
            serde_json::from_str(r#"{"headline": "Flat day", "tone": "mixed"}"#).unwrap();
        assert_eq!(m.tone, Tone::Neutral);
        let m: MarketMoodResponse = serde_json::from_str(r#"{"tone": "negative"}"#).unwrap();
        assert_eq!(m.tone, Tone::Negative);
    }

    #[test]
    fn sector_accepts_change_percent() {
        let s: SectorResponse =
            serde_json::from_str(r#"{"name": "IT", "change_percent": 1.4}"#).unwrap();
        assert_eq!(s.change, 1.4);
    }

    #[test]
    fn sectors_payload_list_or_wrapped() {
        let list: SectorsPayload = serde_json::from_str(r#"[{"name": "Banking"}]"#).unwrap();
        let wrapped: SectorsPayload = serde_json::from_str(
            r#"{"sectors": [{"name": "Pharma"}, {"name": "Auto"}], "insight": "x"}"#,
        )
        .unwrap();
        assert_eq!(Vec::<SectorResponse>::from(list).len(), 1);
        assert_eq!(Vec::<SectorResponse>::from(wrapped).len(), 2);
    }

    #[test]
    fn education_single_card_becomes_list() {
        let one: OneOrMany<EducationCardResponse> = serde_json::from_str(
            r#"{"topic": "Volatility", "content": "Prices move.", "provider": "gemini"}"#,
        )
        .unwrap();
        let cards: Vec<EducationCardResponse> = one.into();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].description, "Prices move.");
    }
}
