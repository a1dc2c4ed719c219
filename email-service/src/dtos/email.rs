use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Stylistic register requested for the drafted email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Friendly,
    Professional,
    Formal,
    Polite,
    Neutral,
    Confident,
    Supportive,
    Urgent,
    Apologetic,
    Informative,
}

impl Tone {
    pub const ALL: [Tone; 10] = [
        Tone::Friendly,
        Tone::Professional,
        Tone::Formal,
        Tone::Polite,
        Tone::Neutral,
        Tone::Confident,
        Tone::Supportive,
        Tone::Urgent,
        Tone::Apologetic,
        Tone::Informative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Friendly => "friendly",
            Tone::Professional => "professional",
            Tone::Formal => "formal",
            Tone::Polite => "polite",
            Tone::Neutral => "neutral",
            Tone::Confident => "confident",
            Tone::Supportive => "supportive",
            Tone::Urgent => "urgent",
            Tone::Apologetic => "apologetic",
            Tone::Informative => "informative",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact token match; callers normalize case and whitespace first.
impl FromStr for Tone {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tone::ALL.into_iter().find(|t| t.as_str() == s).ok_or(())
    }
}

/// A validated, normalized generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailRequest {
    pub purpose: String,
    pub recipient_name: String,
    pub tone: Tone,
}

impl EmailRequest {
    /// Schema field order; validation errors are reported in this order.
    pub const FIELDS: [&'static str; 3] = ["purpose", "recipient_name", "tone"];
}

/// Generated email plus the latency of the completion call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub email: String,
    pub response_time_ms: u64,
}

/// Success envelope: `{ "success": true, "data": ... }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_parse() {
        assert_eq!("urgent".parse::<Tone>(), Ok(Tone::Urgent));
        assert!("Urgent".parse::<Tone>().is_err());
        assert!("sarcastic".parse::<Tone>().is_err());
    }

    #[test]
    fn test_generation_result_wire_format() {
        let body = serde_json::to_value(ApiResponse::ok(GenerationResult {
            email: "Hi".to_string(),
            response_time_ms: 42,
        }))
        .unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "success": true,
                "data": { "email": "Hi", "responseTimeMs": 42 }
            })
        );
    }
}
