use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::api_client::endpoint;

// ────────────────────────────────────────────────────────────────────────────
// Wire format (POST /api/analyze success body)
// ────────────────────────────────────────────────────────────────────────────

/// Success body as sent by the analysis service. Every field is optional on
/// the wire and read on its own: a field of the wrong type counts as absent
/// instead of failing the whole body. Defaults are filled in when converting
/// to [`AnalysisResult`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_breakdown")]
    pub breakdown: Option<WireBreakdown>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub suggestions: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub pdf_path: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email_warning: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireBreakdown {
    #[serde(default, deserialize_with = "lenient_number")]
    pub skills: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub experience: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub education: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub extras: Option<f64>,
}

/// Numbers, or strings holding a number (`"85"`). Anything else is absent.
fn lenient_number<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// String entries of an array; other entries are skipped.
fn lenient_strings<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Vec<String>>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

fn lenient_breakdown<'de, D: Deserializer<'de>>(
    de: D,
) -> Result<Option<WireBreakdown>, D::Error> {
    Ok(match Value::deserialize(de)? {
        value @ Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Domain model
// ────────────────────────────────────────────────────────────────────────────

/// Per-category percentages, each 0 – 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub skills: u8,
    pub experience: u8,
    pub education: u8,
    pub extras: u8,
}

impl Breakdown {
    /// Categories in display order.
    pub fn categories(&self) -> [(&'static str, u8); 4] {
        [
            ("Skills", self.skills),
            ("Experience", self.experience),
            ("Education", self.education),
            ("Extras", self.extras),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub report_id: Option<String>,
    pub match_score: u8,
    pub breakdown: Breakdown,
    pub suggestions: Vec<String>,
    /// Server-relative path of the generated PDF report.
    pub report_path: Option<String>,
    /// Set when the report was produced but the email copy could not be sent.
    pub email_warning: Option<String>,
}

impl From<AnalyzeResponse> for AnalysisResult {
    fn from(wire: AnalyzeResponse) -> Self {
        let breakdown = wire.breakdown.unwrap_or_default();
        Self {
            report_id: wire.id.and_then(|id| match id {
                Value::Null => None,
                Value::String(s) => Some(s),
                other => Some(other.to_string()),
            }),
            match_score: percentage(wire.score),
            breakdown: Breakdown {
                skills: percentage(breakdown.skills),
                experience: percentage(breakdown.experience),
                education: percentage(breakdown.education),
                extras: percentage(breakdown.extras),
            },
            suggestions: wire.suggestions.unwrap_or_default(),
            report_path: wire.pdf_path.filter(|p| !p.is_empty()),
            email_warning: wire.email_warning.filter(|w| !w.is_empty()),
        }
    }
}

impl AnalysisResult {
    pub fn advice(&self) -> Advice {
        Advice::for_score(self.match_score)
    }

    pub fn ring_color(&self) -> RingColor {
        RingColor::for_score(self.match_score)
    }

    /// Downloadable report link: the analysis base URL with `pdfPath`
    /// appended.
    pub fn report_url(&self, api_base_url: &str) -> Option<String> {
        self.report_path
            .as_deref()
            .map(|path| endpoint(api_base_url, path))
    }
}

fn percentage(value: Option<f64>) -> u8 {
    value
        .filter(|v| v.is_finite())
        .map(|v| v.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0)
}

// ────────────────────────────────────────────────────────────────────────────
// Score bands: 60 and 80 are the thresholds
// ────────────────────────────────────────────────────────────────────────────

const STRONG_FIT_MIN: u8 = 80;
const DECENT_FIT_MIN: u8 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advice {
    StrongFit,
    Decent,
    Weak,
}

impl Advice {
    pub fn for_score(score: u8) -> Self {
        if score >= STRONG_FIT_MIN {
            Advice::StrongFit
        } else if score >= DECENT_FIT_MIN {
            Advice::Decent
        } else {
            Advice::Weak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Advice::StrongFit => "Strong fit",
            Advice::Decent => "Decent, revise",
            Advice::Weak => "Weak, improve or pivot",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            Advice::StrongFit => "Apply now",
            Advice::Decent => "Tweak your CV with the suggestions, then apply",
            Advice::Weak => "Improve your CV or try a closer role",
        }
    }
}

/// Tri-band classification of a match score.
pub fn advice(score: u8) -> Advice {
    Advice::for_score(score)
}

/// Colour of the score ring, keyed off the same thresholds as [`Advice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingColor {
    Green,
    Blue,
    Red,
}

impl RingColor {
    pub fn for_score(score: u8) -> Self {
        match Advice::for_score(score) {
            Advice::StrongFit => RingColor::Green,
            Advice::Decent => RingColor::Blue,
            Advice::Weak => RingColor::Red,
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            RingColor::Green => "#22c55e",
            RingColor::Blue => "#60a5fa",
            RingColor::Red => "#f87171",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> AnalysisResult {
        serde_json::from_str::<AnalyzeResponse>(body).unwrap().into()
    }

    #[test]
    fn test_full_response_maps_to_result() {
        let result = parse(
            r#"{"id":"1712","score":85,"breakdown":{"skills":90,"experience":80,"education":70,"extras":60},
                "suggestions":["Add metrics"],"pdfPath":"/files/r1.pdf"}"#,
        );
        assert_eq!(result.report_id.as_deref(), Some("1712"));
        assert_eq!(result.match_score, 85);
        assert_eq!(
            result.breakdown,
            Breakdown {
                skills: 90,
                experience: 80,
                education: 70,
                extras: 60
            }
        );
        assert_eq!(result.suggestions, vec!["Add metrics".to_string()]);
        assert_eq!(result.report_path.as_deref(), Some("/files/r1.pdf"));
        assert_eq!(result.advice(), Advice::StrongFit);
    }

    #[test]
    fn test_missing_fields_default_to_zero_and_empty() {
        let result = parse(r#"{"score":42,"breakdown":{"skills":50}}"#);
        assert_eq!(result.breakdown.skills, 50);
        assert_eq!(result.breakdown.experience, 0);
        assert_eq!(result.breakdown.education, 0);
        assert_eq!(result.breakdown.extras, 0);
        assert!(result.suggestions.is_empty());
        assert_eq!(result.report_path, None);

        let result = parse(r#"{"score":42,"breakdown":null,"suggestions":null}"#);
        assert_eq!(result.breakdown, Breakdown::default());
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn test_numeric_strings_are_read_and_junk_is_skipped() {
        let result = parse(
            r#"{"score":"85","breakdown":{"skills":"90","education":true},
                "suggestions":[null,"Add metrics",{"x":1}],"pdfPath":42,"emailWarning":false}"#,
        );
        assert_eq!(result.match_score, 85);
        assert_eq!(result.breakdown.skills, 90);
        assert_eq!(result.breakdown.education, 0);
        assert_eq!(result.suggestions, vec!["Add metrics".to_string()]);
        assert_eq!(result.report_path, None);
        assert_eq!(result.email_warning, None);
    }

    #[test]
    fn test_scores_are_rounded_and_clamped() {
        let result = parse(r#"{"score":101.7,"breakdown":{"skills":-3,"extras":59.5}}"#);
        assert_eq!(result.match_score, 100);
        assert_eq!(result.breakdown.skills, 0);
        assert_eq!(result.breakdown.extras, 60);
    }

    #[test]
    fn test_numeric_id_and_email_warning() {
        let result = parse(r#"{"id":17,"score":10,"emailWarning":"SMTP credentials missing"}"#);
        assert_eq!(result.report_id.as_deref(), Some("17"));
        assert_eq!(
            result.email_warning.as_deref(),
            Some("SMTP credentials missing")
        );
    }

    #[test]
    fn test_report_url_concatenates_base() {
        let result = parse(r#"{"score":70,"pdfPath":"/reports/1.pdf"}"#);
        assert_eq!(
            result.report_url("http://localhost:8000").as_deref(),
            Some("http://localhost:8000/reports/1.pdf")
        );
        let result = parse(r#"{"score":70,"pdfPath":""}"#);
        assert_eq!(result.report_url("http://localhost:8000"), None);
    }

    #[test]
    fn test_advice_band_boundaries() {
        assert_eq!(advice(59), Advice::Weak);
        assert_eq!(advice(60), Advice::Decent);
        assert_eq!(advice(79), Advice::Decent);
        assert_eq!(advice(80), Advice::StrongFit);
        assert_eq!(advice(0), Advice::Weak);
        assert_eq!(advice(100), Advice::StrongFit);
        assert_ne!(advice(59), advice(60));
        assert_ne!(advice(79), advice(80));
    }

    #[test]
    fn test_ring_color_follows_bands() {
        assert_eq!(RingColor::for_score(80), RingColor::Green);
        assert_eq!(RingColor::for_score(60), RingColor::Blue);
        assert_eq!(RingColor::for_score(59), RingColor::Red);
        assert_eq!(RingColor::Blue.hex(), "#60a5fa");
    }
}
