//! Operational recommendations generated from airport statistics

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::models::{AirportStatistics, PeakHourBucket};

/// Coarse risk rating attached to a recommendation set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Structured recommendations returned to the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub summary: String,
    pub recommendations: Vec<String>,
    pub risk_level: RiskLevel,
}

impl Recommendations {
    /// Returned whenever generator output cannot be parsed
    pub fn fallback() -> Self {
        Self {
            summary: "Schedule analysis is temporarily unavailable.".to_string(),
            recommendations: vec![
                "Monitor peak-hour departures for congestion.".to_string(),
                "Review flights with delays over 60 minutes.".to_string(),
            ],
            risk_level: RiskLevel::Medium,
        }
    }
}

/// Producer of raw recommendation text, typically JSON
#[async_trait]
pub trait RecommendationGenerator: Send + Sync {
    async fn generate(&self, stats: &AirportStatistics, peak_hours: &[PeakHourBucket])
        -> Result<String>;

    fn name(&self) -> &'static str;
}

/// Parse generator output, falling back to [`Recommendations::fallback`]
/// on anything that is not the expected JSON object.
///
/// Output wrapped in a fenced code block is unwrapped first.
pub fn parse_recommendations(raw: &str) -> Recommendations {
    let body = strip_code_fence(raw);
    match serde_json::from_str::<Recommendations>(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "Unparseable recommendation output, using fallback");
            Recommendations::fallback()
        }
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// In-process generator driven by fixed thresholds on the statistics
#[derive(Debug, Clone, Default)]
pub struct RuleBasedGenerator;

impl RuleBasedGenerator {
    pub fn new() -> Self {
        Self
    }

    fn build(&self, stats: &AirportStatistics, peak_hours: &[PeakHourBucket]) -> Recommendations {
        let dist = &stats.delay_distribution;
        let mut recommendations = Vec::new();

        if let Some(hour) = stats.peak_hour {
            recommendations.push(format!(
                "Spread departures away from {:02}:00, which carries {} of {} flights.",
                hour, stats.peak_flights, stats.total_flights
            ));
        }
        let saturated = peak_hours.iter().filter(|b| b.utilization >= 90).count();
        if saturated > 1 {
            recommendations.push(format!(
                "{} hours run at 90% or more of peak load; add gate staff for those windows.",
                saturated
            ));
        }
        if dist.critical > 0 {
            recommendations.push(format!(
                "Prioritise recovery for {} flights delayed 60 minutes or more.",
                dist.critical
            ));
        }
        if stats.avg_delay >= 15.0 {
            recommendations.push(
                "Average delay exceeds 15 minutes; review turnaround buffers.".to_string(),
            );
        }
        if recommendations.is_empty() {
            recommendations.push("Operations are within normal limits.".to_string());
        }

        let risk_level = if dist.critical > 0 || stats.avg_delay >= 30.0 {
            RiskLevel::High
        } else if dist.major > 0 || stats.avg_delay >= 15.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        Recommendations {
            summary: format!(
                "{}: {} flights, {} delayed, average delay {:.2} minutes.",
                stats.airport_code, stats.total_flights, stats.delayed_flights, stats.avg_delay
            ),
            recommendations,
            risk_level,
        }
    }
}

#[async_trait]
impl RecommendationGenerator for RuleBasedGenerator {
    async fn generate(
        &self,
        stats: &AirportStatistics,
        peak_hours: &[PeakHourBucket],
    ) -> Result<String> {
        Ok(serde_json::to_string(&self.build(stats, peak_hours))?)
    }

    fn name(&self) -> &'static str {
        "rule-based"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DelayDistribution;

    fn stats(avg_delay: f64, dist: DelayDistribution) -> AirportStatistics {
        AirportStatistics {
            airport_code: "JFK".to_string(),
            total_flights: dist.total(),
            delayed_flights: dist.major + dist.critical,
            avg_delay,
            peak_hour: Some(6),
            peak_flights: dist.total(),
            delay_distribution: dist,
            capacity_utilization: 4.17,
        }
    }

    #[test]
    fn test_parse_valid_json() {
        let raw = r#"{"summary":"ok","recommendations":["a","b"],"riskLevel":"low"}"#;
        let parsed = parse_recommendations(raw);
        assert_eq!(parsed.summary, "ok");
        assert_eq!(parsed.recommendations, vec!["a", "b"]);
        assert_eq!(parsed.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = "```json\n{\"summary\":\"s\",\"recommendations\":[],\"riskLevel\":\"high\"}\n```";
        assert_eq!(parse_recommendations(raw).risk_level, RiskLevel::High);
    }

    #[test]
    fn test_parse_garbage_falls_back() {
        assert_eq!(parse_recommendations("I think you should..."), Recommendations::fallback());
        assert_eq!(parse_recommendations(r#"{"summary": 3}"#), Recommendations::fallback());
    }

    #[tokio::test]
    async fn test_rule_based_round_trips_through_parser() {
        let generator = RuleBasedGenerator::new();
        let stats = stats(17.8, DelayDistribution { minor: 2, major: 3, critical: 0 });
        let peaks = vec![PeakHourBucket { hour: 6, flight_count: 5, utilization: 100 }];

        let raw = generator.generate(&stats, &peaks).await.unwrap();
        let parsed = parse_recommendations(&raw);

        assert_eq!(parsed.risk_level, RiskLevel::Medium);
        assert!(parsed.summary.starts_with("JFK: 5 flights"));
        assert!(parsed.recommendations[0].contains("06:00"));
    }

    #[test]
    fn test_rule_based_risk_levels() {
        let generator = RuleBasedGenerator::new();
        let high = generator.build(&stats(5.0, DelayDistribution { minor: 4, major: 0, critical: 1 }), &[]);
        assert_eq!(high.risk_level, RiskLevel::High);

        let low = generator.build(&stats(2.0, DelayDistribution { minor: 5, major: 0, critical: 0 }), &[]);
        assert_eq!(low.risk_level, RiskLevel::Low);
    }
}
