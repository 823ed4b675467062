//! Terminal result summaries.

use std::fmt;

use serde::Serialize;

use crate::types::{ResultEvent, ResultSubtype};

/// Summary of a terminal `result` event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultReport {
    pub subtype: ResultSubtype,
    pub duration_ms: Option<u64>,
    pub total_cost_usd: Option<f64>,
    pub num_turns: Option<u32>,
    /// Extra payload attached to a failed result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<serde_json::Value>,
}

impl ResultReport {
    pub fn is_success(&self) -> bool {
        self.subtype.is_success()
    }
}

/// Build a report from a result event. Pure: equal inputs give equal reports.
pub fn summarize(event: &ResultEvent) -> ResultReport {
    let diagnostics = match &event.subtype {
        ResultSubtype::Success => None,
        ResultSubtype::Failure(_) if event.extra.is_empty() => None,
        ResultSubtype::Failure(_) => Some(serde_json::Value::Object(event.extra.clone())),
    };
    ResultReport {
        subtype: event.subtype.clone(),
        duration_ms: event.duration_ms,
        total_cost_usd: event.total_cost_usd,
        num_turns: event.num_turns,
        diagnostics,
    }
}

impl fmt::Display for ResultReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_success() {
            writeln!(f, "Briefing complete")?;
            if let Some(ms) = self.duration_ms {
                writeln!(f, "Duration: {ms} ms")?;
            }
            if let Some(cost) = self.total_cost_usd {
                writeln!(f, "Cost: ${cost:.6}")?;
            }
            if let Some(turns) = self.num_turns {
                write!(f, "Turns: {turns}")?;
            }
            return Ok(());
        }
        write!(f, "Session failed: {}", self.subtype.as_str())?;
        if let Some(diagnostics) = &self.diagnostics {
            let pretty =
                serde_json::to_string_pretty(diagnostics).unwrap_or_else(|_| diagnostics.to_string());
            write!(f, "\n{pretty}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn success_report_carries_metrics() {
        let report = summarize(&ResultEvent::success(1200, 0.002, 1));
        assert!(report.is_success());
        assert_eq!(report.duration_ms, Some(1200));
        assert_eq!(report.total_cost_usd, Some(0.002));
        assert_eq!(report.num_turns, Some(1));
        assert_eq!(
            report.to_string(),
            "Briefing complete\nDuration: 1200 ms\nCost: $0.002000\nTurns: 1"
        );
    }

    #[test]
    fn summarizing_twice_gives_identical_reports() {
        let event = ResultEvent::success(900, 0.1, 3);
        assert_eq!(summarize(&event), summarize(&event));
    }

    #[test]
    fn failure_report_includes_diagnostics() {
        let mut event = ResultEvent::failure("error_during_execution");
        event
            .extra
            .insert("errors".into(), serde_json::json!(["upstream 529"]));

        let report = summarize(&event);
        assert!(!report.is_success());
        let rendered = report.to_string();
        assert!(rendered.starts_with("Session failed: error_during_execution"));
        assert!(rendered.contains("upstream 529"));
    }
}
