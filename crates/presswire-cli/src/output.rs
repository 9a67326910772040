//! Human-readable rendering of results.

use presswire_domain::{PipelineResult, RoutingStats};

/// Describe one finished item.
pub fn render_result(result: &PipelineResult) -> String {
    let mut lines = vec![format!("Item: {}", result.input_id)];

    if let Some(classification) = &result.classification {
        lines.push(format!(
            "Content type: {} (confidence {:.2})",
            classification.content_type, classification.confidence
        ));
    }
    if let Some(metadata) = &result.metadata {
        if !metadata.teams.is_empty() {
            lines.push(format!("Teams: {}", metadata.teams.join(", ")));
        }
    }
    if let Some(headlines) = &result.headlines {
        lines.push("Headlines:".to_string());
        lines.push(format!("  neutral:       {}", headlines.neutral));
        lines.push(format!("  fan_oriented:  {}", headlines.fan_oriented));
        lines.push(format!("  casual_viewer: {}", headlines.casual_viewer));
    }

    if result.is_success() {
        if let Some(destination) = &result.destination {
            lines.push(format!("Saved to: {}", destination));
        }
        lines.push("✓ Completed".to_string());
    } else {
        let kind = result.error_kind.map_or("UnknownError", |k| k.as_str());
        let stage = result.failed_stage.map_or("?", |s| s.label());
        lines.push(format!("✗ Failed at {} ({})", stage, kind));
        if let Some(error) = &result.error {
            lines.push(format!("Error: {}", error));
        }
    }

    lines.join("\n")
}

/// One line per content type, zero counts included.
pub fn render_stats(stats: &RoutingStats) -> String {
    let mut lines = vec!["Routing statistics:".to_string()];
    for (content_type, count) in stats.iter() {
        lines.push(format!("  {:<16} {}", content_type.as_str(), count));
    }
    lines.push(format!("  {:<16} {}", "total", stats.total()));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use presswire_domain::{
        Classification, ContentType, ErrorKind, HeadlineSet, PipelineState, PipelineStatus, Stage,
    };

    fn failed() -> PipelineResult {
        PipelineResult {
            input_id: "article_003".to_string(),
            status: PipelineStatus::Failed,
            state: PipelineState::Failed,
            classification: Some(Classification {
                content_type: ContentType::TransferNews,
                confidence: 0.8,
                reasoning: String::new(),
            }),
            metadata: None,
            headlines: None,
            destination: None,
            error: Some("EXTRACT failed: Empty response received for Metadata extraction".to_string()),
            error_kind: Some(ErrorKind::Parse),
            failed_stage: Some(Stage::Extract),
        }
    }

    #[test]
    fn test_render_failed_result() {
        let text = render_result(&failed());
        assert!(text.contains("Item: article_003"));
        assert!(text.contains("Content type: transfer_news (confidence 0.80)"));
        assert!(text.contains("Failed at EXTRACT (ParseError)"));
        assert!(text.contains("Error: EXTRACT failed"));
        assert!(!text.contains("Headlines"));
    }

    #[test]
    fn test_render_successful_result() {
        let mut result = failed();
        result.status = PipelineStatus::Success;
        result.state = PipelineState::Complete;
        result.error = None;
        result.error_kind = None;
        result.failed_stage = None;
        result.headlines = Some(HeadlineSet {
            neutral: "A".to_string(),
            fan_oriented: "B".to_string(),
            casual_viewer: "C".to_string(),
        });
        result.destination = Some("outputs/transfer_news/article_003.json".to_string());

        let text = render_result(&result);
        assert!(text.contains("fan_oriented:  B"));
        assert!(text.contains("Saved to: outputs/transfer_news/article_003.json"));
        assert!(text.contains("Completed"));
    }

    #[test]
    fn test_render_stats_lists_every_type() {
        let stats = RoutingStats::from_counts([(ContentType::MatchReport, 2), (ContentType::Other, 1)]);
        let text = render_stats(&stats);
        for content_type in ContentType::ALL {
            assert!(text.contains(content_type.as_str()));
        }
        assert!(text.contains("total"));
        assert!(text.lines().last().unwrap().ends_with('3'));
    }
}
