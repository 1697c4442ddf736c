mod common;

use labquest_gateway::provider::ScriptedTransport;
use serde_json::json;

#[tokio::test]
async fn valid_json_is_returned_unchanged() {
    let transport = ScriptedTransport::new().reply(r#"{"variations":["a","b"],"uniquenessScore":90}"#);
    let result = common::gateway(&transport).generate_variations(&common::osmosis(Some(2))).await;

    assert_eq!(result.variations, vec!["a", "b"]);
    assert_eq!(result.uniqueness_score, 90);
    assert!(!result.degraded);
}

#[tokio::test]
async fn fenced_json_is_unwrapped() {
    let reply = "Here are the variations:\n```json\n{\"variations\": [\"x\", \"y\", \"z\", \"w\"], \"uniquenessScore\": 82}\n```";
    let transport = ScriptedTransport::new().reply(reply);
    let result = common::gateway(&transport).generate_variations(&common::osmosis(None)).await;

    assert_eq!(result.variations.len(), 4);
    assert_eq!(result.uniqueness_score, 82);
    assert!(!result.degraded);
}

#[tokio::test]
async fn variation_parse_failure_uses_fallback() {
    let transport = ScriptedTransport::new().reply("Sorry, I can only answer in prose.");
    let result = common::gateway(&transport).generate_variations(&common::osmosis(Some(2))).await;

    assert!(result.degraded);
    assert_eq!(result.variations.len(), 4);
    assert!(result.variations[0].starts_with("Modified version:"));
    assert!(result.variations[0].contains("which is osmosis?"));
    assert_eq!(result.uniqueness_score, 70);
}

#[tokio::test]
async fn non_object_json_uses_fallback() {
    for reply in ["null", "42", r#"["a","b"]"#, r#""sure""#] {
        let transport = ScriptedTransport::new().reply(reply).reply(reply);
        let gateway = common::gateway(&transport);

        let variations = gateway.generate_variations(&common::osmosis(Some(2))).await;
        assert!(variations.degraded, "{reply}");
        assert_eq!(variations.variations.len(), 4, "{reply}");
        assert_eq!(variations.uniqueness_score, 70);

        let evaluation = gateway.evaluate_answer(&common::osmosis_answer()).await;
        assert!(evaluation.degraded, "{reply}");
        assert!((60..100).contains(&evaluation.score));
    }
}

#[tokio::test]
async fn provider_failure_uses_fallback() {
    let transport = ScriptedTransport::new().fail("500 Internal Server Error - upstream exploded");
    let result = common::gateway(&transport).generate_variations(&common::osmosis(None)).await;

    assert!(result.degraded);
    assert_eq!(result.variations.len(), 4);
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn evaluation_scores_are_clamped() {
    let high = json!({"score": 150, "feedback": "Excellent", "strengths": ["s"], "improvements": ["i"]});
    let low = json!({"score": -30, "feedback": "Off topic", "strengths": ["s"], "improvements": ["i"]});
    let transport = ScriptedTransport::new().reply(high.to_string()).reply(low.to_string());
    let gateway = common::gateway(&transport);

    let first = gateway.evaluate_answer(&common::osmosis_answer()).await;
    let second = gateway.evaluate_answer(&common::osmosis_answer()).await;

    assert_eq!(first.score, 100);
    assert_eq!(second.score, 0);
    assert!(!first.degraded && !second.degraded);
}

#[tokio::test]
async fn evaluation_missing_fields_get_placeholders() {
    let transport = ScriptedTransport::new().reply(r#"{"score": 82}"#);
    let result = common::gateway(&transport).evaluate_answer(&common::osmosis_answer()).await;

    assert_eq!(result.score, 82);
    assert!(!result.feedback.is_empty());
    assert!(!result.strengths.is_empty());
    assert!(!result.improvements.is_empty());
    assert!(!result.degraded);
}

#[tokio::test]
async fn evaluation_parse_failure_uses_fallback() {
    for _ in 0..50 {
        let transport = ScriptedTransport::new().reply("{ not json");
        let result = common::gateway(&transport).evaluate_answer(&common::osmosis_answer()).await;

        assert!(result.degraded);
        assert!((60..100).contains(&result.score));
        assert!(!result.feedback.is_empty());
        assert!(!result.strengths.is_empty());
        assert!(!result.improvements.is_empty());
    }
}

#[tokio::test]
async fn evaluation_request_uses_grading_params() {
    let transport = ScriptedTransport::new().reply(r#"{"score": 70}"#);
    common::gateway(&transport).evaluate_answer(&common::osmosis_answer()).await;

    let sent = transport.requests();
    assert_eq!(sent[0].temperature, 0.3);
    assert_eq!(sent[0].max_tokens, 1000);
    assert!(common::user_prompt(&sent[0]).contains("Student Answer: \"Osmosis is water moving"));
}

#[tokio::test]
async fn uniqueness_short_circuits_below_two_questions() {
    let transport = ScriptedTransport::new().reply("10");
    let gateway = common::gateway(&transport);

    for questions in [vec![], vec!["What is osmosis?".to_string()]] {
        let result = gateway.check_uniqueness(&questions).await;
        assert_eq!(result.score, 100);
        assert!(!result.degraded);
    }
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn uniqueness_reply_is_parsed_and_clamped() {
    let transport = ScriptedTransport::new().reply("  68\n").reply("150").reply("-30").reply("quite unique");
    let gateway = common::gateway(&transport);
    let questions = vec!["What is osmosis?".to_string(), "Define diffusion.".to_string()];

    assert_eq!(gateway.check_uniqueness(&questions).await.score, 68);
    assert_eq!(gateway.check_uniqueness(&questions).await.score, 100);
    assert_eq!(gateway.check_uniqueness(&questions).await.score, 0);

    let fallback = gateway.check_uniqueness(&questions).await;
    assert_eq!(fallback.score, 75);
    assert!(fallback.degraded);

    let sent = transport.requests();
    assert_eq!(sent[0].max_tokens, 50);
    assert!(common::user_prompt(&sent[0]).contains("1. What is osmosis?\n2. Define diffusion."));
}

#[tokio::test]
async fn bulk_generation_runs_sequential_batches() {
    let transport = ScriptedTransport::new()
        .reply(r#"{"variations":["v1","v2","v3","v4"],"uniquenessScore":80}"#)
        .reply(r#"{"variations":["v5","v6","v7","v8"],"uniquenessScore":80}"#)
        .reply(r#"{"variations":["v9","v10"],"uniquenessScore":80}"#);
    let result = common::gateway(&transport).generate_bulk(&common::osmosis(None), 10).await;

    assert_eq!(result.variations.len(), 10);
    assert_eq!(result.variations[9], "v10");
    assert_eq!(result.shortfall, 0);
    assert!(!result.degraded);

    let requested: Vec<u32> = result.batches.iter().map(|b| b.requested).collect();
    assert_eq!(requested, vec![4, 4, 2]);

    let sent = transport.requests();
    assert_eq!(sent.len(), 3);
    assert!(common::user_prompt(&sent[0]).contains("Generate 4 unique"));
    assert!(common::user_prompt(&sent[1]).contains("Generate 4 unique"));
    assert!(common::user_prompt(&sent[2]).contains("Generate 2 unique"));
}

#[tokio::test]
async fn bulk_failed_batch_falls_back_and_keeps_earlier_batches() {
    let transport = ScriptedTransport::new()
        .reply(r#"{"variations":["v1","v2","v3","v4"],"uniquenessScore":80}"#)
        .reply(r#"{"variations":["v5","v6","v7","v8"],"uniquenessScore":80}"#)
        .fail("502 Bad Gateway - try later");
    let result = common::gateway(&transport).generate_bulk(&common::osmosis(None), 10).await;

    assert_eq!(result.variations.len(), 10);
    assert_eq!(&result.variations[..8], &["v1", "v2", "v3", "v4", "v5", "v6", "v7", "v8"]);
    assert!(result.variations[8].starts_with("Modified version:"));
    assert!(result.degraded);
    assert!(result.batches[2].degraded);
    assert_eq!(result.batches[2].received, 4);
    assert_eq!(result.shortfall, 0);
}

#[tokio::test]
async fn bulk_short_final_batch_reports_shortfall() {
    let transport = ScriptedTransport::new()
        .reply(r#"{"variations":["v1","v2","v3","v4"],"uniquenessScore":80}"#)
        .reply(r#"{"variations":["v5","v6","v7","v8"],"uniquenessScore":80}"#)
        .reply(r#"{"variations":["v9"],"uniquenessScore":80}"#);
    let result = common::gateway(&transport).generate_bulk(&common::osmosis(None), 10).await;

    assert_eq!(result.variations.len(), 9);
    assert_eq!(result.shortfall, 1);
    assert!(!result.degraded);
    assert_eq!(transport.call_count(), 3);
}

#[tokio::test]
async fn bulk_below_batch_cap_is_one_call() {
    let transport = ScriptedTransport::new().reply(r#"{"variations":["a","b","c"],"uniquenessScore":88}"#);
    let result = common::gateway(&transport).generate_bulk(&common::osmosis(None), 3).await;

    assert_eq!(result.variations, vec!["a", "b", "c"]);
    assert_eq!(result.batches.len(), 1);
    assert_eq!(result.batches[0].requested, 3);
}

#[tokio::test]
async fn bulk_total_above_cap_stops_at_cap() {
    let transport = ScriptedTransport::new();
    let result = common::gateway(&transport).generate_bulk(&common::osmosis(None), 1_000_000).await;

    // 100 in batches of 4, each batch falling back to 4 variations.
    assert_eq!(transport.call_count(), 25);
    assert_eq!(result.variations.len(), 100);
    assert_eq!(result.shortfall, 1_000_000 - 100);
    assert!(result.degraded);
}

#[tokio::test]
async fn bulk_respects_configured_batch_size() {
    let transport = ScriptedTransport::new()
        .reply(r#"{"variations":["a","b"]}"#)
        .reply(r#"{"variations":["c","d"]}"#)
        .reply(r#"{"variations":["e"]}"#);
    let gateway = common::gateway(&transport).with_batch_size(2);
    let result = gateway.generate_bulk(&common::osmosis(None), 5).await;

    assert_eq!(result.variations, vec!["a", "b", "c", "d", "e"]);
    let requested: Vec<u32> = result.batches.iter().map(|b| b.requested).collect();
    assert_eq!(requested, vec![2, 2, 1]);
}
