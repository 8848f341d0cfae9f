//! Generation pipeline tests against mock generators.

use std::sync::Arc;

use mock_brain::{FailingGenerator, ScriptedGenerator};
use netscript_core::pipeline::{
    EXPLANATION_FAILED, GENERATION_ERROR_PREFIX, NO_CODE_GENERATED, NO_EXPLANATION,
};
use netscript_core::{GenerationError, ModelTier, ScriptConfig, ScriptPipeline};

#[tokio::test]
async fn test_generate_strips_fences() {
    let generator = Arc::new(ScriptedGenerator::with_responses([
        "```python\nimport socket\nprint('scan')\n```",
    ]));
    let pipeline = ScriptPipeline::new(generator.clone());

    let generation = pipeline.generate_script(&ScriptConfig::default()).await;

    assert!(generation.is_success());
    assert_eq!(generation.code, "import socket\nprint('scan')");
    assert!(!generation.code.contains("```"));

    let requests = generator.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].tier, ModelTier::Script);
    assert!(requests[0].system_instruction.is_none());
}

#[tokio::test]
async fn test_empty_answer_is_placeholder() {
    let pipeline = ScriptPipeline::new(Arc::new(ScriptedGenerator::with_responses(["   "])));

    let generation = pipeline.generate_script(&ScriptConfig::default()).await;

    assert!(generation.is_success());
    assert_eq!(generation.code, NO_CODE_GENERATED);
}

#[tokio::test]
async fn test_failure_becomes_marked_error_string() {
    let pipeline = ScriptPipeline::new(Arc::new(FailingGenerator::network("connection refused")));

    let generation = pipeline.generate_script(&ScriptConfig::default()).await;

    assert!(!generation.is_success());
    assert!(generation.code.starts_with(GENERATION_ERROR_PREFIX));
    assert!(generation.code.contains("connection refused"));
    assert_eq!(
        generation.failure.as_deref(),
        Some("network error: connection refused")
    );
}

#[tokio::test]
async fn test_run_explains_successful_script() {
    let generator = Arc::new(ScriptedGenerator::with_responses([
        "print('hi')",
        "It prints a greeting.",
    ]));
    let pipeline = ScriptPipeline::new(generator.clone());

    let outcome = pipeline.run(&ScriptConfig::default()).await;

    assert_eq!(outcome.generation.code, "print('hi')");
    assert_eq!(outcome.explanation.as_deref(), Some("It prints a greeting."));

    let requests = generator.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].tier, ModelTier::Fast);
    assert!(requests[1]
        .last_user_text()
        .unwrap_or_default()
        .contains("print('hi')"));
}

#[tokio::test]
async fn test_run_skips_explanation_after_failure() {
    let generator = Arc::new(ScriptedGenerator::new());
    generator.push_err(GenerationError::Provider {
        status: 500,
        message: "internal".to_string(),
    });
    let pipeline = ScriptPipeline::new(generator.clone());

    let outcome = pipeline.run(&ScriptConfig::default()).await;

    assert!(!outcome.generation.is_success());
    assert!(outcome.explanation.is_none());
    assert_eq!(generator.call_count(), 1);
}

#[tokio::test]
async fn test_explain_fallbacks() {
    let generator = Arc::new(ScriptedGenerator::with_responses([""]));
    generator.push_err(GenerationError::Network("down".to_string()));
    let pipeline = ScriptPipeline::new(generator);

    assert_eq!(pipeline.explain_script("x = 1").await, NO_EXPLANATION);
    assert_eq!(pipeline.explain_script("x = 1").await, EXPLANATION_FAILED);
}

#[tokio::test]
async fn test_explain_sends_bounded_prefix() {
    let generator = Arc::new(ScriptedGenerator::with_responses(["ok"]));
    let pipeline = ScriptPipeline::new(generator.clone()).with_explain_prefix_chars(10);

    let code = "a".repeat(50);
    pipeline.explain_script(&code).await;

    let sent = generator.requests()[0]
        .last_user_text()
        .unwrap_or_default()
        .to_string();
    assert!(sent.contains(&format!("{}...", "a".repeat(10))));
    assert!(!sent.contains(&"a".repeat(11)));
}
