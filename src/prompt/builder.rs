//! Message sequences for each request kind.
//!
//! Output is a pure function of the request: no I/O, no hidden state, and no
//! failure mode. Sampling parameters travel with the messages so the
//! transport never has to know which kind of request it is sending.
use serde::Serialize;

use crate::models::{EvaluationRequest, VariationRequest};
use crate::prompt::template::render;
use crate::provider::types::{ChatMessage, GenerationParams};

/// Creative: variations should differ from each other.
pub const VARIATION_PARAMS: GenerationParams = GenerationParams { temperature: 0.8, max_tokens: 1500 };
/// Near-deterministic grading.
pub const EVALUATION_PARAMS: GenerationParams = GenerationParams { temperature: 0.3, max_tokens: 1000 };
/// A single integer is expected back.
pub const UNIQUENESS_PARAMS: GenerationParams = GenerationParams { temperature: 0.1, max_tokens: 50 };

const VARIATION_SYSTEM: &str = "You are an expert educational content creator specializing in \
generating equivalent but unique academic questions. Always respond with valid JSON only, \
no markdown formatting or code blocks.";

const VARIATION_USER: &str = r#"You are an expert educator creating equivalent but unique variations of lab questions.

Original Question: "{{original_question}}"
Subject: {{subject}}
Difficulty: {{difficulty}}
Category: {{category}}
Tags: {{tags}}

Generate {{count}} unique but equivalent variations of this question. Each variation should:
1. Test the same core concepts and learning objectives
2. Have similar difficulty level
3. Be clearly distinct from the original and other variations
4. Maintain academic rigor and clarity
5. Be appropriate for {{subject}} students

IMPORTANT: Respond with ONLY valid JSON, no markdown formatting or code blocks. Use this exact structure:
{
  "variations": [
{{example_variations}}
  ],
  "uniquenessScore": 85
}

The uniquenessScore should be a number from 0-100 indicating how unique and well-differentiated the variations are."#;

const EVALUATION_SYSTEM: &str = "You are an expert educator providing fair, constructive, and \
bias-free evaluation of student work. Always respond with valid JSON only, no markdown \
formatting or code blocks.";

const EVALUATION_USER: &str = r#"You are an expert educator evaluating a student's answer to a lab question.

Question: "{{question}}"
Subject: {{subject}}
Student Answer: "{{student_answer}}"

Evaluate this answer and provide:
1. A numerical score from 0-100
2. Constructive feedback
3. Strengths demonstrated in the answer
4. Areas for improvement

Be fair, constructive, and bias-free in your evaluation. Consider:
- Accuracy of scientific concepts
- Completeness of the response
- Clarity of explanation
- Use of appropriate terminology
- Logical reasoning

IMPORTANT: Respond with ONLY valid JSON, no markdown formatting or code blocks. Use this exact structure:
{
  "score": 85,
  "feedback": "Detailed feedback here...",
  "strengths": ["Strength 1", "Strength 2"],
  "improvements": ["Improvement 1", "Improvement 2"]
}"#;

const UNIQUENESS_SYSTEM: &str = "You are an expert at analyzing question uniqueness and \
similarity. Respond with only a number between 0-100.";

const UNIQUENESS_USER: &str = r#"Analyze these questions for uniqueness and similarity:

{{numbered_questions}}

Rate the overall uniqueness of these questions on a scale of 0-100, where:
- 100 = Completely unique questions testing different concepts
- 75-99 = Mostly unique with some overlap
- 50-74 = Moderately unique with significant overlap
- 25-49 = Similar questions with minor variations
- 0-24 = Nearly identical questions

Respond with just the numerical score (0-100)."#;

/// Messages plus the sampling parameters they should be sent with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatPrompt {
    pub messages: Vec<ChatMessage>,
    pub params: GenerationParams,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        PromptBuilder
    }

    pub fn variations(&self, request: &VariationRequest) -> ChatPrompt {
        let count = request.variation_count();
        let count_str = count.to_string();
        let tags = request.tags.join(", ");
        let examples = (1..=count)
            .map(|i| format!("    \"Variation {} text here\"", i))
            .collect::<Vec<_>>()
            .join(",\n");

        let user = render(
            VARIATION_USER,
            &[
                ("original_question", request.original_question.as_str()),
                ("subject", request.subject.as_str()),
                ("difficulty", request.difficulty.as_str()),
                ("category", request.category.as_str()),
                ("tags", tags.as_str()),
                ("count", count_str.as_str()),
                ("example_variations", examples.as_str()),
            ],
        );

        ChatPrompt {
            messages: vec![ChatMessage::system(VARIATION_SYSTEM), ChatMessage::user(user)],
            params: VARIATION_PARAMS,
        }
    }

    pub fn evaluation(&self, request: &EvaluationRequest) -> ChatPrompt {
        let user = render(
            EVALUATION_USER,
            &[
                ("question", request.question.as_str()),
                ("subject", request.subject.as_str()),
                ("student_answer", request.student_answer.as_str()),
            ],
        );

        ChatPrompt {
            messages: vec![ChatMessage::system(EVALUATION_SYSTEM), ChatMessage::user(user)],
            params: EVALUATION_PARAMS,
        }
    }

    /// Callers short-circuit fewer than two questions before getting here.
    pub fn uniqueness(&self, questions: &[String]) -> ChatPrompt {
        let numbered = questions
            .iter()
            .enumerate()
            .map(|(i, q)| format!("{}. {}", i + 1, q))
            .collect::<Vec<_>>()
            .join("\n");

        let user = render(UNIQUENESS_USER, &[("numbered_questions", numbered.as_str())]);

        ChatPrompt {
            messages: vec![ChatMessage::system(UNIQUENESS_SYSTEM), ChatMessage::user(user)],
            params: UNIQUENESS_PARAMS,
        }
    }
}
