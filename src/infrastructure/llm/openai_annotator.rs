use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::ports::{Annotator, AnnotatorError, RuleCandidate, TermCandidate};
use crate::domain::{RuleCategory, SectionClass};

use super::token_bucket::TokenBucket;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

const CLASSIFY_SYSTEM: &str =
    "You classify document sections into terminology, normative_content, or other.";
const RULES_SYSTEM: &str =
    "You are an assistant who extracts requirements from technical specifications.";
const TERMS_SYSTEM: &str = "You are a terminology extraction assistant.";

/// Annotation adapter for the OpenAI chat completions API. Every call is
/// made with temperature zero and a JSON-object response format, validated
/// against the expected payload shape; anything that does not deserialize
/// is an `InvalidResponse`. Calls go through the owned token bucket, so the
/// adapter paces itself against the provider's rate limits.
pub struct OpenAiAnnotator {
    client: Client,
    api_key: String,
    model: String,
    timeout: Duration,
    throttle: TokenBucket,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct SectionTypePayload {
    section_type: String,
}

#[derive(Deserialize)]
struct RulesPayload {
    requirements: Vec<RuleItem>,
}

#[derive(Deserialize)]
struct RuleItem {
    text: String,
    classification: String,
}

#[derive(Deserialize)]
struct ConceptsPayload {
    concepts: Vec<ConceptItem>,
}

#[derive(Deserialize)]
struct ConceptItem {
    term: String,
    definition: String,
    #[serde(default)]
    abbreviations: Vec<String>,
}

impl OpenAiAnnotator {
    pub fn new(api_key: String, model: String, timeout: Duration, throttle: TokenBucket) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            timeout,
            throttle,
        }
    }

    async fn request_payload<T: DeserializeOwned>(
        &self,
        system: &str,
        user: &str,
    ) -> Result<T, AnnotatorError> {
        self.throttle.acquire().await;

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.0,
            response_format: ResponseFormat {
                format: "json_object",
            },
        };

        let response = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .timeout(self.timeout)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AnnotatorError::Timeout
                } else {
                    AnnotatorError::ApiRequestFailed(e.to_string())
                }
            })?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AnnotatorError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnnotatorError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| AnnotatorError::InvalidResponse(e.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AnnotatorError::InvalidResponse("empty choices".to_string()))?;

        serde_json::from_str(&content).map_err(|e| AnnotatorError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl Annotator for OpenAiAnnotator {
    async fn classify_section(
        &self,
        text: &str,
        title: &str,
    ) -> Result<SectionClass, AnnotatorError> {
        let title = if title.is_empty() { "Unknown" } else { title };
        let prompt = format!(
            r#"Classify the following section into one of exactly three categories:
- "terminology": Sections that provide clear and precise definitions of key terms, acronyms, and abbreviations used throughout the document.
- "normative_content": Sections or elements that establish standards, guidelines, rules, or requirements that need to be followed.
- "other": Any other type of section, including front matter (title page, authors, publisher, publication date, ISBN, copyright, preface, foreword, table of contents) and back matter (bibliography, index, appendices, acknowledgements, annexes, non-normative notes).

Classification rules:
- If the section defines terms, words, or concepts, classify as terminology.
- If the section states rules, requirements, obligations, prohibitions, or recommendations, classify as normative_content.
- Everything else is other.

Respond with a valid JSON object: {{ "section_type": "<category>" }}.
Section:
"""Title: {}

{}""""#,
            title, text
        );

        let payload: SectionTypePayload = self.request_payload(CLASSIFY_SYSTEM, &prompt).await?;

        SectionClass::from_str(&payload.section_type).map_err(AnnotatorError::InvalidResponse)
    }

    async fn extract_rules(&self, text: &str) -> Result<Vec<RuleCandidate>, AnnotatorError> {
        let prompt = format!(
            r#"Extract all blocks of text from the following content that express a rule.
A "block" can be a sentence, a group of sentences, or a paragraph, as long as it expresses a complete rule.

Words that signify a rule include terms such as "MUST", "MUST NOT", "REQUIRED", "SHALL", "SHALL NOT",
"SHOULD", "SHOULD NOT", "RECOMMENDED", "MAY", and "OPTIONAL".

Do not translate, rewrite, or interpret the text, just extract it as-is.

Then, for each extracted rule, classify it into exactly one of these categories:
1. "requirement": mandatory rules or obligations (e.g., "MUST", "REQUIRED", "SHALL").
2. "recommendation": advice, suggestions, or non-mandatory good practices (e.g., "SHOULD", "RECOMMENDED").
3. "permission": things allowed but not required (e.g., "MAY", "OPTIONAL", "PERMITTED").
4. "possibility": statements about what could happen, ability, or potential (e.g., "CAN", "MIGHT").

Text:
"""
{}
"""

Respond with a valid JSON object: {{ "requirements": [ {{ "text": "<exact block of text as-is>", "classification": "<category>" }} ] }}.
If there are no rules, return an empty "requirements" array."#,
            text
        );

        let payload: RulesPayload = self.request_payload(RULES_SYSTEM, &prompt).await?;

        payload
            .requirements
            .into_iter()
            .map(|item| {
                let category = RuleCategory::from_str(&item.classification)
                    .map_err(AnnotatorError::InvalidResponse)?;
                Ok(RuleCandidate {
                    text: item.text,
                    category,
                })
            })
            .collect()
    }

    async fn extract_terms(&self, text: &str) -> Result<Vec<TermCandidate>, AnnotatorError> {
        let prompt = format!(
            r#"Extract all term-definition pairs, including any acronyms or abbreviations, from a document section.

Respond with a valid JSON object: {{ "concepts": [ {{ "term": "<full term or concept name>", "definition": "<definition or explanation of the term>", "abbreviations": ["<any abbreviations, acronyms, or other variant names by which the concept might be known>"] }} ] }}.

Do NOT modify or interpret the text, and do NOT translate it.
Text:
"""
{}
""""#,
            text
        );

        let payload: ConceptsPayload = self.request_payload(TERMS_SYSTEM, &prompt).await?;

        Ok(payload
            .concepts
            .into_iter()
            .map(|item| TermCandidate {
                term: item.term,
                definition: item.definition,
                abbreviations: item.abbreviations,
            })
            .collect())
    }
}
