//! Rule translation over a chat model

use std::collections::BTreeSet;

use serde::Deserialize;
use tracing::trace;

use crate::client::{ChatClient, ChatMessage};
use crate::{Error, Result};

/// Prefix added to generated code that does not set up `tmp` itself
const PRELUDE: &str = "let tmp = {};\nlet msg = inputMessage;\n";

/// Everything the model is told about one rule
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleRequest {
    pub input_field: String,
    pub output_field: String,
    pub input_description: String,
    pub raw_logic: String,
}

/// Translates extended rules into target-runtime code
#[allow(async_fn_in_trait)]
pub trait RuleTranslator {
    /// Translate one rule; an empty string means the model produced nothing.
    ///
    /// # Errors
    ///
    /// [`Error::Api`] when the model could not be reached,
    /// [`Error::Response`] when its answer could not be decoded.
    async fn translate(&self, request: &RuleRequest) -> Result<String>;

    /// Variable declarations (`let`/`const` lines) used by a sample of rules.
    ///
    /// # Errors
    ///
    /// [`Error::Api`] when the model could not be reached.
    async fn declare_variables(&self, rules: &[String]) -> Result<String>;
}

/// [`RuleTranslator`] prompting a chat model for a `{"js": ...}` answer
#[derive(Debug, Clone)]
pub struct ChatTranslator<C> {
    client: C,
    knowledge_base: String,
    temperature: f32,
}

impl<C: ChatClient> ChatTranslator<C> {
    pub fn new(client: C, knowledge_base: impl Into<String>) -> Self {
        Self {
            client,
            knowledge_base: knowledge_base.into(),
            temperature: 0.1,
        }
    }

    /// Set the sampling temperature for rule translation
    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn system_prompt(&self) -> String {
        format!(
            r#"You are a JavaScript expert working on a data transformation engine.
You convert raw transformation rules into JavaScript logic.

Guidelines:
- Always output valid, executable JavaScript.
- Response format:
{{
  "js": "<JavaScript transformation logic>"
}}
- Do not wrap the response in markdown.
- Do not explain anything. No comments or helper text.
- Use 'tmp' as the output object and 'msg' as the input.
- If the logic cannot be interpreted, return the original rule as-is.

Knowledge Base:
{}
"#,
            self.knowledge_base
        )
    }
}

fn user_prompt(request: &RuleRequest) -> String {
    format!(
        r#"Transform the following business logic into JavaScript for the data integration engine.

Context:
- Input Field: {}
- Output Field: {}
- Input Description: {}
- Raw Logic: {}

Return the JavaScript code in this format:
{{
  "js": "<logic here>"
}}

Do not wrap in markdown. Do not include any explanation. Just return valid JSON.
"#,
        request.input_field, request.output_field, request.input_description, request.raw_logic
    )
}

fn declarations_prompt(rules: &[String]) -> String {
    format!(
        r"From the following transformation rules, extract all variable declarations and initializations.

Instructions:
- Use 'let' or 'const' with appropriate default values.
- No duplicate declarations.
- No transformation logic, no functions, no conditions.
- Output only variable declarations.

Rules:
{}
",
        rules.join("\n\n")
    )
}

impl<C: ChatClient> RuleTranslator for ChatTranslator<C> {
    async fn translate(&self, request: &RuleRequest) -> Result<String> {
        let messages = [
            ChatMessage::system(self.system_prompt()),
            ChatMessage::user(user_prompt(request)),
        ];
        let content = self.client.complete(&messages, self.temperature).await?;
        trace!(%content, "Model answer");
        decode_response(&content)
    }

    async fn declare_variables(&self, rules: &[String]) -> Result<String> {
        let messages = [
            ChatMessage::system("You extract JavaScript variable declarations from transformation rules."),
            ChatMessage::user(declarations_prompt(rules)),
        ];
        let content = self.client.complete(&messages, 0.0).await?;
        Ok(extract_declarations(&content))
    }
}

#[derive(Deserialize)]
struct JsAnswer {
    #[serde(default)]
    js: String,
}

/// Decode a model answer of the form `{"js": "..."}`.
///
/// Surrounding backtick fences and a `json` language tag are removed first.
/// Non-empty code that never mentions `tmp` gets the `tmp`/`msg` prelude.
///
/// # Errors
///
/// Returns [`Error::Response`] carrying the raw answer when it is not such an
/// object.
pub fn decode_response(content: &str) -> Result<String> {
    let mut body = content.trim();
    if body.starts_with("```") {
        body = body.trim_matches('`').trim();
        if let Some(rest) = body.strip_prefix("json") {
            body = rest.trim();
        }
    }

    let answer: JsAnswer = serde_json::from_str(body).map_err(|e| Error::Response {
        message: e.to_string(),
        raw: content.to_string(),
    })?;

    let js = answer.js.trim();
    if js.is_empty() || js.contains("tmp") {
        Ok(js.to_string())
    } else {
        Ok(format!("{PRELUDE}{js}"))
    }
}

/// Keep the `let `/`const ` lines of a model answer, de-duplicated and sorted
#[must_use]
pub fn extract_declarations(content: &str) -> String {
    content
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("let ") || line.starts_with("const "))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>()
        .join("\n")
}
