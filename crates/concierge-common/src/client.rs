//! HTTP client for the hosted translate-page function.

use serde::{Deserialize, Serialize};

use crate::config::TranslationConfig;
use crate::error::TranslateError;
use crate::lang::Language;
use crate::translate::{TranslatedPage, Translator};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateRequest<'a> {
    title: &'a str,
    content: &'a str,
    target_language: &'a str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// `Translator` backed by the hosted backend's translate function.
pub struct HttpTranslator {
    pub client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpTranslator {
    pub fn new(config: &TranslationConfig) -> Result<Self, TranslateError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| TranslateError::Request(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Translator for HttpTranslator {
    async fn translate_page(
        &self,
        language: &Language,
        page: &TranslatedPage,
    ) -> Result<TranslatedPage, TranslateError> {
        let body = TranslateRequest {
            title: &page.title,
            content: &page.content,
            target_language: language.as_str(),
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TranslateError::Request(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| TranslateError::Request(e.to_string()))?;

        parse_response(status, &text)
    }
}

fn parse_response(status: u16, body: &str) -> Result<TranslatedPage, TranslateError> {
    if !(200..300).contains(&status) {
        return Err(TranslateError::Status {
            status,
            body: body.chars().take(200).collect(),
        });
    }

    let parsed: TranslateResponse = serde_json::from_str(body)?;
    if let Some(error) = parsed.error {
        return Err(TranslateError::Backend(error));
    }

    match (parsed.title, parsed.content) {
        (Some(title), Some(content)) => Ok(TranslatedPage { title, content }),
        _ => Err(TranslateError::Decode(
            "response is missing title or content".into(),
        )),
    }
}
