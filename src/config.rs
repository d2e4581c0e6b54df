// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{AnalysisError, Result};
use crate::llm::PromptStyle;
use crate::models::{DEFAULT_PLACEHOLDER, DEFAULT_SECTION_COUNT, DocumentKind};
use crate::segmenter::SegmentStrategy;
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_PREFIX: &str = "SUPPORT_ANALYST";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub document: DocumentConfig,
    pub llm: LlmConfig,
    pub segmentation: SegmentationConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DocumentConfig {
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<DocumentKind>,
    pub fields: FieldNames,
    /// Header names a word-document table must carry to be read.
    pub required_headers: Vec<String>,
}

/// Column names of the guide used by lookup and prompting.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FieldNames {
    pub key: String,
    pub display_name: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub prompt_style: PromptStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub secrets_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SegmentationConfig {
    pub strategy: SegmentStrategy,
    pub section_count: usize,
    pub placeholder: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            key: "Support Item Ref No.".to_string(),
            display_name: "Support Item".to_string(),
            description: "Description".to_string(),
        }
    }
}

impl FieldNames {
    pub fn as_vec(&self) -> Vec<String> {
        vec![
            self.key.clone(),
            self.display_name.clone(),
            self.description.clone(),
        ]
    }
}

impl Config {
    /// Layers built-in defaults, the TOML file and `SUPPORT_ANALYST__*`
    /// environment variables, in that order.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| AnalysisError::Config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new("config/default.toml")).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| AnalysisError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| AnalysisError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        let fields = FieldNames::default();
        Self {
            document: DocumentConfig {
                path: PathBuf::from("data/support_items.docx"),
                kind: None,
                required_headers: fields.as_vec(),
                fields,
            },
            llm: LlmConfig {
                model: "gpt-4o-mini".to_string(),
                base_url: "https://api.openai.com/v1".to_string(),
                timeout_secs: 120,
                prompt_style: PromptStyle::MarketAnalyst,
                api_key: None,
                project_id: None,
                secrets_path: PathBuf::from(".streamlit/secrets.toml"),
            },
            segmentation: SegmentationConfig {
                strategy: SegmentStrategy::Delimiter,
                section_count: DEFAULT_SECTION_COUNT,
                placeholder: DEFAULT_PLACEHOLDER.to_string(),
            },
        }
    }

    fn validate(&self) -> Result<()> {
        if self.segmentation.section_count == 0 {
            return Err(AnalysisError::Config(
                "section_count must be greater than 0".to_string(),
            ));
        }

        if self.llm.timeout_secs == 0 {
            return Err(AnalysisError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Validator::validate_url(&self.llm.base_url)
            .map_err(|e| AnalysisError::Config(e.to_string()))?;

        for name in self.document.fields.as_vec() {
            if name.trim().is_empty() {
                return Err(AnalysisError::Config(
                    "document field names must not be empty".to_string(),
                ));
            }
        }

        if !self
            .document
            .required_headers
            .iter()
            .any(|h| h.trim() == self.document.fields.key.trim())
        {
            return Err(AnalysisError::Config(format!(
                "required_headers must include the key field '{}'",
                self.document.fields.key
            )));
        }

        Ok(())
    }
}

/// API credentials resolved once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub project_id: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("project_id", &self.project_id)
            .finish()
    }
}

/// Hosted-app style secrets file: top-level keys or an `[openai]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretsFile {
    #[serde(rename = "OPENAI_API_KEY")]
    pub openai_api_key: Option<String>,
    #[serde(rename = "OPENAI_PROJECT_ID")]
    pub openai_project_id: Option<String>,
    pub openai: Option<OpenAiSecrets>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAiSecrets {
    pub api_key: Option<String>,
    pub project_id: Option<String>,
}

impl SecretsFile {
    /// A missing file yields empty secrets.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            debug!("No secrets file at {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            AnalysisError::Config(format!("Invalid secrets file {}: {}", path.display(), e))
        })
    }
}

impl Credentials {
    /// Precedence: `OPENAI_API_KEY` / `OPENAI_PROJECT_ID` environment,
    /// then `llm.api_key` / `llm.project_id`, then the secrets file's
    /// top-level keys, then its `[openai]` table.
    pub fn resolve(llm: &LlmConfig) -> Result<Self> {
        dotenv().ok();

        let secrets = SecretsFile::load(&llm.secrets_path)?;
        Self::from_sources(
            std::env::var("OPENAI_API_KEY").ok(),
            std::env::var("OPENAI_PROJECT_ID").ok(),
            llm,
            &secrets,
        )
    }

    pub fn from_sources(
        env_api_key: Option<String>,
        env_project_id: Option<String>,
        llm: &LlmConfig,
        secrets: &SecretsFile,
    ) -> Result<Self> {
        let nested = secrets.openai.clone().unwrap_or_default();

        let api_key = first_present([
            env_api_key,
            llm.api_key.clone(),
            secrets.openai_api_key.clone(),
            nested.api_key,
        ]);
        let project_id = first_present([
            env_project_id,
            llm.project_id.clone(),
            secrets.openai_project_id.clone(),
            nested.project_id,
        ]);

        match api_key {
            Some(api_key) => Ok(Self {
                api_key,
                project_id,
            }),
            None => Err(AnalysisError::Config(format!(
                "Missing OpenAI API key. Set OPENAI_API_KEY in the environment or a local .env, \
                 or add OPENAI_API_KEY (or [openai] api_key) to {}",
                llm.secrets_path.display()
            ))),
        }
    }
}

fn first_present<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}
