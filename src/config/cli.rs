use crate::config::environment::Environment;
use crate::config::toml_config::ClientConfig;
use crate::domain::model::{QueryRequest, Variables};
use crate::utils::error::{ClientError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "resilient-gql")]
#[command(about = "Run GraphQL operations against the quiz backend with endpoint fallback")]
pub struct CliConfig {
    #[arg(long, short, help = "Path to a TOML client configuration")]
    pub config: Option<String>,

    #[arg(long, help = "Endpoint set to use: production or development")]
    pub env: Option<Environment>,

    #[arg(long, help = "Persist the session in this JSON file")]
    pub session_file: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Execute a GraphQL document and print the response
    Query {
        /// GraphQL document, e.g. '{ ping }'
        document: Option<String>,

        #[arg(long, help = "Read the GraphQL document from a file")]
        file: Option<String>,

        #[arg(long, help = "Variables as a JSON object")]
        variables: Option<String>,

        #[arg(long, help = "Bearer token overriding the stored session")]
        token: Option<String>,
    },
    /// Store a session obtained from the sign-in flow
    Login {
        #[arg(long)]
        token: String,

        #[arg(long, default_value = "{}", help = "User profile as JSON")]
        user: String,
    },
    /// Clear the stored session
    Logout,
    /// Show the stored user profile
    Whoami,
}

impl CliConfig {
    /// 載入 TOML 配置（若有指定），並套用命令列覆寫
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };

        if let Some(session_file) = &self.session_file {
            config.use_session_file(session_file.clone());
        }

        config.validate()?;
        Ok(config)
    }

    pub fn environment(&self, config: &ClientConfig) -> Result<Environment> {
        match self.env {
            Some(environment) => Ok(environment),
            None => config.environment(),
        }
    }
}

impl Command {
    pub fn query_request(&self) -> Result<Option<QueryRequest>> {
        let Command::Query {
            document,
            file,
            variables,
            token,
        } = self
        else {
            return Ok(None);
        };

        let document = match (document, file) {
            (Some(document), None) => document.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)?,
            (Some(_), Some(_)) => {
                return Err(ClientError::ValidationError {
                    message: "pass either a document or --file, not both".to_string(),
                })
            }
            (None, None) => {
                return Err(ClientError::ValidationError {
                    message: "a GraphQL document or --file is required".to_string(),
                })
            }
        };

        let mut request = QueryRequest::new(document);
        if let Some(raw) = variables {
            request = request.with_variables(parse_variables(raw)?);
        }
        if let Some(token) = token {
            request = request.with_token(token.clone());
        }
        Ok(Some(request))
    }
}

pub fn parse_variables(raw: &str) -> Result<Variables> {
    match serde_json::from_str::<serde_json::Value>(raw)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(ClientError::ValidationError {
            message: format!("variables must be a JSON object, got {}", other),
        }),
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.config {
            validate_path("config", path)?;
        }
        if let Some(path) = &self.session_file {
            validate_path("session_file", path)?;
        }

        match &self.command {
            Command::Query {
                document: Some(document),
                ..
            } => validate_non_empty_string("document", document),
            Command::Login { token, .. } => validate_non_empty_string("token", token),
            _ => Ok(()),
        }
    }
}
