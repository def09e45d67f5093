#![deny(clippy::all, clippy::pedantic)]

use std::sync::Arc;

use thiserror::Error;

use quire::application::catalog::CatalogService;
use quire::application::comments::CommentService;
use quire::application::error::AppError;
use quire::cache::CacheConfig;
use quire::config::{LoadError, Settings};
use quire::domain::comments::Viewer;
use quire::infra::error::InfraError;
use quire::infra::http::{ApiClient, ApiError};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("failed to set up the API client: {0}")]
    Client(#[source] ApiError),
    #[error("{op} failed: {source}")]
    App {
        op: &'static str,
        #[source]
        source: AppError,
    },
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Tag a failed application call with the command that issued it.
pub trait OpContext<T> {
    fn op(self, op: &'static str) -> Result<T, CliError>;
}

impl<T, E> OpContext<T> for Result<T, E>
where
    E: Into<AppError>,
{
    fn op(self, op: &'static str) -> Result<T, CliError> {
        self.map_err(|err| CliError::App {
            op,
            source: err.into(),
        })
    }
}

/// Everything a command handler needs for one invocation.
#[derive(Clone)]
pub struct Ctx {
    pub client: ApiClient,
    pub settings: Settings,
    pub catalog: Arc<CatalogService>,
    pub comments: Arc<CommentService>,
}

impl Ctx {
    pub fn new(settings: Settings) -> Result<Self, CliError> {
        let client = ApiClient::from_settings(&settings.api).map_err(CliError::Client)?;
        let cache = CacheConfig::from(&settings.cache);
        let catalog = Arc::new(CatalogService::from_client(&client, &cache));
        let comments = Arc::new(CommentService::new(
            Arc::new(client.clone()),
            settings.comments,
        ));
        Ok(Self {
            client,
            settings,
            catalog,
            comments,
        })
    }

    /// The signed-in user as a comment viewer, or a guest without a token.
    pub async fn viewer(&self) -> Result<Viewer, CliError> {
        if self.client.token().is_none() {
            return Ok(Viewer::guest());
        }
        let profile = self.client.profile().await.op("auth.profile")?;
        Ok(Viewer::from(&profile))
    }
}
