//! Job board adapters behind one search capability.

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use tracing::warn;

use crate::error::{Error, Result};
use crate::models::search::{ProviderKind, SearchCriteria};
use crate::models::vacancy::Vacancy;

pub mod aggregator_service;
pub mod headhunter_service;
pub mod superjob_service;

/// Vacancy search against a single job board.
///
/// Every call is independent. Transport failures are reported as an empty
/// result; an HTTP 404 from the board is returned as [`Error::NotFound`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VacancySearchProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// # Errors
    /// - `Error::NotFound` - the board answered 404
    /// - `Error::UnexpectedStatus` - any other non-200 answer
    /// - `Error::Json` - the payload did not have the expected shape
    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Vacancy>>;
}

/// Accepts only 200; 404 and everything else become hard errors.
pub(crate) fn check_status(provider: ProviderKind, response: Response) -> Result<Response> {
    match response.status() {
        StatusCode::OK => Ok(response),
        StatusCode::NOT_FOUND => Err(Error::NotFound(response.url().path().to_string())),
        status => Err(Error::UnexpectedStatus {
            provider: provider.as_str(),
            status: status.as_u16(),
        }),
    }
}

/// Folds transport failures into an empty result.
pub(crate) fn fail_soft(
    provider: ProviderKind,
    result: Result<Vec<Vacancy>>,
) -> Result<Vec<Vacancy>> {
    match result {
        Err(err) if err.is_transport() => {
            warn!(%provider, error = %err, "Provider unreachable, returning empty result");
            Ok(Vec::new())
        }
        other => other,
    }
}
