use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{instrument, warn};

use super::VacancySearchProvider;
use crate::error::{Error, Result};
use crate::models::search::{ProviderKind, SearchCriteria};
use crate::models::vacancy::Vacancy;

#[derive(Debug, Clone, Serialize)]
pub struct ProviderFailure {
    pub provider: ProviderKind,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct AggregatedSearch {
    pub items: Vec<Vacancy>,
    pub failures: Vec<ProviderFailure>,
}

/// Runs the same search on several boards at once and merges the answers.
#[derive(Clone)]
pub struct SearchAggregatorService {
    providers: Vec<Arc<dyn VacancySearchProvider>>,
}

impl SearchAggregatorService {
    pub fn new(providers: Vec<Arc<dyn VacancySearchProvider>>) -> Self {
        Self { providers }
    }

    pub fn provider_kinds(&self) -> Vec<ProviderKind> {
        self.providers.iter().map(|p| p.kind()).collect()
    }

    fn select(&self, only: Option<ProviderKind>) -> Result<Vec<&Arc<dyn VacancySearchProvider>>> {
        let selected: Vec<_> = self
            .providers
            .iter()
            .filter(|p| only.map_or(true, |kind| p.kind() == kind))
            .collect();

        if selected.is_empty() {
            let name = only.map_or("any", |kind| kind.as_str());
            return Err(Error::BadRequest(format!(
                "Provider {} is not configured",
                name
            )));
        }
        Ok(selected)
    }

    /// Items keep provider order. A single selected provider propagates its error;
    /// with several, failures are collected unless every provider failed.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        criteria: &SearchCriteria,
        only: Option<ProviderKind>,
    ) -> Result<AggregatedSearch> {
        let selected = self.select(only)?;
        let outcomes = join_all(selected.iter().map(|provider| async move {
            (provider.kind(), provider.search(criteria).await)
        }))
        .await;

        let total = outcomes.len();
        let mut aggregated = AggregatedSearch::default();
        let mut first_error = None;

        for (provider, outcome) in outcomes {
            match outcome {
                Ok(mut items) => aggregated.items.append(&mut items),
                Err(err) => {
                    warn!(%provider, error = %err, "Provider search failed");
                    aggregated.failures.push(ProviderFailure {
                        provider,
                        error: err.to_string(),
                    });
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) if aggregated.failures.len() == total => Err(err),
            _ => Ok(aggregated),
        }
    }
}
