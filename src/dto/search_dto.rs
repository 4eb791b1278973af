use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::search::{ProviderKind, SearchCriteria, SortPreference};
use crate::models::vacancy::Vacancy;
use crate::services::aggregator_service::{AggregatedSearch, ProviderFailure};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VacancySearchQuery {
    #[validate(length(min = 1))]
    pub text: String,
    pub city: Option<String>,
    pub experience: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub per_page: Option<u32>,
    pub sort: Option<String>,
    pub provider: Option<ProviderKind>,
}

impl VacancySearchQuery {
    pub fn criteria(&self) -> SearchCriteria {
        SearchCriteria {
            text: self.text.clone(),
            city: self.city.clone(),
            experience: self.experience.clone().filter(|e| !e.is_empty()),
            count: self.per_page,
            sort: SortPreference::from_token(self.sort.as_deref()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VacancySearchResponse {
    pub items: Vec<Vacancy>,
    pub total: usize,
    pub failures: Vec<ProviderFailure>,
}

impl From<AggregatedSearch> for VacancySearchResponse {
    fn from(result: AggregatedSearch) -> Self {
        Self {
            total: result.items.len(),
            items: result.items,
            failures: result.failures,
        }
    }
}
