use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use tracing::{debug, info, instrument};

use super::{check_status, fail_soft, VacancySearchProvider};
use crate::error::Result;
use crate::models::search::{ProviderKind, SearchCriteria, SortPreference};
use crate::models::vacancy::{text_or_placeholder, SalaryRange, Vacancy};

/// The board sends ids as strings; accept integers too.
fn deserialize_id_flexible<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        String(String),
    }

    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(i) => Ok(i),
        IntOrString::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("Invalid vacancy id: {}", s))),
    }
}

#[derive(Debug, Deserialize)]
struct VacanciesEnvelope {
    found: u64,
    #[serde(default)]
    items: Vec<HhVacancy>,
}

#[derive(Debug, Deserialize)]
struct HhVacancy {
    #[serde(deserialize_with = "deserialize_id_flexible")]
    id: i64,
    name: Option<String>,
    employer: Option<HhNamed>,
    snippet: Option<HhSnippet>,
    salary: Option<HhSalary>,
    area: Option<HhNamed>,
    alternate_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HhNamed {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HhSnippet {
    requirement: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HhSalary {
    from: Option<Decimal>,
    to: Option<Decimal>,
    currency: Option<String>,
}

impl HhVacancy {
    fn into_vacancy(self) -> Vacancy {
        let salary = self
            .salary
            .map(|s| SalaryRange::new(s.from, s.to, s.currency))
            .unwrap_or_default();

        Vacancy {
            id: self.id,
            title: text_or_placeholder(self.name),
            employer_name: text_or_placeholder(self.employer.and_then(|e| e.name)),
            requirement_snippet: text_or_placeholder(self.snippet.and_then(|s| s.requirement)),
            salary_from: salary.from,
            salary_to: salary.to,
            currency: salary.currency,
            location_name: text_or_placeholder(self.area.and_then(|a| a.name)),
            url: text_or_placeholder(self.alternate_url),
        }
    }
}

/// One node of the country → region → sub-region catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct AreaNode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub areas: Vec<AreaNode>,
}

const MAX_AREA_DEPTH: usize = 3;

/// Pre-order search of the catalog, three levels deep. Above the third level
/// only childless nodes are matched by name; the first match wins.
pub fn find_area_id(nodes: &[AreaNode], city: &str) -> Option<String> {
    fn walk(nodes: &[AreaNode], city: &str, depth: usize) -> Option<String> {
        for node in nodes {
            if node.areas.is_empty() || depth == MAX_AREA_DEPTH {
                if node.name == city {
                    return Some(node.id.clone());
                }
            } else if let Some(id) = walk(&node.areas, city, depth + 1) {
                return Some(id);
            }
        }
        None
    }

    walk(nodes, city, 1)
}

#[derive(Clone)]
pub struct HeadHunterService {
    client: Client,
    base_url: String,
}

impl HeadHunterService {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn order_by(sort: SortPreference) -> Option<&'static str> {
        match sort {
            SortPreference::Recent => Some("publication_time"),
            SortPreference::SalaryDesc => Some("salary_desc"),
            SortPreference::ProviderDefault => None,
        }
    }

    /// Maps a city name to the board's area id. An empty name skips the catalog request.
    #[instrument(skip(self))]
    pub async fn resolve_area_id(&self, city: &str) -> Result<Option<String>> {
        if city.is_empty() {
            return Ok(None);
        }

        let url = format!("{}/areas", self.base_url);
        debug!("Fetching area catalog from {}", url);
        let response = self.client.get(&url).send().await?;
        let body = check_status(ProviderKind::HeadHunter, response)?
            .text()
            .await?;
        let catalog: Vec<AreaNode> = serde_json::from_str(&body)?;

        let area = find_area_id(&catalog, city);
        if area.is_none() {
            info!(city, "City not found in area catalog, searching without area filter");
        }
        Ok(area)
    }

    #[instrument(skip(self))]
    async fn fetch_vacancies(&self, criteria: &SearchCriteria) -> Result<Vec<Vacancy>> {
        let area = match criteria.city.as_deref() {
            Some(city) => self.resolve_area_id(city).await?,
            None => None,
        };

        let mut params: Vec<(&str, String)> = vec![("text", criteria.text.clone())];
        if let Some(area) = area {
            params.push(("area", area));
        }
        if let Some(experience) = &criteria.experience {
            params.push(("experience", experience.clone()));
        }
        if let Some(count) = criteria.count {
            params.push(("per_page", count.to_string()));
        }
        if let Some(order_by) = Self::order_by(criteria.sort) {
            params.push(("order_by", order_by.to_string()));
        }

        let url = format!("{}/vacancies", self.base_url);
        debug!(?params, "Requesting vacancies from {}", url);
        let response = self.client.get(&url).query(&params).send().await?;
        let body = check_status(ProviderKind::HeadHunter, response)?
            .text()
            .await?;
        let envelope: VacanciesEnvelope = serde_json::from_str(&body)?;

        if envelope.found == 0 {
            info!("Nothing found");
            return Ok(Vec::new());
        }

        Ok(envelope
            .items
            .into_iter()
            .map(HhVacancy::into_vacancy)
            .collect())
    }
}

#[async_trait]
impl VacancySearchProvider for HeadHunterService {
    fn kind(&self) -> ProviderKind {
        ProviderKind::HeadHunter
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Vacancy>> {
        fail_soft(self.kind(), self.fetch_vacancies(criteria).await)
    }
}
