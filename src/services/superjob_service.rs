use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::{check_status, fail_soft, VacancySearchProvider};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::search::{ProviderKind, SearchCriteria, SortPreference};
use crate::models::vacancy::{text_or_placeholder, SalaryRange, Vacancy};

const API_KEY_HEADER: &str = "X-Api-App-Id";

#[derive(Debug, Deserialize)]
struct VacanciesEnvelope {
    #[serde(default)]
    objects: Vec<SjVacancy>,
}

#[derive(Debug, Deserialize)]
struct SjVacancy {
    id: i64,
    profession: Option<String>,
    employer: Option<SjEmployer>,
    candidat: Option<String>,
    payment_from: Option<Decimal>,
    payment_to: Option<Decimal>,
    currency: Option<String>,
    town: Option<SjTown>,
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SjEmployer {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SjTown {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TownsEnvelope {
    #[serde(default)]
    objects: Vec<SjTown>,
}

impl SjVacancy {
    fn into_vacancy(self) -> Vacancy {
        let salary = SalaryRange::new(self.payment_from, self.payment_to, self.currency);

        Vacancy {
            id: self.id,
            title: text_or_placeholder(self.profession),
            employer_name: text_or_placeholder(self.employer.and_then(|e| e.name)),
            requirement_snippet: text_or_placeholder(self.candidat),
            salary_from: salary.from,
            salary_to: salary.to,
            currency: salary.currency,
            location_name: text_or_placeholder(self.town.and_then(|t| t.title)),
            url: text_or_placeholder(self.link),
        }
    }
}

#[derive(Clone)]
pub struct SuperJobService {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SuperJobService {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(client: Client, config: &Config) -> Result<Self> {
        let api_key = config
            .superjob_api_key
            .clone()
            .ok_or_else(|| Error::Config("Missing environment variable: SJ_API_KEY".to_string()))?;
        Ok(Self::new(client, config.superjob_base_url.clone(), api_key))
    }

    /// The board always needs an explicit ordering, so the fallback is `relevance`.
    pub fn order_field(sort: SortPreference) -> &'static str {
        match sort {
            SortPreference::Recent => "date",
            SortPreference::SalaryDesc => "payment_desc",
            SortPreference::ProviderDefault => "relevance",
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .header(API_KEY_HEADER, &self.api_key)
    }

    /// Returns the city unchanged if the town list contains it verbatim.
    #[instrument(skip(self))]
    pub async fn validate_town(&self, city: &str) -> Result<Option<String>> {
        if city.is_empty() {
            return Ok(None);
        }

        debug!("Fetching town list");
        let response = self.get("/towns/").send().await?;
        let body = check_status(ProviderKind::SuperJob, response)?
            .text()
            .await?;
        let towns: TownsEnvelope = serde_json::from_str(&body)?;

        let known = towns
            .objects
            .iter()
            .any(|town| town.title.as_deref() == Some(city));
        if !known {
            info!(city, "Town not found, searching without town filter");
        }
        Ok(known.then(|| city.to_string()))
    }

    #[instrument(skip(self))]
    async fn fetch_vacancies(&self, criteria: &SearchCriteria) -> Result<Vec<Vacancy>> {
        let town = match criteria.city.as_deref() {
            Some(city) => self.validate_town(city).await?,
            None => None,
        };

        let mut params: Vec<(&str, String)> = vec![("keyword", criteria.text.clone())];
        if let Some(town) = town {
            params.push(("town", town));
        }
        if let Some(experience) = &criteria.experience {
            params.push(("experience", experience.clone()));
        }
        if let Some(count) = criteria.count {
            params.push(("count", count.to_string()));
        }
        params.push(("order_field", Self::order_field(criteria.sort).to_string()));

        debug!(?params, "Requesting vacancies");
        let response = self.get("/vacancies/").query(&params).send().await?;
        let body = check_status(ProviderKind::SuperJob, response)?
            .text()
            .await?;
        let envelope: VacanciesEnvelope = serde_json::from_str(&body)?;

        if envelope.objects.is_empty() {
            info!("Nothing found");
        }

        Ok(envelope
            .objects
            .into_iter()
            .map(SjVacancy::into_vacancy)
            .collect())
    }
}

#[async_trait]
impl VacancySearchProvider for SuperJobService {
    fn kind(&self) -> ProviderKind {
        ProviderKind::SuperJob
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Vacancy>> {
        fail_soft(self.kind(), self.fetch_vacancies(criteria).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vacancy::NO_DATA;
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;

    const KEY: &str = "v3.r.test-key";

    fn service(url: &str) -> SuperJobService {
        SuperJobService::new(Client::new(), url, KEY)
    }

    async fn towns_server() -> ServerGuard {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/towns/")
            .match_header(API_KEY_HEADER, KEY)
            .with_status(200)
            .with_body(
                json!({ "objects": [
                    { "id": 4, "title": "Москва" },
                    { "id": 14, "title": "Санкт-Петербург" }
                ]})
                .to_string(),
            )
            .create_async()
            .await;
        server
    }

    #[test]
    fn order_field_tokens() {
        assert_eq!(
            SuperJobService::order_field(SortPreference::from_token(Some("1"))),
            "date"
        );
        assert_eq!(
            SuperJobService::order_field(SortPreference::from_token(Some("2"))),
            "payment_desc"
        );
        assert_eq!(
            SuperJobService::order_field(SortPreference::from_token(Some("0"))),
            "relevance"
        );
        assert_eq!(
            SuperJobService::order_field(SortPreference::from_token(None)),
            "relevance"
        );
    }

    #[test]
    fn from_config_requires_api_key() {
        let config = Config::with_endpoints("http://hh", "http://sj", None);
        let err = SuperJobService::from_config(Client::new(), &config).err().unwrap();
        assert!(matches!(err, Error::Config(msg) if msg.contains("SJ_API_KEY")));

        let config = Config::with_endpoints("http://hh", "http://sj/", Some(KEY.into()));
        let service = SuperJobService::from_config(Client::new(), &config).unwrap();
        assert_eq!(service.base_url, "http://sj");
    }

    #[test]
    fn zero_payments_are_absent() {
        let item: SjVacancy = serde_json::from_value(json!({
            "id": 7,
            "profession": "Инженер",
            "payment_from": 0,
            "payment_to": 0,
            "currency": "rub"
        }))
        .unwrap();
        let vacancy = item.into_vacancy();
        assert_eq!(vacancy.salary_from, None);
        assert_eq!(vacancy.salary_to, None);
        assert_eq!(vacancy.currency, None);
        assert_eq!(vacancy.title, "Инженер");
        assert_eq!(vacancy.location_name, NO_DATA);
    }

    #[tokio::test]
    async fn exact_town_is_returned() {
        let server = towns_server().await;
        let town = service(&server.url()).validate_town("Москва").await.unwrap();
        assert_eq!(town.as_deref(), Some("Москва"));
    }

    #[tokio::test]
    async fn near_match_town_is_absent() {
        let server = towns_server().await;
        let sj = service(&server.url());
        assert_eq!(sj.validate_town("москва").await.unwrap(), None);
        assert_eq!(sj.validate_town("Москва ").await.unwrap(), None);
    }

    #[tokio::test]
    async fn empty_town_skips_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/towns/")
            .expect(0)
            .create_async()
            .await;

        assert_eq!(service(&server.url()).validate_town("").await.unwrap(), None);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn search_sends_key_and_default_order() {
        let mut server = towns_server().await;
        let mock = server
            .mock("GET", "/vacancies/")
            .match_header(API_KEY_HEADER, KEY)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("keyword".into(), "rust".into()),
                Matcher::UrlEncoded("town".into(), "Москва".into()),
                Matcher::UrlEncoded("count".into(), "10".into()),
                Matcher::UrlEncoded("order_field".into(), "relevance".into()),
            ]))
            .with_status(200)
            .with_body(
                json!({ "objects": [{
                    "id": 48081,
                    "profession": "Rust developer",
                    "employer": { "name": "Acme" },
                    "candidat": "3+ years of Rust",
                    "payment_from": 150000,
                    "payment_to": 0,
                    "currency": "rub",
                    "town": { "id": 4, "title": "Москва" },
                    "link": "https://www.superjob.ru/vakansii/48081.html"
                }], "total": 1 })
                .to_string(),
            )
            .create_async()
            .await;

        let criteria = SearchCriteria::new("rust").with_city("Москва").with_count(10);
        let result = service(&server.url()).search(&criteria).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].salary_from, Some(Decimal::from(150_000)));
        assert_eq!(result[0].salary_to, None);
        assert_eq!(result[0].currency.as_deref(), Some("rub"));
        assert_eq!(result[0].requirement_snippet, "3+ years of Rust");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_objects_returns_empty() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/vacancies/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({ "objects": [], "total": 0 }).to_string())
            .create_async()
            .await;

        let result = service(&server.url())
            .search(&SearchCriteria::new("rust"))
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn not_found_is_a_hard_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/vacancies/")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let err = service(&server.url())
            .search(&SearchCriteria::new("rust"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn rejected_key_surfaces_as_status_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/vacancies/")
            .match_query(Matcher::Any)
            .with_status(403)
            .create_async()
            .await;

        let err = service(&server.url())
            .search(&SearchCriteria::new("rust"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnexpectedStatus { provider: "superjob", status: 403 }));
    }

    #[tokio::test]
    async fn unknown_town_searches_without_town() {
        let mut server = towns_server().await;
        let mock = server
            .mock("GET", "/vacancies/")
            .match_query(Matcher::Regex("^keyword=rust&order_field=relevance$".into()))
            .with_status(200)
            .with_body(json!({ "objects": [], "total": 0 }).to_string())
            .create_async()
            .await;

        let result = service(&server.url())
            .search(&SearchCriteria::new("rust").with_city("Атлантида"))
            .await
            .unwrap();
        assert!(result.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn connection_refused_returns_empty() {
        let sj = service("http://127.0.0.1:1");
        let result = sj.search(&SearchCriteria::new("rust")).await.unwrap();
        assert!(result.is_empty());

        let result = sj
            .search(&SearchCriteria::new("rust").with_city("Москва"))
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn invalid_api_key_is_a_config_error() {
        let sj = SuperJobService::new(Client::new(), "http://127.0.0.1:1", "bad\nkey");
        let err = sj.search(&SearchCriteria::new("rust")).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
