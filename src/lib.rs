pub mod config;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::services::{
    aggregator_service::SearchAggregatorService, headhunter_service::HeadHunterService,
    superjob_service::SuperJobService, VacancySearchProvider,
};
use reqwest::Client;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub aggregator: SearchAggregatorService,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.http_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        let mut providers: Vec<Arc<dyn VacancySearchProvider>> = vec![Arc::new(
            HeadHunterService::new(http_client.clone(), config.hh_base_url.clone()),
        )];

        match SuperJobService::from_config(http_client, config) {
            Ok(superjob) => {
                info!("SuperJob provider enabled");
                providers.push(Arc::new(superjob));
            }
            Err(err) => warn!(error = %err, "SuperJob provider disabled"),
        }

        Ok(Self {
            aggregator: SearchAggregatorService::new(providers),
        })
    }
}
