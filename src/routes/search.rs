use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    dto::search_dto::{VacancySearchQuery, VacancySearchResponse},
    error::Result,
    AppState,
};

#[axum::debug_handler]
pub async fn search_vacancies(
    State(state): State<AppState>,
    query: std::result::Result<Query<VacancySearchQuery>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let Query(query) = query?;
    query.validate()?;
    let criteria = query.criteria();
    let result = state.aggregator.search(&criteria, query.provider).await?;

    Ok((StatusCode::OK, Json(VacancySearchResponse::from(result))))
}
