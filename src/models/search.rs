use serde::{Deserialize, Serialize};

/// Which job board a search is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    #[serde(rename = "hh")]
    HeadHunter,
    #[serde(rename = "superjob")]
    SuperJob,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::HeadHunter => "hh",
            ProviderKind::SuperJob => "superjob",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generic ordering requested by the caller; each provider maps it to its own token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortPreference {
    Recent,
    SalaryDesc,
    #[default]
    ProviderDefault,
}

impl SortPreference {
    /// `"1"` asks for the newest postings, `"2"` for the highest salary first.
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some("1") => SortPreference::Recent,
            Some("2") => SortPreference::SalaryDesc,
            _ => SortPreference::ProviderDefault,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchCriteria {
    pub text: String,
    pub city: Option<String>,
    pub experience: Option<String>,
    pub count: Option<u32>,
    pub sort: SortPreference,
}

impl SearchCriteria {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_experience(mut self, experience: impl Into<String>) -> Self {
        self.experience = Some(experience.into());
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_sort(mut self, sort: SortPreference) -> Self {
        self.sort = sort;
        self
    }
}
