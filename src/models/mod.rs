pub mod search;
pub mod vacancy;
