pub mod error;
pub mod pagination;
pub mod query;
pub mod response;
pub mod search;
pub mod translation;
pub mod validation;
