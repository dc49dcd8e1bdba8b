pub mod listing;
pub mod roles;
