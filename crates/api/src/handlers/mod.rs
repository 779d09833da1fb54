pub mod admin;
pub mod auth;
pub mod history;
pub mod orchestrations;
pub mod powerbi;
pub mod reports;
