pub mod auth;
pub mod classification;
pub mod reports;
pub mod users;
