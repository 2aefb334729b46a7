pub mod auth;
pub mod calendar;
pub mod emotion;
pub mod health;
pub mod reports;
pub mod sri;
pub mod walks;
