pub mod account;
pub mod calendar;
pub mod sri;
pub mod walk;
