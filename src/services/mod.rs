pub mod calendar;
pub mod classifier;
pub mod progression;
pub mod survey;
