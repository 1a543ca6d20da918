pub mod health;
pub mod news;
pub mod podcast;
pub mod summarize;
