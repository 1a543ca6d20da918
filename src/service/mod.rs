pub mod digest;
pub mod headlines;
pub mod podcast;
