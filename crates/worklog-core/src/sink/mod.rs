//! Remote publishing sinks

pub mod sheets;

pub use sheets::SheetsClient;
