pub mod config;
pub mod credentials;
pub mod envelope;
pub mod error;
pub mod legacy;
pub mod mail;
pub mod models;
pub mod orders;
pub mod seo;
pub mod table;

pub use error::{Result, TourError};
