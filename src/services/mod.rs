pub mod auth;
pub mod catalog;
pub mod lists;
pub mod providers;

pub use auth::{AuthProviderVerifier, SessionVerifier};
pub use providers::{CatalogProvider, TmdbCatalog};
