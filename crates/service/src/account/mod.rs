//! Account module: domain, validation, repository and use cases.
//!
//! Registration, login, profile and credential workflows live here; the
//! HTTP layer only binds requests and maps [`errors::AccountError`].

pub mod domain;
pub mod errors;
pub mod repo;
pub mod repository;
pub mod service;
pub mod validation;

pub use errors::AccountError;
pub use repository::UserRepository;
pub use service::AccountService;
