//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login, session issue/revoke and the token-to-identity
//! resolution used by the HTTP authentication gate all live here.

pub mod domain;
pub mod repo;
pub mod repository;
pub mod service;

pub use service::AuthService;
