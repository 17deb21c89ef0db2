//! # API Client
//!
//! Remote collaborators of the clinic report application.
//!
//! Contains:
//! - The authentication request wrapper (`auth` module)
//! - A fetcher for remote assets such as clinic logos (`assets` module)
//!
//! Both are exposed behind traits so the screens in `report-core` can be exercised without a
//! network.

pub mod assets;
pub mod auth;

pub use assets::{AssetError, AssetFetcher, HttpAssetFetcher};
pub use auth::{AuthClient, AuthError, Authenticator, Credentials, LoginResponse};
