//! Authentication and authorization module
//!
//! JWT-based authentication built from:
//! - Token issuance and validation (distinct bearer/refresh secrets)
//! - Password hashing with Argon2
//! - Middleware for request authentication
//! - The authentication service tying tokens to stored credentials
//! - Repositories for users and the revocation list

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;

pub use jwt::{Claims, SignedToken, TokenConfig, TokenError, TokenPair, TokenService};
pub use middleware::{optional_auth, require_auth, AuthError, AuthenticatedUser};
pub use models::{OwnerProfile, ProfileView, PublicProfile, User};
pub use password::{hash_password, verify_password};
pub use repository::{RepositoryError, RevokedTokenRepository, UserRepository};
pub use service::{
    refresh_tokens, AuthResponse, AuthService, LoginRequest, LogoutRequest, RefreshRequest,
    RegisterRequest, TokenBundle, UpdateProfileRequest,
};
