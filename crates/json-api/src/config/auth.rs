//! Auth Config

use clap::Args;

use brewhouse_app::secrets::Secret;

/// Bearer token verification settings.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// HS256 secret shared with the identity provider
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Secret,
}
