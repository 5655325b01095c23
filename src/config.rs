use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_public_key: String, // Ed25519 public key (PEM), verification only
    pub auth_issuer: String,
    pub invitation_ttl_hours: i64,
    pub expiry_sweep_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            jwt_public_key: env::var("JWT_PUBLIC_KEY").expect("JWT_PUBLIC_KEY must be set (Ed25519 Public Key)"),
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://auth.gigwork.local".to_string()),
            invitation_ttl_hours: env::var("INVITATION_TTL_HOURS").unwrap_or_else(|_| "72".to_string()).parse().expect("INVITATION_TTL_HOURS must be a number"),
            expiry_sweep_interval_secs: env::var("EXPIRY_SWEEP_INTERVAL_SECS").unwrap_or_else(|_| "60".to_string()).parse().expect("EXPIRY_SWEEP_INTERVAL_SECS must be a number"),
        }
    }
}
