pub mod export;
pub mod migrate;

use secrecy::SecretString;

/// Read the database URL, preferring `IMELIQ_DATABASE_URL`.
fn database_url() -> Result<SecretString, MissingDatabaseUrl> {
    dotenvy::dotenv().ok();

    std::env::var("IMELIQ_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| MissingDatabaseUrl)
}

#[derive(Debug, thiserror::Error)]
#[error("Missing environment variable: IMELIQ_DATABASE_URL (or DATABASE_URL)")]
pub struct MissingDatabaseUrl;
