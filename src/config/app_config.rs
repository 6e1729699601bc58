use crate::error::{AppError, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub urls: UrlConfig,
    pub mercadopago: MercadoPagoConfig,
    pub cloudinary: CloudinaryConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Public base URLs used to build gateway redirect and webhook callback URLs.
#[derive(Debug, Clone)]
pub struct UrlConfig {
    pub frontend: String,
    pub backend: String,
}

#[derive(Debug, Clone)]
pub struct MercadoPagoConfig {
    pub access_token: String,
}

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let frontend_url = env::var("FRONTEND_URL")?;

        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid PORT value".to_string()))?,
                max_body_size: env::var("MAX_BODY_SIZE")
                    .unwrap_or_else(|_| "10485760".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid MAX_BODY_SIZE value".to_string()))?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")?,
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::ConfigError("Invalid DB_MAX_CONNECTIONS value".to_string())
                    })?,
            },
            cors: CorsConfig {
                allowed_origins: frontend_url
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
            },
            urls: UrlConfig {
                frontend: frontend_url
                    .split(',')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .trim_end_matches('/')
                    .to_string(),
                backend: env::var("BACKEND_URL")?.trim_end_matches('/').to_string(),
            },
            mercadopago: MercadoPagoConfig {
                access_token: env::var("MP_ACCESS_TOKEN")
                    .map_err(|_| AppError::ConfigError("MP_ACCESS_TOKEN not set".to_string()))?,
            },
            cloudinary: CloudinaryConfig {
                cloud_name: env::var("CLOUDINARY_CLOUD_NAME").map_err(|_| {
                    AppError::ConfigError("CLOUDINARY_CLOUD_NAME not set".to_string())
                })?,
                api_key: env::var("CLOUDINARY_API_KEY")
                    .map_err(|_| AppError::ConfigError("CLOUDINARY_API_KEY not set".to_string()))?,
                api_secret: env::var("CLOUDINARY_API_SECRET").map_err(|_| {
                    AppError::ConfigError("CLOUDINARY_API_SECRET not set".to_string())
                })?,
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
