mod app_config;

pub use app_config::{
    AppConfig, CloudinaryConfig, CorsConfig, DatabaseConfig, MercadoPagoConfig, ServerConfig,
    UrlConfig,
};
