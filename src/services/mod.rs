pub mod cloudinary_service;
pub mod mercadopago_service;

pub use cloudinary_service::CloudinaryClient;
pub use mercadopago_service::MercadoPagoClient;
