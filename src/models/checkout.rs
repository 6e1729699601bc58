use serde::{Deserialize, Serialize};

/// One cart line as submitted by the frontend. Transient: lives only in the
/// checkout request and in the gateway preference metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub product: String,
    pub size: String,
    pub color: Option<String>,
    pub quantity: u32,
    pub price: f64,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShippingAddress {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub telefono: Option<String>,
    pub calle: Option<String>,
    pub cp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShippingInfo {
    pub name: Option<String>,
    pub cost: Option<f64>,
    pub address: Option<ShippingAddress>,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub items: Vec<CartItem>,
    pub email: Option<String>,
    pub shipping: Option<ShippingInfo>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub init_point: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sandbox_init_point: Option<String>,
    pub preference_id: String,
}

/// Cart identity attached to the preference metadata so the webhook can
/// recover which stock rows to decrement. The gateway is the only
/// persistence of this linkage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookCartItem {
    pub id: String,
    pub size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub quantity: i32,
}
