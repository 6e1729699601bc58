use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    config::MercadoPagoConfig,
    error::{AppError, Result},
    models::{CheckoutRequest, WebhookCartItem},
};

const MP_API_BASE: &str = "https://api.mercadopago.com";
const CURRENCY: &str = "ARS";
const INSTALLMENTS: u32 = 3;

#[derive(Clone)]
pub struct MercadoPagoClient {
    http: reqwest::Client,
    access_token: String,
}

#[derive(Debug, Deserialize)]
pub struct PreferenceResponse {
    pub id: String,
    pub init_point: String,
    pub sandbox_init_point: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentDetails {
    pub status: String,
    #[serde(default)]
    pub transaction_amount: Option<f64>,
    #[serde(default)]
    pub payer: Option<PaymentPayer>,
    #[serde(default)]
    pub metadata: PaymentMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentPayer {
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentMetadata {
    #[serde(default)]
    pub cart_items: Vec<WebhookCartItem>,
    #[serde(default)]
    pub shipping_cost: Option<f64>,
}

impl MercadoPagoClient {
    pub fn new(config: &MercadoPagoConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            access_token: config.access_token.clone(),
        }
    }

    pub async fn create_preference(&self, body: &Value) -> Result<PreferenceResponse> {
        let response = self
            .http
            .post(format!("{}/checkout/preferences", MP_API_BASE))
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("MercadoPago preference request failed: {}", e);
                AppError::InternalError("No se pudo crear la preferencia.".to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("MercadoPago preference rejected ({}): {}", status, body);
            return Err(AppError::InternalError(
                "No se pudo crear la preferencia.".to_string(),
            ));
        }

        response.json::<PreferenceResponse>().await.map_err(|e| {
            tracing::error!("Failed to parse MercadoPago preference response: {}", e);
            AppError::InternalError("No se pudo crear la preferencia.".to_string())
        })
    }

    pub async fn get_payment(&self, payment_id: &str) -> Result<PaymentDetails> {
        let response = self
            .http
            .get(format!("{}/v1/payments/{}", MP_API_BASE, payment_id))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| {
                AppError::InternalError(format!("MercadoPago payment lookup failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::InternalError(format!(
                "MercadoPago payment lookup rejected ({}): {}",
                status, body
            )));
        }

        response.json::<PaymentDetails>().await.map_err(|e| {
            AppError::InternalError(format!("Failed to parse MercadoPago payment: {}", e))
        })
    }
}

pub fn line_item_description(size: &str, color: Option<&str>) -> String {
    match color {
        Some(color) => format!("Talle: {} - {}", size, color),
        None => format!("Talle: {}", size),
    }
}

/// Builds the gateway preference payload: line items, payer block, redirect
/// URLs and the cart metadata the webhook later reads back.
pub fn build_preference_body(
    req: &CheckoutRequest,
    frontend_url: &str,
    backend_url: &str,
) -> Value {
    let mut items: Vec<Value> = req
        .items
        .iter()
        .map(|item| {
            json!({
                "id": item.id,
                "title": item.product,
                "description": line_item_description(&item.size, item.color.as_deref()),
                "quantity": item.quantity,
                "unit_price": item.price,
                "currency_id": CURRENCY,
                "picture_url": item.image,
            })
        })
        .collect();

    let shipping_cost = req.shipping.as_ref().and_then(|s| s.cost).unwrap_or(0.0);
    if shipping_cost > 0.0 {
        let shipping_name = req
            .shipping
            .as_ref()
            .and_then(|s| s.name.clone())
            .unwrap_or_default();

        items.push(json!({
            "id": "shipping",
            "title": format!("Envío — {}", shipping_name),
            "description": "Costo de envío",
            "quantity": 1,
            "unit_price": shipping_cost,
            "currency_id": CURRENCY,
        }));
    }

    let address = req.shipping.as_ref().and_then(|s| s.address.as_ref());

    let cart_items: Vec<WebhookCartItem> = req
        .items
        .iter()
        .map(|item| WebhookCartItem {
            id: item.id.clone(),
            size: item.size.clone(),
            color: item.color.clone(),
            quantity: item.quantity as i32,
        })
        .collect();

    json!({
        "payer": {
            "email": req.email,
            "name": address.and_then(|a| a.nombre.clone()),
            "surname": address.and_then(|a| a.apellido.clone()),
            "phone": { "number": address.and_then(|a| a.telefono.clone()) },
            "address": {
                "street_name": address.and_then(|a| a.calle.clone()),
                "zip_code": address.and_then(|a| a.cp.clone()),
            },
        },
        "items": items,
        "back_urls": {
            "success": format!("{}/checkout/success", frontend_url),
            "failure": format!("{}/checkout/failure", frontend_url),
            "pending": format!("{}/checkout/pending", frontend_url),
        },
        "notification_url": format!("{}/api/webhook", backend_url),
        "payment_methods": { "installments": INSTALLMENTS },
        "metadata": {
            "cart_items": cart_items,
            "shipping_cost": req.shipping.as_ref().and_then(|s| s.cost),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CartItem, ShippingInfo};

    fn cart_item(id: &str, size: &str, color: Option<&str>) -> CartItem {
        CartItem {
            id: id.to_string(),
            product: "Remera Oversize".to_string(),
            size: size.to_string(),
            color: color.map(String::from),
            quantity: 2,
            price: 18500.0,
            image: Some("https://cdn.example.com/remera.jpg".to_string()),
        }
    }

    fn checkout(items: Vec<CartItem>, shipping: Option<ShippingInfo>) -> CheckoutRequest {
        CheckoutRequest {
            items,
            email: Some("comprador@example.com".to_string()),
            shipping,
        }
    }

    #[test]
    fn composes_size_and_color_description() {
        assert_eq!(line_item_description("M", Some("Negro")), "Talle: M - Negro");
        assert_eq!(line_item_description("L", None), "Talle: L");
    }

    #[test]
    fn builds_line_items_and_metadata() {
        let req = checkout(vec![cart_item("remera-01", "M", Some("Negro"))], None);
        let body = build_preference_body(&req, "https://tienda.test", "https://api.tienda.test");

        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["title"], "Remera Oversize");
        assert_eq!(items[0]["description"], "Talle: M - Negro");
        assert_eq!(items[0]["unit_price"], 18500.0);
        assert_eq!(items[0]["currency_id"], "ARS");

        let cart_items = body["metadata"]["cart_items"].as_array().unwrap();
        assert_eq!(cart_items.len(), 1);
        assert_eq!(cart_items[0]["id"], "remera-01");
        assert_eq!(cart_items[0]["size"], "M");
        assert_eq!(cart_items[0]["quantity"], 2);

        assert_eq!(
            body["notification_url"],
            "https://api.tienda.test/api/webhook"
        );
        assert_eq!(
            body["back_urls"]["success"],
            "https://tienda.test/checkout/success"
        );
    }

    #[test]
    fn adds_shipping_line_when_cost_is_positive() {
        let shipping = ShippingInfo {
            name: Some("Correo Argentino".to_string()),
            cost: Some(3500.0),
            address: None,
        };
        let req = checkout(vec![cart_item("remera-01", "M", None)], Some(shipping));
        let body = build_preference_body(&req, "https://tienda.test", "https://api.tienda.test");

        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["id"], "shipping");
        assert_eq!(items[1]["unit_price"], 3500.0);
        assert_eq!(body["metadata"]["shipping_cost"], 3500.0);
    }

    #[test]
    fn omits_shipping_line_when_cost_is_zero() {
        let shipping = ShippingInfo {
            name: Some("Retiro en local".to_string()),
            cost: Some(0.0),
            address: None,
        };
        let req = checkout(vec![cart_item("remera-01", "M", None)], Some(shipping));
        let body = build_preference_body(&req, "https://tienda.test", "https://api.tienda.test");

        assert_eq!(body["items"].as_array().unwrap().len(), 1);
    }
}
