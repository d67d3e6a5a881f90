use serde::{Deserialize, Serialize};

pub const ORDERS_TABLE: &str = "orders";
pub const TOUR_LANDING_PAGES_TABLE: &str = "tour_landing_pages";
pub const WOOCOMMERCE_CREDENTIALS_TABLE: &str = "woocommerce_credentials";
pub const USER_ROLES_TABLE: &str = "user_roles";

// ---------------------------------------------------------------------------
// OrderStatus
// ---------------------------------------------------------------------------

/// The two order status spellings this crate cares about. `Complete` is a
/// data-entry typo that predates the canonical `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Complete,
    Completed,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Complete => "complete",
            OrderStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourLandingPage {
    #[serde(default)]
    pub id: serde_json::Value,
    pub domain: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WooCommerceCredential {
    pub site_name: String,
    pub tour_name: String,
    pub website_url: String,
    pub api_url: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    pub profit_margin: f64,
    pub is_active: bool,
}
