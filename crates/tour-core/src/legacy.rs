/// A pre-migration WooCommerce storefront whose API credentials still live in
/// environment variables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegacySite {
    pub site_name: &'static str,
    pub tour_name: &'static str,
    pub website_url: &'static str,
    pub api_url: &'static str,
    pub key_env: &'static str,
    pub secret_env: &'static str,
    pub profit_margin: f64,
}

pub const LEGACY_SITES: &[LegacySite] = &[
    LegacySite {
        site_name: "sunset-sailing",
        tour_name: "Sunset Sailing Cruise",
        website_url: "https://sunsetsailing.example",
        api_url: "https://sunsetsailing.example/wp-json/wc/v3",
        key_env: "WC_SUNSET_SAILING_CONSUMER_KEY",
        secret_env: "WC_SUNSET_SAILING_CONSUMER_SECRET",
        profit_margin: 0.20,
    },
    LegacySite {
        site_name: "canyon-jeep",
        tour_name: "Canyon Jeep Safari",
        website_url: "https://canyonjeep.example",
        api_url: "https://canyonjeep.example/wp-json/wc/v3",
        key_env: "WC_CANYON_JEEP_CONSUMER_KEY",
        secret_env: "WC_CANYON_JEEP_CONSUMER_SECRET",
        profit_margin: 0.15,
    },
    LegacySite {
        site_name: "reef-snorkel",
        tour_name: "Reef Snorkel Adventure",
        website_url: "https://reefsnorkel.example",
        api_url: "https://reefsnorkel.example/wp-json/wc/v3",
        key_env: "WC_REEF_SNORKEL_CONSUMER_KEY",
        secret_env: "WC_REEF_SNORKEL_CONSUMER_SECRET",
        profit_margin: 0.18,
    },
    LegacySite {
        site_name: "old-town-walks",
        tour_name: "Old Town Walking Tour",
        website_url: "https://oldtownwalks.example",
        api_url: "https://oldtownwalks.example/wp-json/wc/v3",
        key_env: "WC_OLD_TOWN_WALKS_CONSUMER_KEY",
        secret_env: "WC_OLD_TOWN_WALKS_CONSUMER_SECRET",
        profit_margin: 0.25,
    },
];
