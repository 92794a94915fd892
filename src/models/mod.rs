use serde::{Deserialize, Serialize};

pub const TITLE_PLACEHOLDER: &str = "Title Not Found";
pub const PRICE_PLACEHOLDER: &str = "Price Not Found";
pub const ADDRESS_PLACEHOLDER: &str = "Address Not Found";
pub const DESCRIPTION_PLACEHOLDER: &str = "Description Not Found";

/// Site a record was scraped from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Country {
    Uk,
    Bg,
}

impl Country {
    /// Tag stored in the `country` column
    pub fn tag(&self) -> &'static str {
        match self {
            Country::Uk => "UK",
            Country::Bg => "BG",
        }
    }
}

/// Geocoded position of a listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Key features as the site presents them
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum KeyFeatures {
    /// One entry per bullet
    List(Vec<String>),
    /// A single delimited string, stored verbatim
    Delimited(String),
}

impl Default for KeyFeatures {
    fn default() -> Self {
        KeyFeatures::List(Vec::new())
    }
}

impl KeyFeatures {
    fn render(&self) -> String {
        match self {
            KeyFeatures::List(items) => encode_list(items),
            KeyFeatures::Delimited(text) => text.clone(),
        }
    }
}

/// One scraped listing, built within a single detail page visit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub source_url: String,
    pub country: Country,
    pub title: Option<String>,
    pub price: Option<String>,
    pub address: Option<String>,
    pub key_features: KeyFeatures,
    pub description: Option<String>,
    pub images: Vec<String>,
    /// Images left after logo/branding filtering
    pub right_images: Vec<String>,
    pub price_per_month: Option<String>,
    pub price_per_week: Option<String>,
    pub coordinates: Option<Coordinates>,
}

impl PropertyRecord {
    pub fn new(source_url: impl Into<String>, country: Country) -> Self {
        Self {
            source_url: source_url.into(),
            country,
            title: None,
            price: None,
            address: None,
            key_features: KeyFeatures::default(),
            description: None,
            images: Vec::new(),
            right_images: Vec::new(),
            price_per_month: None,
            price_per_week: None,
            coordinates: None,
        }
    }

    pub fn title_text(&self) -> &str {
        self.title.as_deref().unwrap_or(TITLE_PLACEHOLDER)
    }

    pub fn price_text(&self) -> &str {
        self.price.as_deref().unwrap_or(PRICE_PLACEHOLDER)
    }

    pub fn address_text(&self) -> &str {
        self.address.as_deref().unwrap_or(ADDRESS_PLACEHOLDER)
    }

    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or(DESCRIPTION_PLACEHOLDER)
    }

    /// Flatten into the column values written by the sink.
    pub fn to_row(&self) -> PropertyRow {
        PropertyRow {
            title: self.title_text().to_string(),
            price: self.price_text().to_string(),
            address: self.address_text().to_string(),
            key_features: self.key_features.render(),
            description: self.description_text().to_string(),
            images: encode_list(&self.images),
            price_per_month: self.price_per_month.clone(),
            price_per_week: self.price_per_week.clone(),
            right_image_url: encode_list(&self.right_images),
            latitude: self.coordinates.map(|c| c.latitude),
            longitude: self.coordinates.map(|c| c.longitude),
            country: self.country.tag(),
        }
    }
}

/// Column values for one inserted row
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRow {
    pub title: String,
    pub price: String,
    pub address: String,
    pub key_features: String,
    pub description: String,
    pub images: String,
    pub price_per_month: Option<String>,
    pub price_per_week: Option<String>,
    pub right_image_url: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub country: &'static str,
}

/// Compact JSON array used for list-valued columns
pub fn encode_list(items: &[String]) -> String {
    serde_json::Value::from(items.to_vec()).to_string()
}

pub fn decode_list(text: &str) -> serde_json::Result<Vec<String>> {
    serde_json::from_str(text)
}
