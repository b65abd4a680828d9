// EstateHub - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies. Serialised in camelCase, the shape the
// marketplace backend speaks.
//
// These types are the shared vocabulary across all layers.

use crate::util::error::FilterError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generates `all()`, `as_str()`, `label()`, `Display` and `FromStr` for a
/// closed enum whose wire form is a lowercase string.
macro_rules! closed_enum {
    ($name:ident, $field:literal, { $($variant:ident => ($wire:literal, $label:literal)),+ $(,)? }) => {
        impl $name {
            /// Returns all variants in display order.
            pub fn all() -> &'static [$name] {
                &[$($name::$variant),+]
            }

            /// Lowercase wire form, as stored and sent to the backend.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            /// Human-readable label for display.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = FilterError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($wire => Ok($name::$variant),)+
                    _ => Err(FilterError::UnknownValue {
                        field: $field,
                        value: s.to_string(),
                        expected: $name::all()
                            .iter()
                            .map(|v| v.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    }),
                }
            }
        }
    };
}

// =============================================================================
// Users
// =============================================================================

/// Marketplace role. Fixed at registration; there is no way to change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Seller,
    Partner,
    Admin,
}

closed_enum!(Role, "role", {
    Buyer => ("buyer", "Buyer"),
    Seller => ("seller", "Seller"),
    Partner => ("partner", "Partner"),
    Admin => ("admin", "Admin"),
});

/// A registered marketplace user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

// =============================================================================
// Listings
// =============================================================================

/// Listing lifecycle state. No transition rules are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Available,
    Pending,
    Sold,
}

closed_enum!(ListingStatus, "status", {
    Available => ("available", "Available"),
    Pending => ("pending", "Pending"),
    Sold => ("sold", "Sold"),
});

/// A property listing.
///
/// `bundled_offers` is a denormalised embed kept for display; the
/// property/offer relation itself is exposed as [`BundledOffer`] rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: String,
    pub bedrooms: u32,
    /// Half baths are counted as 0.5.
    pub bathrooms: f64,
    /// Floor area in square feet.
    pub area: u32,
    pub seller_id: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub bundled_offers: Vec<ServiceOffer>,
}

/// Partner service category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Decor,
    Transport,
    Internet,
    Cleaning,
    Security,
    Other,
}

closed_enum!(ServiceCategory, "category", {
    Decor => ("decor", "Decor"),
    Transport => ("transport", "Transport"),
    Internet => ("internet", "Internet"),
    Cleaning => ("cleaning", "Cleaning"),
    Security => ("security", "Security"),
    Other => ("other", "Other"),
});

/// A service sold by a partner, optionally bundled with listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOffer {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub partner_id: String,
    pub partner_name: String,
    pub category: ServiceCategory,
    pub created_at: DateTime<Utc>,
}

/// Join row linking a property to one of its bundled offers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundledOffer {
    pub property_id: String,
    pub offer_id: String,
}

// =============================================================================
// Contact requests and CRM leads
// =============================================================================

/// Contact request state. No transition rules are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Contacted,
    Closed,
}

closed_enum!(RequestStatus, "request status", {
    Pending => ("pending", "Pending"),
    Contacted => ("contacted", "Contacted"),
    Closed => ("closed", "Closed"),
});

/// A buyer reaching out about a property or a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub id: String,
    pub buyer_id: String,
    #[serde(default)]
    pub buyer_name: String,
    #[serde(default)]
    pub property_id: Option<String>,
    #[serde(default)]
    pub service_id: Option<String>,
    pub message: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// Sales-pipeline grade of a CRM lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadTemperature {
    Hot,
    Warm,
    Cold,
}

closed_enum!(LeadTemperature, "lead temperature", {
    Hot => ("hot", "Hot"),
    Warm => ("warm", "Warm"),
    Cold => ("cold", "Cold"),
});

/// A prospect tracked in the admin CRM: a contact request plus
/// sales-pipeline fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    #[serde(default)]
    pub requester_id: Option<String>,
    #[serde(default)]
    pub property_id: Option<String>,
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub message: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,

    pub name: String,
    pub email: String,
    pub phone: String,
    /// "City, ST" form; the part after the comma is the region.
    pub location: String,
    pub source: String,
    pub notes: String,
    pub property_interest: String,
    pub temperature: LeadTemperature,
    pub last_interaction: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Lead {
    /// Region code of the lead's location (the text after the last comma).
    pub fn region(&self) -> &str {
        self.location
            .rsplit_once(',')
            .map(|(_, region)| region.trim())
            .unwrap_or_else(|| self.location.trim())
    }
}

/// Channel of a CRM communication log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunicationKind {
    Email,
    Call,
    Meeting,
}

closed_enum!(CommunicationKind, "communication kind", {
    Email => ("email", "Email"),
    Call => ("call", "Call"),
    Meeting => ("meeting", "Meeting"),
});

/// One entry of a lead's communication history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Communication {
    pub id: String,
    pub lead_id: String,
    pub kind: CommunicationKind,
    pub date: DateTime<Utc>,
    pub content: String,
}

// =============================================================================
// Generated content
// =============================================================================

/// What a piece of generated text is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Marketing,
    Chatbot,
}

closed_enum!(ContentType, "content type", {
    Marketing => ("marketing", "Marketing"),
    Chatbot => ("chatbot", "Chatbot"),
});

/// Generated marketing copy or chatbot script. Unstructured text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiContent {
    pub id: String,
    pub user_id: String,
    pub content_type: ContentType,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_role_parses_case_insensitively() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" seller ".parse::<Role>().unwrap(), Role::Seller);
    }

    #[test]
    fn test_unknown_category_lists_expected_values() {
        let err = "garden".parse::<ServiceCategory>().unwrap_err();
        match err {
            FilterError::UnknownValue { expected, .. } => {
                assert!(expected.contains("decor"));
                assert!(expected.contains("other"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_property_wire_format_is_camel_case() {
        let property = Property {
            id: "property-1".to_string(),
            title: "Loft".to_string(),
            description: String::new(),
            price: 550_000.0,
            location: "Chicago, IL".to_string(),
            bedrooms: 1,
            bathrooms: 1.5,
            area: 1200,
            seller_id: "user-4".to_string(),
            images: Vec::new(),
            status: ListingStatus::Available,
            created_at: Utc.with_ymd_and_hms(2023, 3, 25, 0, 0, 0).unwrap(),
            bundled_offers: Vec::new(),
        };
        let json = serde_json::to_value(&property).unwrap();
        assert_eq!(json["sellerId"], "user-4");
        assert_eq!(json["status"], "available");
        assert!(json.get("bundledOffers").is_some());
    }

    #[test]
    fn test_property_without_bundles_deserialises() {
        let json = r#"{
            "id": "p", "title": "t", "description": "d", "price": 1.0,
            "location": "l", "bedrooms": 2, "bathrooms": 1.0, "area": 10,
            "sellerId": "s", "status": "sold", "createdAt": "2023-01-01T00:00:00Z"
        }"#;
        let property: Property = serde_json::from_str(json).unwrap();
        assert_eq!(property.status, ListingStatus::Sold);
        assert!(property.bundled_offers.is_empty());
        assert!(property.images.is_empty());
    }

    #[test]
    fn test_lead_region_is_text_after_last_comma() {
        let lead = Lead {
            id: "lead-1".to_string(),
            requester_id: None,
            property_id: None,
            service_id: None,
            message: String::new(),
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            name: "Sarah".to_string(),
            email: "sarah@example.com".to_string(),
            phone: String::new(),
            location: "San Francisco, CA".to_string(),
            source: String::new(),
            notes: String::new(),
            property_interest: String::new(),
            temperature: LeadTemperature::Hot,
            last_interaction: Utc::now(),
            avatar: None,
        };
        assert_eq!(lead.region(), "CA");
    }
}
