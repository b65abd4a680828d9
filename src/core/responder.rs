// EstateHub - core/responder.rs
//
// Scripted keyword responder for the PropertyBot chat widget.
//
// Replies depend only on the utterance and the injected RNG. There is no
// dialogue state; the message log is kept by the chat session for display.

use crate::core::filter::{
    filter_and_sort, PropertyCriteria, Selection, ServiceCriteria, SortKey,
};
use crate::core::model::{ListingStatus, Property, ServiceCategory, ServiceOffer};
use crate::util::constants::{FEATURED_CARD_COUNT, SERVICE_CARD_COUNT};
use rand::Rng;
use serde::Serialize;

const WELCOME_TEXT: &str =
    "Hi there! I'm PropertyBot. How can I help you find your dream property today?";
const FEATURED_TEXT: &str = "Here are some of our featured properties that might interest you:";
const LOCATION_TEXT: &str =
    "I can help you find properties in specific locations. Which city are you interested in?";
const SERVICES_TEXT: &str = "We offer various services to help with your property journey:";
const PRICE_TEXT: &str =
    "I can help you find properties within your budget. What price range are you looking for?";

/// Text-only replies for utterances that match no keyword group.
pub const FALLBACK_REPLIES: [&str; 5] = [
    "I can help you find properties that match your criteria. Would you like to see some featured listings?",
    "That's a great area to look in! We have several properties available there.",
    "The average price in that neighborhood is around $450,000. Would you like me to show you some options?",
    "I recommend booking a viewing for that property. Would you like me to help schedule one?",
    "You might be interested in our newest listings. They match what you're looking for.",
];

/// What a keyword group asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Featured,
    Location,
    Services,
    Price,
}

/// Keyword groups in match order. The first group with a hit wins.
const KEYWORD_GROUPS: [(Intent, &[&str]); 4] = [
    (Intent::Featured, &["featured", "show"]),
    (Intent::Location, &["location", "where", "area"]),
    (Intent::Services, &["service", "offer"]),
    (Intent::Price, &["price", "cost", "budget"]),
];

/// Canned user utterances for the known action ids.
const ACTION_UTTERANCES: [(&str, &str); 11] = [
    ("featured", "Show me featured properties"),
    ("location", "I want to find properties by location"),
    ("services", "What services do you offer?"),
    ("location-newyork", "Show me properties in New York"),
    ("location-la", "Show me properties in Los Angeles"),
    ("location-chicago", "Show me properties in Chicago"),
    ("location-miami", "Show me properties in Miami"),
    ("price-low", "I'm looking for properties under $300,000"),
    ("price-medium", "I'm looking for properties between $300,000 and $600,000"),
    ("price-high", "I'm looking for properties between $600,000 and $1,000,000"),
    ("price-luxury", "I'm looking for luxury properties over $1,000,000"),
];

/// A quick-reply button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestedAction {
    pub label: String,
    pub action_id: String,
}

impl SuggestedAction {
    fn new(label: &str, action_id: &str) -> Self {
        Self {
            label: label.to_string(),
            action_id: action_id.to_string(),
        }
    }
}

/// Compact listing summary embedded in a reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyCard {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub location: String,
    pub image: Option<String>,
}

impl From<&Property> for PropertyCard {
    fn from(p: &Property) -> Self {
        Self {
            id: p.id.clone(),
            title: p.title.clone(),
            price: p.price,
            location: p.location.clone(),
            image: p.images.first().cloned(),
        }
    }
}

/// Compact service summary embedded in a reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceCard {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub category: ServiceCategory,
    pub partner_name: String,
}

impl From<&ServiceOffer> for ServiceCard {
    fn from(o: &ServiceOffer) -> Self {
        Self {
            id: o.id.clone(),
            title: o.title.clone(),
            price: o.price,
            category: o.category,
            partner_name: o.partner_name.clone(),
        }
    }
}

/// A bot reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Reply {
    Text {
        text: String,
    },
    PropertyCards {
        text: String,
        cards: Vec<PropertyCard>,
        actions: Vec<SuggestedAction>,
    },
    ServiceCards {
        text: String,
        cards: Vec<ServiceCard>,
    },
    Suggestions {
        text: String,
        actions: Vec<SuggestedAction>,
    },
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Self::Text { text }
            | Self::PropertyCards { text, .. }
            | Self::ServiceCards { text, .. }
            | Self::Suggestions { text, .. } => text,
        }
    }

    pub fn actions(&self) -> &[SuggestedAction] {
        match self {
            Self::PropertyCards { actions, .. } | Self::Suggestions { actions, .. } => actions,
            Self::Text { .. } | Self::ServiceCards { .. } => &[],
        }
    }

    pub fn has_cards(&self) -> bool {
        matches!(self, Self::PropertyCards { .. } | Self::ServiceCards { .. })
    }
}

/// Classify an utterance by the first keyword group it hits.
pub fn classify(utterance: &str) -> Option<Intent> {
    let lowered = utterance.to_lowercase();
    KEYWORD_GROUPS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(intent, _)| *intent)
}

/// The canned utterance an action button sends. Unknown ids echo back.
pub fn utterance_for_action(action_id: &str) -> String {
    ACTION_UTTERANCES
        .iter()
        .find(|(id, _)| *id == action_id)
        .map_or_else(|| action_id.to_string(), |(_, text)| (*text).to_string())
}

/// Keyword responder with its reply cards prepared up front.
#[derive(Debug, Clone)]
pub struct Responder {
    featured: Vec<PropertyCard>,
    services: Vec<ServiceCard>,
}

impl Responder {
    /// Build the card sets from the catalog: the latest available listings
    /// and the latest service offers.
    pub fn from_catalog(properties: &[Property], offers: &[ServiceOffer]) -> Self {
        let available = PropertyCriteria {
            status: Selection::Only(ListingStatus::Available),
            ..PropertyCriteria::default()
        };
        let featured = filter_and_sort(properties, &available, SortKey::Latest)
            .into_iter()
            .take(FEATURED_CARD_COUNT)
            .map(PropertyCard::from)
            .collect();
        let services = filter_and_sort(offers, &ServiceCriteria::default(), SortKey::Latest)
            .into_iter()
            .take(SERVICE_CARD_COUNT)
            .map(ServiceCard::from)
            .collect();
        Self { featured, services }
    }

    /// Opening message shown when the chat starts.
    pub fn welcome(&self) -> Reply {
        Reply::Suggestions {
            text: WELCOME_TEXT.to_string(),
            actions: vec![
                SuggestedAction::new("Show me featured properties", "featured"),
                SuggestedAction::new("Find properties by location", "location"),
                SuggestedAction::new("What services do you offer?", "services"),
            ],
        }
    }

    pub fn respond<R: Rng + ?Sized>(&self, utterance: &str, rng: &mut R) -> Reply {
        match classify(utterance) {
            Some(Intent::Featured) => Reply::PropertyCards {
                text: FEATURED_TEXT.to_string(),
                cards: self.featured.clone(),
                actions: vec![
                    SuggestedAction::new("View all properties", "view-all"),
                    SuggestedAction::new("Filter by price", "filter-price"),
                ],
            },
            Some(Intent::Location) => Reply::Suggestions {
                text: LOCATION_TEXT.to_string(),
                actions: vec![
                    SuggestedAction::new("New York", "location-newyork"),
                    SuggestedAction::new("Los Angeles", "location-la"),
                    SuggestedAction::new("Chicago", "location-chicago"),
                    SuggestedAction::new("Miami", "location-miami"),
                    SuggestedAction::new("Other location", "location-other"),
                ],
            },
            Some(Intent::Services) => Reply::ServiceCards {
                text: SERVICES_TEXT.to_string(),
                cards: self.services.clone(),
            },
            Some(Intent::Price) => Reply::Suggestions {
                text: PRICE_TEXT.to_string(),
                actions: vec![
                    SuggestedAction::new("Under $300,000", "price-low"),
                    SuggestedAction::new("$300,000 - $600,000", "price-medium"),
                    SuggestedAction::new("$600,000 - $1,000,000", "price-high"),
                    SuggestedAction::new("Over $1,000,000", "price-luxury"),
                ],
            },
            None => {
                let pick = rng.gen_range(0..FALLBACK_REPLIES.len());
                Reply::Text {
                    text: FALLBACK_REPLIES[pick].to_string(),
                }
            }
        }
    }

    /// Respond to an action button press.
    pub fn respond_to_action<R: Rng + ?Sized>(&self, action_id: &str, rng: &mut R) -> Reply {
        self.respond(&utterance_for_action(action_id), rng)
    }
}
