// EstateHub - app/store.rs
//
// In-memory marketplace catalog: listings, services, buyer requests,
// CRM leads and generated content. Owned by `AppState`.

use crate::core::dashboard::Catalog;
use crate::core::model::{
    AiContent, BundledOffer, Communication, ContactRequest, ContentType, Lead, Property,
    RequestStatus, Role, ServiceOffer, User,
};
use crate::core::seed;
use crate::util::error::{ContactError, LookupError};
use chrono::Utc;

#[derive(Debug, Clone, Default)]
pub struct Marketplace {
    pub properties: Vec<Property>,
    pub offers: Vec<ServiceOffer>,
    pub requests: Vec<ContactRequest>,
    pub leads: Vec<Lead>,
    pub communications: Vec<Communication>,
    pub ai_contents: Vec<AiContent>,
}

fn find<'a, T>(
    items: &'a [T],
    kind: &'static str,
    id: &str,
    id_of: impl Fn(&T) -> &str,
) -> Result<&'a T, LookupError> {
    items
        .iter()
        .find(|item| id_of(*item) == id)
        .ok_or_else(|| LookupError::NotFound {
            kind,
            id: id.to_string(),
        })
}

impl Marketplace {
    /// The demo catalog.
    pub fn seeded() -> Self {
        Self {
            properties: seed::properties(),
            offers: seed::service_offers(),
            requests: seed::contact_requests(),
            leads: seed::leads(),
            communications: seed::communications(),
            ai_contents: seed::ai_contents(),
        }
    }

    pub fn property(&self, id: &str) -> Result<&Property, LookupError> {
        find(&self.properties, "property", id, |p| p.id.as_str())
    }

    pub fn offer(&self, id: &str) -> Result<&ServiceOffer, LookupError> {
        find(&self.offers, "service", id, |o| o.id.as_str())
    }

    pub fn lead(&self, id: &str) -> Result<&Lead, LookupError> {
        find(&self.leads, "lead", id, |l| l.id.as_str())
    }

    /// Property/offer join rows derived from the embedded bundles.
    pub fn bundle_links(&self) -> Vec<BundledOffer> {
        self.properties
            .iter()
            .flat_map(|p| {
                p.bundled_offers.iter().map(|o| BundledOffer {
                    property_id: p.id.clone(),
                    offer_id: o.id.clone(),
                })
            })
            .collect()
    }

    /// Resolve a property's bundled offers against the current offer list.
    ///
    /// Links to offers that no longer exist are skipped.
    pub fn bundled_offers(&self, property_id: &str) -> Result<Vec<&ServiceOffer>, LookupError> {
        self.property(property_id)?;
        Ok(self
            .bundle_links()
            .into_iter()
            .filter(|link| link.property_id == property_id)
            .filter_map(|link| self.offer(&link.offer_id).ok())
            .collect())
    }

    /// Other listings, newest first.
    pub fn similar_properties(&self, id: &str, limit: usize) -> Vec<&Property> {
        let mut others: Vec<&Property> = self.properties.iter().filter(|p| p.id != id).collect();
        others.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        others.truncate(limit);
        others
    }

    /// Communication log for one lead, newest first.
    pub fn communications_for(&self, lead_id: &str) -> Vec<&Communication> {
        let mut log: Vec<&Communication> = self
            .communications
            .iter()
            .filter(|c| c.lead_id == lead_id)
            .collect();
        log.sort_by(|a, b| b.date.cmp(&a.date));
        log
    }

    /// Store a generated text and return the new record.
    pub fn record_ai_content(
        &mut self,
        user_id: &str,
        content_type: ContentType,
        content: String,
    ) -> &AiContent {
        let id = format!("ai-{}", self.ai_contents.len() + 1);
        tracing::debug!(%id, user_id, content_type = %content_type, "Recording generated content");
        self.ai_contents.push(AiContent {
            id,
            user_id: user_id.to_string(),
            content_type,
            content,
            created_at: Utc::now(),
        });
        &self.ai_contents[self.ai_contents.len() - 1]
    }

    /// Send a buyer's message to the seller of a listing.
    ///
    /// Requires a logged-in buyer and a non-blank message. The new request
    /// starts out pending.
    pub fn send_contact_request(
        &mut self,
        user: Option<&User>,
        property_id: &str,
        message: &str,
    ) -> Result<&ContactRequest, ContactError> {
        self.property(property_id)?;
        let user = user.ok_or(ContactError::LoginRequired)?;
        match user.role {
            Role::Buyer => {}
            Role::Seller | Role::Partner | Role::Admin => {
                return Err(ContactError::BuyerRequired {
                    role: user.role.as_str().to_string(),
                })
            }
        }
        let message = message.trim();
        if message.is_empty() {
            return Err(ContactError::MessageRequired);
        }

        let id = format!("request-{}", self.requests.len() + 1);
        tracing::info!(%id, buyer_id = %user.id, property_id, "Contact request sent");
        self.requests.push(ContactRequest {
            id,
            buyer_id: user.id.clone(),
            buyer_name: user.name.clone(),
            property_id: Some(property_id.to_string()),
            service_id: None,
            message: message.to_string(),
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        });
        Ok(&self.requests[self.requests.len() - 1])
    }

    /// Replace listings and one buyer's requests with a fetched feed.
    pub fn apply_buyer_feed(
        &mut self,
        buyer_id: &str,
        properties: Vec<Property>,
        requests: Vec<ContactRequest>,
    ) {
        self.properties = properties;
        self.requests.retain(|r| r.buyer_id != buyer_id);
        self.requests.extend(requests);
    }

    /// Borrowed view for dashboard computation.
    pub fn catalog<'a>(&'a self, users: &'a [User]) -> Catalog<'a> {
        Catalog {
            users,
            properties: &self.properties,
            offers: &self.offers,
            requests: &self.requests,
            ai_contents: &self.ai_contents,
        }
    }
}
