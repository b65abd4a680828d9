// EstateHub - core/dashboard.rs
//
// Role dashboards computed over a borrowed view of the catalog.

use crate::core::model::{AiContent, ContactRequest, ContentType, Property, Role, ServiceOffer, User};
use crate::util::constants::{
    ADMIN_LATEST_LISTINGS, ADMIN_LATEST_USERS, BUYER_RECENT_PROPERTIES,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Borrowed view of everything a dashboard may summarise.
#[derive(Debug, Clone, Copy)]
pub struct Catalog<'a> {
    pub users: &'a [User],
    pub properties: &'a [Property],
    pub offers: &'a [ServiceOffer],
    pub requests: &'a [ContactRequest],
    pub ai_contents: &'a [AiContent],
}

/// Marketplace-wide counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub total_users: usize,
    /// One entry per role, in `Role::all()` order.
    pub users_by_role: Vec<(Role, usize)>,
    pub total_properties: usize,
    pub total_offers: usize,
    pub total_requests: usize,
    pub total_ai_content: usize,
}

impl Stats {
    pub fn compute(catalog: &Catalog<'_>) -> Self {
        let users_by_role = Role::all()
            .iter()
            .map(|&role| (role, catalog.users.iter().filter(|u| u.role == role).count()))
            .collect();
        Self {
            total_users: catalog.users.len(),
            users_by_role,
            total_properties: catalog.properties.len(),
            total_offers: catalog.offers.len(),
            total_requests: catalog.requests.len(),
            total_ai_content: catalog.ai_contents.len(),
        }
    }
}

/// How much one user has used content generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiUsage {
    pub user_id: String,
    pub user_name: String,
    pub count: usize,
    pub last_used: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminOverview {
    pub stats: Stats,
    pub latest_users: Vec<User>,
    pub latest_properties: Vec<Property>,
    pub latest_offers: Vec<ServiceOffer>,
    /// Users with at least one generated item, busiest first.
    pub ai_usage: Vec<AiUsage>,
    pub total_property_value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SellerOverview {
    pub seller: User,
    pub properties: Vec<Property>,
    /// Contact requests on this seller's listings.
    pub requests: Vec<ContactRequest>,
    pub marketing: Vec<AiContent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PartnerOverview {
    pub partner: User,
    pub services: Vec<ServiceOffer>,
    /// Listings that bundle at least one of this partner's services.
    pub bundling_properties: Vec<Property>,
    pub scripts: Vec<AiContent>,
    /// Sum of this partner's bundled offer prices across all listings.
    pub potential_revenue: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuyerOverview {
    pub buyer: User,
    pub recent_properties: Vec<Property>,
    pub requests: Vec<ContactRequest>,
}

/// The dashboard a user lands on, chosen by role.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Dashboard {
    Buyer(BuyerOverview),
    Seller(SellerOverview),
    Partner(PartnerOverview),
    Admin(AdminOverview),
}

impl Dashboard {
    pub fn for_user(user: &User, catalog: &Catalog<'_>) -> Self {
        match user.role {
            Role::Buyer => Self::Buyer(buyer_overview(user, catalog)),
            Role::Seller => Self::Seller(seller_overview(user, catalog)),
            Role::Partner => Self::Partner(partner_overview(user, catalog)),
            Role::Admin => Self::Admin(admin_overview(catalog)),
        }
    }
}

/// Clone `items` newest first and keep at most `limit`.
fn latest<T: Clone>(items: &[T], limit: usize, created: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by(|a, b| created(*b).cmp(&created(*a)));
    sorted.into_iter().take(limit).cloned().collect()
}

pub fn admin_overview(catalog: &Catalog<'_>) -> AdminOverview {
    let mut ai_usage: Vec<AiUsage> = Vec::new();
    for content in catalog.ai_contents {
        match ai_usage.iter_mut().find(|u| u.user_id == content.user_id) {
            Some(usage) => {
                usage.count += 1;
                usage.last_used = usage.last_used.max(content.created_at);
            }
            None => {
                let user_name = catalog
                    .users
                    .iter()
                    .find(|u| u.id == content.user_id)
                    .map_or_else(|| content.user_id.clone(), |u| u.name.clone());
                ai_usage.push(AiUsage {
                    user_id: content.user_id.clone(),
                    user_name,
                    count: 1,
                    last_used: content.created_at,
                });
            }
        }
    }
    ai_usage.sort_by(|a, b| b.count.cmp(&a.count).then(b.last_used.cmp(&a.last_used)));

    AdminOverview {
        stats: Stats::compute(catalog),
        latest_users: latest(catalog.users, ADMIN_LATEST_USERS, |u| u.created_at),
        latest_properties: latest(catalog.properties, ADMIN_LATEST_LISTINGS, |p| p.created_at),
        latest_offers: latest(catalog.offers, ADMIN_LATEST_LISTINGS, |o| o.created_at),
        ai_usage,
        total_property_value: catalog.properties.iter().map(|p| p.price).sum(),
    }
}

fn content_of(catalog: &Catalog<'_>, user_id: &str, kind: ContentType) -> Vec<AiContent> {
    catalog
        .ai_contents
        .iter()
        .filter(|c| c.user_id == user_id && c.content_type == kind)
        .cloned()
        .collect()
}

pub fn seller_overview(seller: &User, catalog: &Catalog<'_>) -> SellerOverview {
    let properties: Vec<Property> = catalog
        .properties
        .iter()
        .filter(|p| p.seller_id == seller.id)
        .cloned()
        .collect();
    let requests = catalog
        .requests
        .iter()
        .filter(|r| {
            r.property_id
                .as_deref()
                .is_some_and(|pid| properties.iter().any(|p| p.id == pid))
        })
        .cloned()
        .collect();
    SellerOverview {
        seller: seller.clone(),
        properties,
        requests,
        marketing: content_of(catalog, &seller.id, ContentType::Marketing),
    }
}

pub fn partner_overview(partner: &User, catalog: &Catalog<'_>) -> PartnerOverview {
    let services = catalog
        .offers
        .iter()
        .filter(|o| o.partner_id == partner.id)
        .cloned()
        .collect();

    let mut bundling_properties = Vec::new();
    let mut potential_revenue = 0.0;
    for property in catalog.properties {
        let mine: f64 = property
            .bundled_offers
            .iter()
            .filter(|o| o.partner_id == partner.id)
            .map(|o| o.price)
            .sum();
        if property.bundled_offers.iter().any(|o| o.partner_id == partner.id) {
            bundling_properties.push(property.clone());
            potential_revenue += mine;
        }
    }

    PartnerOverview {
        partner: partner.clone(),
        services,
        bundling_properties,
        scripts: content_of(catalog, &partner.id, ContentType::Chatbot),
        potential_revenue,
    }
}

pub fn buyer_overview(buyer: &User, catalog: &Catalog<'_>) -> BuyerOverview {
    BuyerOverview {
        buyer: buyer.clone(),
        recent_properties: latest(catalog.properties, BUYER_RECENT_PROPERTIES, |p| p.created_at),
        requests: catalog
            .requests
            .iter()
            .filter(|r| r.buyer_id == buyer.id)
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::seed;

    struct Fixture {
        users: Vec<User>,
        properties: Vec<Property>,
        offers: Vec<ServiceOffer>,
        requests: Vec<ContactRequest>,
        ai: Vec<AiContent>,
    }

    impl Fixture {
        fn seeded() -> Self {
            Self {
                users: seed::users(),
                properties: seed::properties(),
                offers: seed::service_offers(),
                requests: seed::contact_requests(),
                ai: seed::ai_contents(),
            }
        }

        fn catalog(&self) -> Catalog<'_> {
            Catalog {
                users: &self.users,
                properties: &self.properties,
                offers: &self.offers,
                requests: &self.requests,
                ai_contents: &self.ai,
            }
        }

        fn user(&self, id: &str) -> &User {
            self.users.iter().find(|u| u.id == id).expect("seeded user")
        }
    }

    #[test]
    fn test_admin_overview_totals() {
        let fx = Fixture::seeded();
        let overview = admin_overview(&fx.catalog());
        assert_eq!(overview.stats.total_users, 7);
        assert_eq!(
            overview.stats.users_by_role,
            vec![(Role::Buyer, 2), (Role::Seller, 2), (Role::Partner, 2), (Role::Admin, 1)]
        );
        assert_eq!(overview.latest_users.len(), ADMIN_LATEST_USERS);
        assert_eq!(overview.latest_users[0].id, "user-6");
        assert_eq!(overview.latest_properties[0].id, "property-5");
        assert_eq!(overview.ai_usage.len(), 4);
        assert!((overview.total_property_value - 4_100_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_seller_sees_requests_on_own_listings() {
        let fx = Fixture::seeded();
        let overview = seller_overview(fx.user("user-3"), &fx.catalog());
        assert_eq!(overview.properties.len(), 3);
        let ids: Vec<&str> = overview.requests.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["request-1", "request-3"]);
        assert_eq!(overview.marketing.len(), 1);
    }

    #[test]
    fn test_partner_potential_revenue() {
        let fx = Fixture::seeded();
        let overview = partner_overview(fx.user("user-6"), &fx.catalog());
        assert_eq!(overview.services.len(), 2);
        let ids: Vec<&str> = overview.bundling_properties.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["property-1", "property-2", "property-4"]);
        assert!((overview.potential_revenue - 1_500.0).abs() < f64::EPSILON);
        assert_eq!(overview.scripts.len(), 1);
    }

    #[test]
    fn test_dashboard_picked_by_role() {
        let fx = Fixture::seeded();
        let catalog = fx.catalog();
        match Dashboard::for_user(fx.user("user-1"), &catalog) {
            Dashboard::Buyer(b) => {
                let ids: Vec<&str> = b.recent_properties.iter().map(|p| p.id.as_str()).collect();
                assert_eq!(ids, vec!["property-5", "property-4", "property-3"]);
                assert_eq!(b.requests.len(), 2);
            }
            other => panic!("expected buyer dashboard, got {other:?}"),
        }
        assert!(matches!(
            Dashboard::for_user(fx.user("user-7"), &catalog),
            Dashboard::Admin(_)
        ));
    }
}
