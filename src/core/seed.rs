// EstateHub - core/seed.rs
//
// Built-in demo catalog. Each function returns a fresh copy so callers
// own and may mutate their data without affecting anyone else.

use crate::core::model::{
    AiContent, Communication, CommunicationKind, ContactRequest, ContentType, Lead,
    LeadTemperature, ListingStatus, Property, RequestStatus, Role, ServiceCategory, ServiceOffer,
    User,
};
use chrono::{DateTime, NaiveDate, Utc};

/// Midnight UTC on the given date. Seed dates are literals, so an invalid
/// one is a typo; it falls back to the epoch rather than panicking.
fn day(year: i32, month: u32, date: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, date)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

fn photo(id: &str, w: u32, h: u32) -> String {
    format!("https://images.unsplash.com/photo-{id}?auto=format&w={w}&h={h}&fit=crop")
}

fn user(id: &str, name: &str, email: &str, role: Role, created_at: DateTime<Utc>, avatar: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        created_at,
        avatar: Some(photo(avatar, 200, 200)),
    }
}

/// Demo user directory: two buyers, two sellers, two partners, one admin.
pub fn users() -> Vec<User> {
    vec![
        user("user-1", "John Doe", "john@example.com", Role::Buyer, day(2023, 1, 15), "1568602471122-7832951cc4c5"),
        user("user-2", "Jane Smith", "jane@example.com", Role::Buyer, day(2023, 2, 20), "1494790108377-be9c29b29330"),
        user("user-3", "Robert Johnson", "robert@example.com", Role::Seller, day(2023, 1, 5), "1600486913747-55e5470d6f40"),
        user("user-4", "Emily Davis", "emily@example.com", Role::Seller, day(2023, 3, 10), "1535713875002-d1d0cf377fde"),
        user("user-5", "Michael Wilson", "michael@example.com", Role::Partner, day(2023, 2, 15), "1599566150163-29194dcaad36"),
        user("user-6", "Sarah Brown", "sarah@example.com", Role::Partner, day(2023, 4, 5), "1580489944761-15a19d654956"),
        user("user-7", "Admin User", "admin@example.com", Role::Admin, day(2023, 1, 1), "1472099645785-5658abf4ff4e"),
    ]
}

#[allow(clippy::too_many_arguments)]
fn offer(
    id: &str,
    title: &str,
    description: &str,
    price: f64,
    partner_id: &str,
    partner_name: &str,
    category: ServiceCategory,
    created_at: DateTime<Utc>,
) -> ServiceOffer {
    ServiceOffer {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        price,
        partner_id: partner_id.to_string(),
        partner_name: partner_name.to_string(),
        category,
        created_at,
    }
}

/// Partner services, one per category except `other`.
pub fn service_offers() -> Vec<ServiceOffer> {
    vec![
        offer(
            "offer-1",
            "Premium Interior Decoration",
            "High-end interior decoration service with custom furniture and design.",
            5000.0,
            "user-5",
            "Michael Wilson",
            ServiceCategory::Decor,
            day(2023, 3, 15),
        ),
        offer(
            "offer-2",
            "Professional Moving Service",
            "Full-service moving including packing, transport, and unpacking.",
            2500.0,
            "user-5",
            "Michael Wilson",
            ServiceCategory::Transport,
            day(2023, 3, 20),
        ),
        offer(
            "offer-3",
            "High-Speed Internet Setup",
            "Fiber optic internet installation with premium router and setup.",
            300.0,
            "user-6",
            "Sarah Brown",
            ServiceCategory::Internet,
            day(2023, 4, 10),
        ),
        offer(
            "offer-4",
            "Deep Cleaning Service",
            "Comprehensive cleaning service for move-in ready properties.",
            450.0,
            "user-6",
            "Sarah Brown",
            ServiceCategory::Cleaning,
            day(2023, 4, 15),
        ),
        offer(
            "offer-5",
            "Home Security System",
            "Full security system with cameras, sensors, and 24/7 monitoring.",
            1200.0,
            "user-5",
            "Michael Wilson",
            ServiceCategory::Security,
            day(2023, 3, 25),
        ),
    ]
}

/// Property listings with their bundled partner offers.
pub fn properties() -> Vec<Property> {
    let offers = service_offers();
    let bundle = |indices: &[usize]| -> Vec<ServiceOffer> {
        indices.iter().filter_map(|&i| offers.get(i).cloned()).collect()
    };

    vec![
        Property {
            id: "property-1".to_string(),
            title: "Luxury Penthouse with City View".to_string(),
            description: "Spectacular penthouse apartment with panoramic views of the city skyline. \
                Features high-end finishes, an open floor plan, and a private rooftop terrace."
                .to_string(),
            price: 1_250_000.0,
            location: "123 Skyline Drive, New York, NY".to_string(),
            bedrooms: 3,
            bathrooms: 3.5,
            area: 2500,
            seller_id: "user-3".to_string(),
            images: vec![
                photo("1512917774080-9991f1c4c750", 800, 500),
                photo("1600596542815-ffad4c1539a9", 800, 500),
            ],
            status: ListingStatus::Available,
            created_at: day(2023, 2, 10),
            bundled_offers: bundle(&[0, 2, 4]),
        },
        Property {
            id: "property-2".to_string(),
            title: "Modern Suburban Family Home".to_string(),
            description: "Beautiful family home in a quiet neighborhood featuring modern design, \
                spacious rooms, and a landscaped backyard with a swimming pool."
                .to_string(),
            price: 750_000.0,
            location: "456 Maple Avenue, Austin, TX".to_string(),
            bedrooms: 4,
            bathrooms: 3.0,
            area: 2800,
            seller_id: "user-3".to_string(),
            images: vec![
                photo("1568605114967-8130f3a36994", 800, 500),
                photo("1564013799919-ab600027ffc6", 800, 500),
            ],
            status: ListingStatus::Available,
            created_at: day(2023, 2, 20),
            bundled_offers: bundle(&[1, 3]),
        },
        Property {
            id: "property-3".to_string(),
            title: "Waterfront Cottage Retreat".to_string(),
            description: "Charming cottage situated on a private lake with a dock. Perfect for \
                weekend getaways, featuring rustic interiors, a stone fireplace, and wraparound deck."
                .to_string(),
            price: 450_000.0,
            location: "789 Lakeside Lane, Portland, OR".to_string(),
            bedrooms: 2,
            bathrooms: 2.0,
            area: 1500,
            seller_id: "user-4".to_string(),
            images: vec![
                photo("1564013799919-ab600027ffc6", 800, 500),
                photo("1600585154340-be6161a56a0c", 800, 500),
            ],
            status: ListingStatus::Pending,
            created_at: day(2023, 3, 15),
            bundled_offers: bundle(&[0, 1]),
        },
        Property {
            id: "property-4".to_string(),
            title: "Downtown Loft Apartment".to_string(),
            description: "Industrial-style loft in the heart of downtown, featuring exposed brick \
                walls, high ceilings, and large windows with city views."
                .to_string(),
            price: 550_000.0,
            location: "101 Urban Street, Chicago, IL".to_string(),
            bedrooms: 1,
            bathrooms: 1.5,
            area: 1200,
            seller_id: "user-4".to_string(),
            images: vec![
                photo("1493809842364-78817add7ffb", 800, 500),
                photo("1505691938895-1758d7feb511", 800, 500),
            ],
            status: ListingStatus::Available,
            created_at: day(2023, 3, 25),
            bundled_offers: bundle(&[2, 3, 4]),
        },
        Property {
            id: "property-5".to_string(),
            title: "Spanish-Style Villa with Pool".to_string(),
            description: "Elegant Spanish-style villa with terracotta roof, arched doorways, and a \
                private courtyard featuring a swimming pool and outdoor kitchen."
                .to_string(),
            price: 1_100_000.0,
            location: "222 Sunset Boulevard, Los Angeles, CA".to_string(),
            bedrooms: 5,
            bathrooms: 4.0,
            area: 3200,
            seller_id: "user-3".to_string(),
            images: vec![
                photo("1600596542815-ffad4c1539a9", 800, 500),
                photo("1523217582562-09d0def993a6", 800, 500),
            ],
            status: ListingStatus::Available,
            created_at: day(2023, 4, 5),
            bundled_offers: bundle(&[0, 4]),
        },
    ]
}

fn request(
    id: &str,
    buyer: (&str, &str),
    property_id: &str,
    message: &str,
    status: RequestStatus,
    created_at: DateTime<Utc>,
) -> ContactRequest {
    ContactRequest {
        id: id.to_string(),
        buyer_id: buyer.0.to_string(),
        buyer_name: buyer.1.to_string(),
        property_id: Some(property_id.to_string()),
        service_id: None,
        message: message.to_string(),
        status,
        created_at,
    }
}

/// Buyer contact requests against listings.
pub fn contact_requests() -> Vec<ContactRequest> {
    let john = ("user-1", "John Doe");
    let jane = ("user-2", "Jane Smith");
    vec![
        request(
            "request-1",
            john,
            "property-1",
            "I'm interested in scheduling a viewing for this property. Is it available this weekend?",
            RequestStatus::Pending,
            day(2023, 4, 12),
        ),
        request(
            "request-2",
            jane,
            "property-3",
            "Could you provide more information about the lake access and boat docking options?",
            RequestStatus::Contacted,
            day(2023, 4, 14),
        ),
        request(
            "request-3",
            john,
            "property-5",
            "I'd like to know more about the neighborhood and nearby amenities.",
            RequestStatus::Closed,
            day(2023, 4, 10),
        ),
    ]
}

struct LeadSeed<'a> {
    id: &'a str,
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    temperature: LeadTemperature,
    location: &'a str,
    source: &'a str,
    last_interaction: DateTime<Utc>,
    notes: &'a str,
    property_interest: &'a str,
    created_at: DateTime<Utc>,
    avatar_img: u32,
}

impl LeadSeed<'_> {
    fn build(self) -> Lead {
        Lead {
            id: self.id.to_string(),
            requester_id: None,
            property_id: None,
            service_id: None,
            message: self.notes.to_string(),
            status: RequestStatus::Pending,
            created_at: self.created_at,
            name: self.name.to_string(),
            email: self.email.to_string(),
            phone: self.phone.to_string(),
            location: self.location.to_string(),
            source: self.source.to_string(),
            notes: self.notes.to_string(),
            property_interest: self.property_interest.to_string(),
            temperature: self.temperature,
            last_interaction: self.last_interaction,
            avatar: Some(format!("https://i.pravatar.cc/150?img={}", self.avatar_img)),
        }
    }
}

/// CRM prospects tracked by the admin lead panel.
pub fn leads() -> Vec<Lead> {
    vec![
        LeadSeed {
            id: "lead-1",
            name: "Sarah Johnson",
            email: "sarah.j@example.com",
            phone: "+1-555-123-4567",
            temperature: LeadTemperature::Hot,
            location: "San Francisco, CA",
            source: "Website Inquiry",
            last_interaction: day(2025, 4, 30),
            notes: "Interested in downtown condos, budget around $750k.",
            property_interest: "Condos in Financial District",
            created_at: day(2025, 4, 25),
            avatar_img: 1,
        }
        .build(),
        LeadSeed {
            id: "lead-2",
            name: "Michael Chen",
            email: "michael.c@example.com",
            phone: "+1-555-987-6543",
            temperature: LeadTemperature::Warm,
            location: "New York, NY",
            source: "Referral",
            last_interaction: day(2025, 5, 5),
            notes: "Looking for family home in suburbs, 4-5 bedrooms.",
            property_interest: "Suburban family homes",
            created_at: day(2025, 4, 20),
            avatar_img: 11,
        }
        .build(),
        LeadSeed {
            id: "lead-3",
            name: "Emma Wilson",
            email: "emma.w@example.com",
            phone: "+1-555-456-7890",
            temperature: LeadTemperature::Cold,
            location: "Miami, FL",
            source: "Property Viewing",
            last_interaction: day(2025, 4, 15),
            notes: "Wanted beachfront property but budget might be too low.",
            property_interest: "Beachfront condos",
            created_at: day(2025, 4, 10),
            avatar_img: 5,
        }
        .build(),
        LeadSeed {
            id: "lead-4",
            name: "James Miller",
            email: "james.m@example.com",
            phone: "+1-555-321-6547",
            temperature: LeadTemperature::Hot,
            location: "Austin, TX",
            source: "Open House",
            last_interaction: day(2025, 5, 10),
            notes: "Ready to make an offer on tech corridor property.",
            property_interest: "Modern homes near tech companies",
            created_at: day(2025, 4, 15),
            avatar_img: 13,
        }
        .build(),
        LeadSeed {
            id: "lead-5",
            name: "Olivia Smith",
            email: "olivia.s@example.com",
            phone: "+1-555-789-0123",
            temperature: LeadTemperature::Warm,
            location: "Seattle, WA",
            source: "Facebook Ad",
            last_interaction: day(2025, 5, 1),
            notes: "Wants a modern loft with good walkability score.",
            property_interest: "Urban lofts",
            created_at: day(2025, 4, 18),
            avatar_img: 9,
        }
        .build(),
        LeadSeed {
            id: "lead-6",
            name: "Robert Taylor",
            email: "robert.t@example.com",
            phone: "+1-555-234-5678",
            temperature: LeadTemperature::Cold,
            location: "Chicago, IL",
            source: "Property Listing",
            last_interaction: day(2025, 4, 10),
            notes: "Only looking passively, might be more interested in fall.",
            property_interest: "Historic properties",
            created_at: day(2025, 3, 27),
            avatar_img: 15,
        }
        .build(),
    ]
}

fn comm(id: &str, lead_id: &str, kind: CommunicationKind, date: DateTime<Utc>, content: &str) -> Communication {
    Communication {
        id: id.to_string(),
        lead_id: lead_id.to_string(),
        kind,
        date,
        content: content.to_string(),
    }
}

/// CRM communication history. Only the two most active leads have one.
pub fn communications() -> Vec<Communication> {
    use CommunicationKind::{Call, Email, Meeting};
    vec![
        comm("comm-1", "lead-1", Email, day(2025, 4, 30), "Sent property listings for downtown condos."),
        comm("comm-2", "lead-1", Call, day(2025, 4, 28), "Discussed budget and preferences, scheduled viewing for next week."),
        comm("comm-3", "lead-1", Meeting, day(2025, 4, 25), "Initial consultation, gathered requirements."),
        comm("comm-4", "lead-2", Email, day(2025, 5, 5), "Sent suburban home options within budget."),
        comm("comm-5", "lead-2", Call, day(2025, 4, 22), "Discussed school districts and commute preferences."),
    ]
}

/// Previously generated marketing copy and assistant scripts.
pub fn ai_contents() -> Vec<AiContent> {
    let entry = |id: &str, user_id: &str, content_type, content: &str, created_at| AiContent {
        id: id.to_string(),
        user_id: user_id.to_string(),
        content_type,
        content: content.to_string(),
        created_at,
    };
    vec![
        entry(
            "ai-1",
            "user-3",
            ContentType::Marketing,
            "Discover the height of luxury living in this stunning penthouse with breathtaking \
             panoramic views. Perfect for entertaining or peaceful relaxation, this exceptional \
             property offers the finest in urban lifestyle.",
            day(2023, 4, 1),
        ),
        entry(
            "ai-2",
            "user-4",
            ContentType::Marketing,
            "Escape to your own private waterfront paradise! This charming cottage offers \
             tranquility and natural beauty with modern comforts. Wake up to stunning lake views \
             every morning!",
            day(2023, 4, 5),
        ),
        entry(
            "ai-3",
            "user-5",
            ContentType::Chatbot,
            "Hello! I'm Michael from Premium Interior Decoration. I'd be happy to discuss how we \
             can transform your new home into a personalized sanctuary that reflects your unique \
             style and preferences.",
            day(2023, 4, 8),
        ),
        entry(
            "ai-4",
            "user-6",
            ContentType::Chatbot,
            "Hi there! I'm Sarah from High-Speed Internet Setup. I can help you get connected \
             with the fastest internet in your area, with professional installation and \
             equipment setup.",
            day(2023, 4, 10),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_sizes() {
        assert_eq!(users().len(), 7);
        assert_eq!(service_offers().len(), 5);
        assert_eq!(properties().len(), 5);
        assert_eq!(contact_requests().len(), 3);
        assert_eq!(leads().len(), 6);
        assert_eq!(communications().len(), 5);
        assert_eq!(ai_contents().len(), 4);
    }

    #[test]
    fn test_seed_dates_are_not_epoch() {
        assert!(properties().iter().all(|p| p.created_at > DateTime::<Utc>::default()));
        assert_eq!(day(2023, 2, 30), DateTime::<Utc>::default());
    }

    #[test]
    fn test_bundles_reference_seeded_offers() {
        let offer_ids: Vec<String> = service_offers().into_iter().map(|o| o.id).collect();
        let penthouse = &properties()[0];
        let bundled: Vec<&str> = penthouse.bundled_offers.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(bundled, vec!["offer-1", "offer-3", "offer-5"]);
        for property in properties() {
            for offer in &property.bundled_offers {
                assert!(offer_ids.contains(&offer.id));
            }
        }
    }
}
