// EstateHub - tests/e2e_marketplace.rs
//
// End-to-end tests over the public library surface: seed catalog,
// filter-sort engine, session store with real on-disk persistence,
// scripted responder, chat delivery and export.

use chrono::{TimeZone, Utc};
use estatehub::app::session::{session_path, NewUser, SessionStore};
use estatehub::app::state::AppState;
use estatehub::app::store::Marketplace;
use estatehub::core::export::export_csv;
use estatehub::core::filter::{
    filter_and_sort, LeadCriteria, PriceRange, PropertyCriteria, Selection, ServiceCriteria,
    SortKey,
};
use estatehub::core::model::{ListingStatus, Property, Role};
use estatehub::core::responder::{Reply, Responder, FALLBACK_REPLIES};
use estatehub::core::seed;
use estatehub::platform::config::AppConfig;
use estatehub::util::error::SessionError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

fn listing(id: &str, price: f64, day: u32) -> Property {
    Property {
        id: id.to_string(),
        title: format!("Listing {id}"),
        description: "A home".to_string(),
        price,
        location: "1 Main Street, Springfield, IL".to_string(),
        bedrooms: 2,
        bathrooms: 1.0,
        area: 1000,
        seller_id: "user-3".to_string(),
        images: Vec::new(),
        status: ListingStatus::Available,
        created_at: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
        bundled_offers: Vec::new(),
    }
}

fn ids<T, F: Fn(&T) -> &str>(items: &[&T], id: F) -> Vec<String> {
    items.iter().map(|item| id(item).to_string()).collect()
}

// =============================================================================
// Filter-sort engine
// =============================================================================

/// "all" sentinels keep every item; with tied sort keys the original order holds.
#[test]
fn e2e_all_sentinel_returns_full_set_in_stable_order() {
    let leads = seed::leads();
    let criteria = LeadCriteria {
        status: Selection::parse("all").unwrap(),
        temperature: Selection::parse("ALL").unwrap(),
        location: LeadCriteria::location_filter("all"),
        ..LeadCriteria::default()
    };
    // Leads carry no price, so every price comparison is a tie.
    let result = filter_and_sort(&leads, &criteria, SortKey::PriceAsc);
    let expected: Vec<&_> = leads.iter().collect();
    assert_eq!(result, expected);

    let offers = seed::service_offers();
    let all_offers = filter_and_sort(&offers, &ServiceCriteria::default(), SortKey::PriceAsc);
    assert_eq!(all_offers.len(), offers.len());
}

#[test]
fn e2e_inverted_price_range_is_empty() {
    let properties = seed::properties();
    for (lo, hi) in [(500_000.0, 400_000.0), (1.0, 0.0), (2_000_000.0, 0.0)] {
        let criteria = PropertyCriteria {
            price: Some(PriceRange::new(lo, hi)),
            ..PropertyCriteria::default()
        };
        assert!(filter_and_sort(&properties, &criteria, SortKey::Latest).is_empty());
    }
}

#[test]
fn e2e_latest_sort_is_idempotent() {
    let properties = seed::properties();
    let once = filter_and_sort(&properties, &PropertyCriteria::default(), SortKey::Latest);
    let owned: Vec<Property> = once.iter().map(|p| (*p).clone()).collect();
    let twice = filter_and_sort(&owned, &PropertyCriteria::default(), SortKey::Latest);
    assert_eq!(
        ids(&once, |p: &Property| p.id.as_str()),
        ids(&twice, |p: &Property| p.id.as_str())
    );
}

/// Two listings at 300k and 900k; [0, 500k] keeps only the first.
#[test]
fn e2e_price_range_selects_cheaper_listing() {
    let properties = vec![listing("cheap", 300_000.0, 1), listing("dear", 900_000.0, 2)];
    let criteria = PropertyCriteria {
        price: Some(PriceRange::new(0.0, 500_000.0)),
        ..PropertyCriteria::default()
    };
    let result = filter_and_sort(&properties, &criteria, SortKey::Latest);
    assert_eq!(ids(&result, |p: &Property| p.id.as_str()), vec!["cheap"]);
}

#[test]
fn e2e_listing_view_through_app_state() {
    let config = AppConfig {
        page_size: 2,
        ..AppConfig::default()
    };
    let mut state = AppState::new(config, Marketplace::seeded(), SessionStore::seeded(None));
    state.set_property_filters(
        PropertyCriteria {
            bedrooms: "3".parse().unwrap(),
            ..PropertyCriteria::default()
        },
        SortKey::PriceDesc,
    );
    let page = state.property_page();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, "property-1");
}

// =============================================================================
// Session store
// =============================================================================

#[test]
fn e2e_login_is_case_insensitive() {
    let mut store = SessionStore::seeded(None);
    let shouted = store.login("JOHN@EXAMPLE.COM", "pw").unwrap();
    let plain = store.login("john@example.com", "pw").unwrap();
    assert_eq!(shouted, plain);
}

#[test]
fn e2e_duplicate_registration_does_not_mutate_users() {
    let mut store = SessionStore::seeded(None);
    let before = store.users().len();
    let result = store.register(NewUser {
        name: "Another John".to_string(),
        email: "john@EXAMPLE.com".to_string(),
        password: "pw".to_string(),
        role: Role::Buyer,
    });
    assert!(matches!(result, Err(SessionError::DuplicateEmail { .. })));
    assert_eq!(store.users().len(), before);
}

#[test]
fn e2e_session_persists_across_restarts() {
    let dir = TempDir::new().unwrap();
    let path = session_path(dir.path());

    let mut first = SessionStore::seeded(Some(path.clone()));
    first.login("sarah@example.com", "pw").unwrap();
    drop(first);

    let mut second = SessionStore::seeded(Some(path.clone()));
    let restored = second.restore().cloned().expect("session restored");
    assert_eq!(restored.id, "user-6");
    second.logout().unwrap();

    let mut third = SessionStore::seeded(Some(path));
    assert!(third.restore().is_none());
}

#[test]
fn e2e_corrupt_session_file_starts_logged_out() {
    let dir = TempDir::new().unwrap();
    let path = session_path(dir.path());
    std::fs::write(&path, "{\"version\": 1, \"user\": 42}").unwrap();
    let mut store = SessionStore::seeded(Some(path));
    assert!(store.restore().is_none());
    assert!(store.current_user().is_none());
}

// =============================================================================
// Responder and chat
// =============================================================================

#[test]
fn e2e_responder_featured_and_fallback() {
    let responder = Responder::from_catalog(&seed::properties(), &seed::service_offers());
    let mut rng = StdRng::seed_from_u64(21);

    let featured = responder.respond("anything featured?", &mut rng);
    assert!(matches!(featured, Reply::PropertyCards { ref cards, .. } if !cards.is_empty()));

    let fallback = responder.respond("zzz", &mut rng);
    assert!(matches!(fallback, Reply::Text { .. }));
    assert!(FALLBACK_REPLIES.contains(&fallback.text()));
}

#[test]
fn e2e_chat_reply_is_delivered_then_teardown_discards() {
    let config = AppConfig {
        reply_delay_min_ms: 0,
        reply_delay_max_ms: 0,
        ..AppConfig::default()
    };
    let state = AppState::new(config, Marketplace::seeded(), SessionStore::seeded(None));
    let mut chat = state.open_chat(Some(1));
    chat.send("what's the price?");
    assert!(chat.wait_for_reply(Duration::from_secs(2)).is_some());
    assert_eq!(chat.messages().len(), 3);

    let slow = AppConfig {
        reply_delay_min_ms: 200,
        reply_delay_max_ms: 200,
        ..AppConfig::default()
    };
    let state = AppState::new(slow, Marketplace::seeded(), SessionStore::seeded(None));
    let mut chat = state.open_chat(Some(1));
    chat.send("show me homes");
    chat.close();
    std::thread::sleep(Duration::from_millis(400));
    assert_eq!(chat.poll(), 0);
    assert!(chat.messages().iter().filter(|m| m.is_bot()).count() == 1);
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn e2e_export_filtered_leads_to_csv_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hot_leads.csv");
    let leads = seed::leads();
    let criteria = LeadCriteria {
        temperature: Selection::parse("hot").unwrap(),
        ..LeadCriteria::default()
    };
    let rows = filter_and_sort(&leads, &criteria, SortKey::Latest);

    let file = std::fs::File::create(&path).unwrap();
    let count = export_csv(&rows, file, &path).unwrap();
    assert_eq!(count, 2);

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written.lines().count(), 3);
    // Latest first: Sarah Johnson (Apr 25) before James Miller (Apr 15).
    let sarah = written.find("Sarah Johnson").unwrap();
    let james = written.find("James Miller").unwrap();
    assert!(sarah < james);
}
