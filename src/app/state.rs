// EstateHub - app/state.rs
//
// Application state: the composition root. Owns the configuration, the
// catalog, the session store and the listing view, and hands out
// references instead of relying on ambient globals.

use crate::app::chat::ChatSession;
use crate::app::session::SessionStore;
use crate::app::store::Marketplace;
use crate::core::content;
use crate::core::dashboard::Dashboard;
use crate::core::filter::{self, Page, PriceRange, PropertyCriteria, SortKey};
use crate::core::model::{ContactRequest, ContentType, Property};
use crate::core::responder::Responder;
use crate::platform::api::ApiClient;
use crate::platform::config::AppConfig;
use crate::util::error::{ApiError, ContactError, LookupError};
use rand::Rng;

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    pub config: AppConfig,
    pub market: Marketplace,
    pub sessions: SessionStore,

    /// Current listing filters.
    pub criteria: PropertyCriteria,

    /// Current listing order.
    pub sort: SortKey,

    /// 1-based page of the listing view.
    pub page: usize,

    /// Indices into `market.properties` matching the current filters.
    pub filtered_indices: Vec<usize>,

    /// Price bounds spanning the whole catalog (the slider's default range).
    pub price_bounds: Option<PriceRange>,
}

impl AppState {
    pub fn new(config: AppConfig, market: Marketplace, sessions: SessionStore) -> Self {
        let mut state = Self {
            config,
            market,
            sessions,
            criteria: PropertyCriteria::default(),
            sort: SortKey::default(),
            page: 1,
            filtered_indices: Vec::new(),
            price_bounds: None,
        };
        state.apply_property_filters();
        state
    }

    /// Recompute the listing view from the current criteria and sort.
    pub fn apply_property_filters(&mut self) {
        self.price_bounds = PriceRange::spanning(&self.market.properties);
        self.filtered_indices =
            filter::filter_indices(&self.market.properties, &self.criteria, self.sort);
        self.reset_page_if_out_of_range();
        tracing::debug!(
            matches = self.filtered_indices.len(),
            sort = self.sort.as_str(),
            "Property filters applied"
        );
    }

    /// Replace the criteria and sort, returning to the first page.
    pub fn set_property_filters(&mut self, criteria: PropertyCriteria, sort: SortKey) {
        self.criteria = criteria;
        self.sort = sort;
        self.page = 1;
        self.apply_property_filters();
    }

    /// Jump to a 1-based page. A page past the end goes back to page 1.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
        self.reset_page_if_out_of_range();
    }

    fn reset_page_if_out_of_range(&mut self) {
        let total_pages = self
            .filtered_indices
            .len()
            .div_ceil(self.config.page_size.max(1))
            .max(1);
        if self.page > total_pages {
            self.page = 1;
        }
    }

    pub fn filtered_properties(&self) -> Vec<&Property> {
        self.filtered_indices
            .iter()
            .filter_map(|&idx| self.market.properties.get(idx))
            .collect()
    }

    /// The current page of the listing view.
    pub fn property_page(&self) -> Page<'_, Property> {
        filter::paginate(&self.filtered_properties(), self.page, self.config.page_size)
    }

    /// Labels for the active listing filters.
    pub fn active_filter_labels(&self) -> Vec<String> {
        self.criteria.active_labels(self.price_bounds)
    }

    /// Dashboard for the logged-in user, if any.
    pub fn dashboard(&self) -> Option<Dashboard> {
        let user = self.sessions.current_user()?;
        Some(Dashboard::for_user(
            user,
            &self.market.catalog(self.sessions.users()),
        ))
    }

    /// Start a chat wired to the current catalog and configured delays.
    pub fn open_chat(&self, seed: Option<u64>) -> ChatSession {
        let responder = Responder::from_catalog(&self.market.properties, &self.market.offers);
        ChatSession::new(
            responder,
            self.config.reply_delay_min_ms,
            self.config.reply_delay_max_ms,
            seed,
        )
    }

    /// Send a contact request as the logged-in user.
    pub fn send_contact_request(
        &mut self,
        property_id: &str,
        message: &str,
    ) -> Result<&ContactRequest, ContactError> {
        let user = self.sessions.current_user();
        self.market.send_contact_request(user, property_id, message)
    }

    /// Generate listing copy for a property.
    ///
    /// The text is recorded against the logged-in user when there is one.
    pub fn generate_marketing<R: Rng + ?Sized>(
        &mut self,
        property_id: &str,
        rng: &mut R,
    ) -> Result<String, LookupError> {
        let text = content::marketing_copy(self.market.property(property_id)?, rng);
        self.record_generated(ContentType::Marketing, &text);
        Ok(text)
    }

    /// Generate an assistant greeting script for a service offer.
    pub fn generate_chatbot<R: Rng + ?Sized>(
        &mut self,
        offer_id: &str,
        rng: &mut R,
    ) -> Result<String, LookupError> {
        let text = content::chatbot_script(self.market.offer(offer_id)?, rng);
        self.record_generated(ContentType::Chatbot, &text);
        Ok(text)
    }

    fn record_generated(&mut self, content_type: ContentType, text: &str) {
        if let Some(user) = self.sessions.current_user() {
            let user_id = user.id.clone();
            self.market
                .record_ai_content(&user_id, content_type, text.to_string());
        }
    }

    /// Fetch listings and the buyer's requests together and apply them.
    ///
    /// On failure the previous catalog is kept untouched and the error is
    /// logged and returned for the caller to show as a notice.
    pub async fn refresh_buyer_feed(
        &mut self,
        api: &ApiClient,
        buyer_id: &str,
    ) -> Result<(), ApiError> {
        match api.fetch_buyer_feed(buyer_id).await {
            Ok(feed) => {
                self.market
                    .apply_buyer_feed(buyer_id, feed.properties, feed.requests);
                self.apply_property_filters();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, buyer_id, "Buyer feed refresh failed, keeping previous data");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::{BedroomFilter, TextQuery};
    use crate::core::model::Role;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded_state(page_size: usize) -> AppState {
        let config = AppConfig {
            page_size,
            ..AppConfig::default()
        };
        AppState::new(config, Marketplace::seeded(), SessionStore::seeded(None))
    }

    #[test]
    fn test_initial_view_is_latest_first() {
        let state = seeded_state(2);
        let page = state.property_page();
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
        let ids: Vec<&str> = page.items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["property-5", "property-4"]);
        assert!(state.active_filter_labels().is_empty());
    }

    #[test]
    fn test_set_filters_resets_page() {
        let mut state = seeded_state(1);
        state.page = 4;
        state.set_property_filters(
            PropertyCriteria {
                search: TextQuery::new("villa"),
                bedrooms: BedroomFilter::AtLeast(4),
                ..PropertyCriteria::default()
            },
            SortKey::PriceAsc,
        );
        assert_eq!(state.page, 1);
        let ids: Vec<&str> = state.filtered_properties().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["property-5"]);
        assert_eq!(state.active_filter_labels().len(), 2);
    }

    #[test]
    fn test_set_page_past_end_returns_to_first_page() {
        let mut state = seeded_state(2);
        state.set_page(2);
        assert_eq!(state.property_page().items[0].id, "property-3");

        state.set_page(9);
        assert_eq!(state.page, 1);
        let page = state.property_page();
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 2);
    }

    #[test]
    fn test_dashboard_requires_login() {
        let mut state = seeded_state(9);
        assert!(state.dashboard().is_none());
        state.sessions.login("robert@example.com", "pw").unwrap();
        assert!(matches!(state.dashboard(), Some(Dashboard::Seller(_))));
        assert_eq!(state.sessions.current_user().map(|u| u.role), Some(Role::Seller));
    }

    #[test]
    fn test_contact_request_uses_logged_in_user() {
        let mut state = seeded_state(9);
        assert_eq!(
            state.send_contact_request("property-2", "Hello"),
            Err(ContactError::LoginRequired)
        );
        state.sessions.login("jane@example.com", "pw").unwrap();
        let request = state.send_contact_request("property-2", "Hello").unwrap();
        assert_eq!(request.buyer_id, "user-2");
    }

    #[test]
    fn test_generated_copy_is_recorded_for_user() {
        let mut state = seeded_state(9);
        let mut rng = StdRng::seed_from_u64(2);
        state.generate_marketing("property-1", &mut rng).unwrap();
        assert_eq!(state.market.ai_contents.len(), 4, "logged out: nothing recorded");

        state.sessions.login("emily@example.com", "pw").unwrap();
        state.generate_marketing("property-3", &mut rng).unwrap();
        assert_eq!(state.market.ai_contents.len(), 5);
        assert!(state.generate_chatbot("offer-42", &mut rng).is_err());
    }
}
