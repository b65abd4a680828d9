// EstateHub - core/content.rs
//
// Display formatting and template-based copy generation for sellers
// (listing announcements) and partners (assistant greeting scripts).
// Template choice comes from an injected RNG so output is reproducible.

use crate::core::model::{Property, ServiceOffer};
use rand::Rng;

/// Format a price as whole US dollars with thousands separators.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}")
}

/// Cut `text` to at most `max_chars` characters, appending "..." if cut.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Listing announcement copy for a property.
pub fn marketing_copy<R: Rng + ?Sized>(property: &Property, rng: &mut R) -> String {
    let title = &property.title;
    let location = &property.location;
    let description = &property.description;
    match rng.gen_range(0..5) {
        0 => format!(
            "EXCLUSIVE LISTING!\n\nPresenting {title} in {location}.\n\n{description}\n\n\
             Contact us now to schedule a viewing!"
        ),
        1 => format!(
            "NEW ON THE MARKET\n\nDon't miss this opportunity to own {title}!\n\n\
             Located in the desirable area of {location}, this property offers: {description}\n\n\
             Reach out today before it's gone!"
        ),
        2 => format!(
            "YOUR DREAM HOME AWAITS\n\nIntroducing {title}!\n\n\
             Perfectly situated in {location}, featuring {description}\n\nCall now to make it yours!"
        ),
        3 => format!(
            "JUST LISTED!\n\n{title} - A rare find in {location}.\n\n\
             Highlights include: {description}\n\nSchedule your private tour today!"
        ),
        _ => format!(
            "LUXURY LIVING\n\nExperience the epitome of elegance at {title} in {location}.\n\n\
             {description}\n\nExclusive showings available now!"
        ),
    }
}

/// Assistant greeting script for a partner's service.
pub fn chatbot_script<R: Rng + ?Sized>(offer: &ServiceOffer, rng: &mut R) -> String {
    let title = &offer.title;
    let category = offer.category.as_str();
    let description = &offer.description;
    match rng.gen_range(0..5) {
        0 => format!(
            "Hello! Thank you for your interest in our {title} services. I'd be happy to tell \
             you more about our {category} solutions. {description} Let me know if you have any \
             specific questions!"
        ),
        1 => format!(
            "Hi there! I'm here to help you learn more about our {title}. We specialize in \
             {category} services, and what makes us unique is this: {description} How can I \
             assist you today?"
        ),
        2 => format!(
            "Welcome! Interested in our {title}? As experts in {category}, we pride ourselves \
             on what we deliver. {description} What would you like to know?"
        ),
        3 => format!(
            "Greetings! Looking for quality {category} services? Our {title} might be perfect \
             for you! {description} Feel free to ask me anything about our offerings."
        ),
        _ => format!(
            "Thank you for reaching out about our {title}! We're dedicated to providing \
             exceptional {category} services. {description} How may I help you today?"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::seed;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_format_currency_groups_thousands() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.0), "$999");
        assert_eq!(format_currency(1_250_000.0), "$1,250,000");
        assert_eq!(format_currency(450_000.4), "$450,000");
        assert_eq!(format_currency(-1_500.0), "-$1,500");
    }

    #[test]
    fn test_truncate_text_respects_char_boundaries() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("exactly", 7), "exactly");
        assert_eq!(truncate_text("Waterfront", 5), "Water...");
        assert_eq!(truncate_text("café au lait", 4), "café...");
    }

    #[test]
    fn test_marketing_copy_mentions_listing() {
        let property = &seed::properties()[0];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            let copy = marketing_copy(property, &mut rng);
            assert!(copy.contains(&property.title));
            assert!(copy.contains(&property.location));
        }
    }

    #[test]
    fn test_same_seed_same_copy() {
        let offer = &seed::service_offers()[2];
        let a = chatbot_script(offer, &mut StdRng::seed_from_u64(42));
        let b = chatbot_script(offer, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
        assert!(a.contains("internet"));
    }
}
