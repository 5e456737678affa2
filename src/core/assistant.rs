use crate::models::{PreferenceUpdate, PriceLevel};

/// Opening line of every chat
pub const GREETING: &str =
    "Hi there! I'm your DineFine assistant. What kind of restaurant are you looking for today?";

/// Outcome of one chat turn
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    pub message: String,
    pub update: PreferenceUpdate,
    pub trigger_search: bool,
}

impl AssistantReply {
    fn update(message: &str, update: PreferenceUpdate) -> Self {
        Self {
            message: message.to_string(),
            update,
            trigger_search: false,
        }
    }
}

/// Answer a chat message with a canned reply
///
/// The first matching branch wins. Only the search branch triggers a search,
/// and it carries no preference update.
pub fn respond(message: &str) -> AssistantReply {
    let text = message.to_lowercase();
    let has = |keywords: &[&str]| keywords.iter().any(|k| text.contains(k));

    if has(&["italian", "pasta", "pizza"]) {
        AssistantReply::update(
            "Great choice! I'll look for Italian restaurants near you. Any dietary restrictions I should know about?",
            cuisine("Italian"),
        )
    } else if has(&["chinese", "asian"]) {
        AssistantReply::update(
            "I'll find Chinese restaurants in your area. Are you allergic to anything I should filter out?",
            cuisine("Chinese"),
        )
    } else if has(&["mexican", "tacos"]) {
        AssistantReply::update(
            "Mexican cuisine it is! Do you prefer casual or more upscale dining?",
            cuisine("Mexican"),
        )
    } else if has(&["vegetarian", "vegan"]) {
        let label = if text.contains("vegetarian") { "Vegetarian" } else { "Vegan" };
        AssistantReply::update(
            "I'll make sure to only show restaurants with vegetarian or vegan options. Any specific cuisine type you're interested in?",
            dietary(label),
        )
    } else if has(&["gluten"]) {
        AssistantReply::update(
            "I'll find restaurants with gluten-free options. Any particular cuisine you're in the mood for today?",
            dietary("Gluten-Free"),
        )
    } else if has(&["budget", "cheap", "inexpensive"]) {
        AssistantReply::update(
            "Looking for budget-friendly options. Got it! Any food preferences?",
            price(PriceLevel::Inexpensive),
        )
    } else if has(&["fancy", "expensive", "fine dining"]) {
        AssistantReply::update(
            "I'll search for upscale dining options in your area. Any cuisine preferences?",
            price(PriceLevel::Expensive),
        )
    } else if has(&["search", "find"]) {
        AssistantReply {
            message: "I'll start searching for restaurants based on your preferences now!".to_string(),
            update: PreferenceUpdate::default(),
            trigger_search: true,
        }
    } else {
        AssistantReply::update(
            "Could you tell me more about what type of food or restaurant you're looking for? Or if you have any dietary restrictions?",
            PreferenceUpdate::default(),
        )
    }
}

fn cuisine(label: &str) -> PreferenceUpdate {
    PreferenceUpdate {
        cuisine_type: Some(label.to_string()),
        ..Default::default()
    }
}

fn dietary(label: &str) -> PreferenceUpdate {
    PreferenceUpdate {
        dietary_restrictions: Some(vec![label.to_string()]),
        ..Default::default()
    }
}

fn price(level: PriceLevel) -> PreferenceUpdate {
    PreferenceUpdate {
        price_range: Some(level),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuisine_branches() {
        assert_eq!(respond("Pasta tonight").update.cuisine_type.as_deref(), Some("Italian"));
        assert_eq!(respond("something asian").update.cuisine_type.as_deref(), Some("Chinese"));
        assert_eq!(respond("TACOS!").update.cuisine_type.as_deref(), Some("Mexican"));
    }

    #[test]
    fn test_vegetarian_wins_over_vegan() {
        let reply = respond("vegan or vegetarian");
        assert_eq!(reply.update.dietary_restrictions, Some(vec!["Vegetarian".to_string()]));
    }

    #[test]
    fn test_fancy_maps_to_three_dollars() {
        // "inexpensive" is caught by the budget branch first
        assert_eq!(respond("inexpensive").update.price_range, Some(PriceLevel::Inexpensive));
        assert_eq!(respond("something fancy").update.price_range, Some(PriceLevel::Expensive));
    }

    #[test]
    fn test_search_trigger_has_no_update() {
        let reply = respond("ok, find me something");
        assert!(reply.trigger_search);
        assert!(reply.update.is_empty());
    }

    #[test]
    fn test_fallback_asks_for_more() {
        let reply = respond("hmm");
        assert!(!reply.trigger_search);
        assert!(reply.update.is_empty());
        assert!(reply.message.starts_with("Could you tell me more"));
    }
}
