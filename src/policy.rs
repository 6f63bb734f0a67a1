//! Keyword-based reply policy
//!
//! Maps a user utterance to a canned reply. Categories are evaluated in
//! declaration order and the first match wins, since an utterance like
//! "track my refund" satisfies more than one keyword set.

use rand::Rng;
use serde::Serialize;

/// A keyword category with its canned reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    OrderTracking,
    ReturnsRefunds,
    ProductInquiry,
    TechnicalSupport,
    Greeting,
}

impl Category {
    /// All categories in precedence order
    pub const ALL: [Category; 5] = [
        Category::OrderTracking,
        Category::ReturnsRefunds,
        Category::ProductInquiry,
        Category::TechnicalSupport,
        Category::Greeting,
    ];

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Category::OrderTracking => &["order", "track"],
            Category::ReturnsRefunds => &["return", "refund"],
            Category::ProductInquiry => &["product", "item"],
            Category::TechnicalSupport => &["technical", "support", "problem"],
            Category::Greeting => &["hello", "hi", "hey"],
        }
    }

    pub fn response(self) -> &'static str {
        match self {
            Category::OrderTracking => {
                "I can help you track your order! Please provide your order number, and I'll check the status for you right away."
            }
            Category::ReturnsRefunds => {
                "I understand you'd like to process a return. You can initiate returns within 30 days of purchase through your account dashboard, or I can help guide you through the process."
            }
            Category::ProductInquiry => {
                "I'd be happy to help you with product information! Could you please specify which product you're interested in learning more about?"
            }
            Category::TechnicalSupport => {
                "I'm here to help with technical issues! Please describe the problem you're experiencing, and I'll provide step-by-step assistance."
            }
            Category::Greeting => {
                "Hello! Welcome to our AI customer support. I'm here to assist you with any questions or concerns you might have. How can I help you today?"
            }
        }
    }

    /// Substring match, so "hi" also fires inside longer words.
    fn matches(self, normalized: &str) -> bool {
        self.keywords().iter().any(|k| normalized.contains(k))
    }
}

/// Replies used when no category matches
pub const FALLBACK_REPLIES: [&str; 8] = [
    "Thank you for your message! I'm here to help you with any questions.",
    "I understand your concern. Let me assist you with that right away.",
    "That's a great question! Here's what I can tell you about that.",
    "I'd be happy to help you resolve this issue. Let me check that for you.",
    "Thanks for reaching out! I'm processing your request now.",
    "I see what you're asking about. Here's the information you need.",
    "Let me help you with that. I'll provide you with the best solution.",
    "I appreciate your patience. Here's what I found for you.",
];

/// Lower-case and trim an utterance for matching
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// First matching category, if any
pub fn classify(text: &str) -> Option<Category> {
    let normalized = normalize(text);
    Category::ALL
        .into_iter()
        .find(|category| category.matches(&normalized))
}

/// Produce the reply for a user utterance.
///
/// Deterministic for a given `rng` state; the RNG is only consulted when
/// no category matches.
pub fn reply<R: Rng + ?Sized>(text: &str, rng: &mut R) -> String {
    match classify(text) {
        Some(category) => category.response().to_string(),
        None => FALLBACK_REPLIES[rng.gen_range(0..FALLBACK_REPLIES.len())].to_string(),
    }
}
