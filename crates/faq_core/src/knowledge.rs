use std::collections::HashSet;

use crate::error::{FaqError, Result};
use crate::model::FaqEntry;

/// Canonical question/answer pairs, fixed for the lifetime of the process.
///
/// Entries keep their declaration order; [`KnowledgeBase::list_all`] and every
/// ranking built from it rely on that order for tie-breaking.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<FaqEntry>,
}

impl KnowledgeBase {
    pub fn new(entries: Vec<FaqEntry>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(entries.len());

        for entry in &entries {
            if entry.key.trim().is_empty() {
                return Err(FaqError::InvalidEntry("empty key".to_string()));
            }
            if entry.question.trim().is_empty() {
                return Err(FaqError::InvalidEntry(format!(
                    "entry '{}' has an empty question",
                    entry.key
                )));
            }
            if !seen.insert(entry.key.as_str()) {
                return Err(FaqError::DuplicateKey(entry.key.clone()));
            }
        }

        Ok(Self { entries })
    }

    /// The SustainGo FAQ set shipped with the service.
    pub fn builtin() -> Self {
        Self {
            entries: builtin_entries(),
        }
    }

    pub fn get(&self, key: &str) -> Result<&FaqEntry> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .ok_or_else(|| FaqError::NotFound(key.to_string()))
    }

    pub fn list_all(&self) -> &[FaqEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn builtin_entries() -> Vec<FaqEntry> {
    vec![
        FaqEntry::new(
            "delivery_time",
            "How long does delivery take?",
            "Delivery typically takes 30–45 minutes.",
        ),
        FaqEntry::new(
            "order_arrival",
            "When will my order arrive?",
            "Delivery typically takes 30–45 minutes.",
        ),
        FaqEntry::new(
            "is_delivery_fast",
            "Is the delivery fast?",
            "Yes, delivery usually arrives within 30–45 minutes.",
        ),
        FaqEntry::new(
            "order_tracking",
            "How can I track my order?",
            "You can track your order through the app or website using your order ID.",
        ),
        FaqEntry::new(
            "track_order_status",
            "Where is my order?",
            "You can check your order status from the order tracking page.",
        ),
        FaqEntry::new(
            "payment_methods",
            "What payment methods do you accept?",
            "We accept credit cards, debit cards, and cash on delivery.",
        ),
        FaqEntry::new(
            "how_to_pay",
            "How do I pay?",
            "You can pay using credit/debit card or cash on delivery.",
        ),
        FaqEntry::new(
            "return_policy",
            "What is your return policy?",
            "Returns are accepted within 14 days with proof of purchase.",
        ),
        FaqEntry::new(
            "can_i_get_a_refund",
            "Can I get a refund?",
            "Yes, refunds are available for eligible returns.",
        ),
        FaqEntry::new(
            "coupon_usage",
            "How can I use a coupon?",
            "You can apply a valid coupon during checkout in the app or website.",
        ),
        FaqEntry::new(
            "do_you_have_discounts",
            "Do you offer discounts?",
            "Yes! We regularly have special offers, check the homepage for the latest deals.",
        ),
        FaqEntry::new(
            "opening_hours",
            "What are your opening hours?",
            "We are open from 9 AM to 11 PM every day.",
        ),
        FaqEntry::new(
            "delivery_area",
            "Do you deliver to my area?",
            "We deliver to most areas in the city. Enter your location during checkout to confirm.",
        ),
        FaqEntry::new(
            "customer_support",
            "How can I contact customer support?",
            "You can reach us via live chat, phone, or email from the Contact Us page.",
        ),
        FaqEntry::new(
            "what_is_a_mystery_bag",
            "What is a mystery bag?",
            "A mystery bag is a surprise assortment of unsold food offered at a discounted price by our vendor partners to help reduce food waste.",
        ),
        FaqEntry::new(
            "how_does_mystery_bag_work",
            "How does the mystery bag work?",
            "You purchase a mystery bag from a vendor, and at pickup time, you receive a surprise selection of food items they had left over for the day.",
        ),
        FaqEntry::new(
            "why_is_food_discounted",
            "Why is the food discounted?",
            "The food is still fresh but unsold. Vendors offer it at reduced prices to minimize food waste and make quality meals more accessible.",
        ),
        FaqEntry::new(
            "is_food_fresh",
            "Is the food in mystery bags fresh?",
            "Yes, all food in mystery bags is safe to eat and comes from the same daily-prepared meals that vendors sell during business hours.",
        ),
        FaqEntry::new(
            "pickup_time",
            "When can I pick up my mystery bag?",
            "Each vendor sets their own pickup window, usually near their closing time. You'll see the exact time when you place your order.",
        ),
        FaqEntry::new(
            "can_i_choose_items",
            "Can I choose what's in the mystery bag?",
            "No — the mystery is part of the experience! But vendors ensure a fair and delicious mix of items.",
        ),
        FaqEntry::new(
            "allergy_info",
            "What if I have food allergies?",
            "Please contact the vendor directly through the app before ordering. Some vendors may not be able to accommodate allergies due to the surprise nature of mystery bags.",
        ),
        FaqEntry::new(
            "vendor_partners",
            "Who are your vendor partners?",
            "We partner with local restaurants, cafes, and bakeries that are committed to reducing food waste and offering quality meals to the community.",
        ),
        FaqEntry::new(
            "sustainability_goal",
            "How does SustainGo support sustainability?",
            "By connecting customers with unsold meals, SustainGo helps reduce food waste and supports a more sustainable local food ecosystem.",
        ),
        FaqEntry::new(
            "is_mystery_bag_safe",
            "Is the mystery bag safe to eat?",
            "Yes! All food follows safety standards and is sold within safe consumption timeframes as determined by each vendor.",
        ),
        FaqEntry::new(
            "how_to_cancel_order",
            "Can I cancel my mystery bag order?",
            "Mystery bag orders are final due to the nature of food prep and discount pricing. Please only order if you're sure you can pick it up.",
        ),
        FaqEntry::new(
            "how_to_rate_vendor",
            "How can I rate a vendor?",
            "After pickup, you'll be prompted in the app to rate your experience and provide feedback.",
        ),
        FaqEntry::new(
            "sold_out",
            "Why do mystery bags sell out quickly?",
            "Since vendors only have a limited amount of surplus food, bags are first-come, first-served. Check back regularly or set alerts for your favorites!",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_keys_are_unique() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.len(), 27);

        let revalidated = KnowledgeBase::new(kb.list_all().to_vec()).expect("builtin is valid");
        assert_eq!(revalidated.len(), kb.len());
    }

    #[test]
    fn get_returns_entry_by_key() {
        let kb = KnowledgeBase::builtin();
        let entry = kb.get("delivery_time").expect("present");
        assert_eq!(entry.question, "How long does delivery take?");
        assert_eq!(entry.answer, "Delivery typically takes 30–45 minutes.");
    }

    #[test]
    fn get_signals_not_found() {
        let kb = KnowledgeBase::builtin();
        let err = kb.get("does_not_exist").unwrap_err();
        assert!(matches!(err, FaqError::NotFound(key) if key == "does_not_exist"));
    }

    #[test]
    fn list_all_keeps_declaration_order() {
        let kb = KnowledgeBase::builtin();
        let keys: Vec<&str> = kb.list_all().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys.first(), Some(&"delivery_time"));
        assert_eq!(keys.get(1), Some(&"order_arrival"));
        assert_eq!(keys.last(), Some(&"sold_out"));
    }

    #[test]
    fn rejects_duplicate_keys() {
        let entries = vec![
            FaqEntry::new("a", "first?", "one"),
            FaqEntry::new("a", "second?", "two"),
        ];
        assert!(matches!(
            KnowledgeBase::new(entries),
            Err(FaqError::DuplicateKey(key)) if key == "a"
        ));
    }

    #[test]
    fn rejects_blank_entries() {
        assert!(matches!(
            KnowledgeBase::new(vec![FaqEntry::new(" ", "q?", "a")]),
            Err(FaqError::InvalidEntry(_))
        ));
        assert!(matches!(
            KnowledgeBase::new(vec![FaqEntry::new("k", "", "a")]),
            Err(FaqError::InvalidEntry(_))
        ));
    }
}
