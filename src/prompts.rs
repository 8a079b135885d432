//! Spoken prompts for the order confirmation menu

use crate::directory::CustomerContext;

pub const DEFAULT_BRAND_NAME: &str = "My Company";

const MENU_INSTRUCTIONS: [&str; 3] = [
    "Press 1 to repeat this message.",
    "Press 9 to confirm the order.",
    "Press any other key or hangup the call if you did not place an order.",
];

/// Opening menu. Without a known customer the greeting stays generic.
pub fn greeting(brand_name: &str, customer: Option<&CustomerContext>) -> Vec<String> {
    let mut prompt = match customer {
        Some(ctx) => vec![
            format!(
                "Hello {}, this is a confirmation call from {brand_name}, ",
                ctx.name
            ),
            format!(
                "for your order of {}, order number {}.",
                ctx.last_order.name, ctx.last_order.id
            ),
        ],
        None => vec![
            format!("Hello, this is a confirmation call from {brand_name}, "),
            "for your recent order.".to_string(),
        ],
    };
    prompt.extend(MENU_INSTRUCTIONS.iter().map(ToString::to_string));
    prompt
}

pub fn confirmed() -> Vec<String> {
    vec!["Thank you for your confirmation.".to_string(), "Bye.".to_string()]
}

pub fn declined() -> Vec<String> {
    [
        "Sorry for the trouble.",
        "Our team will audit this order placed from your account.",
        "Thank you.",
        "Bye.",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}
