//! Display colours for categories and priorities.

use crate::types::Priority;
use serde::Serialize;

const CATEGORY_COLORS: [&str; 8] = [
    "bg-blue-100 text-blue-800",
    "bg-green-100 text-green-800",
    "bg-purple-100 text-purple-800",
    "bg-pink-100 text-pink-800",
    "bg-indigo-100 text-indigo-800",
    "bg-teal-100 text-teal-800",
    "bg-mint-100 text-mint-800",
    "bg-magenta-100 text-magenta-800",
];

/// Colour classes for a category name. The same name always maps to the
/// same colour.
pub fn category_color(category: &str) -> &'static str {
    let hash = category.chars().fold(0i32, |hash, c| {
        (c as i32).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    });
    CATEGORY_COLORS[hash.unsigned_abs() as usize % CATEGORY_COLORS.len()]
}

/// Text, background and border classes for a priority badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriorityPalette {
    pub text: &'static str,
    pub bg: &'static str,
    pub border: &'static str,
}

pub fn priority_palette(priority: Priority) -> PriorityPalette {
    let (text, bg, border) = match priority {
        Priority::Low => ("text-blue-600", "bg-blue-100", "border-blue-200"),
        Priority::Medium => ("text-green-600", "bg-green-100", "border-green-200"),
        Priority::High => ("text-orange-600", "bg-orange-100", "border-orange-200"),
        Priority::Urgent => ("text-red-600", "bg-red-100", "border-red-200"),
    };
    PriorityPalette { text, bg, border }
}
