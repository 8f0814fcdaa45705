use colored::{Color, ColoredString, Colorize};
use daybook::model::{Category, Status};
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub struct CategoryStyle {
    pub icon: &'static str,
    pub label: &'static str,
    pub color: Color,
}

pub static CATEGORY_STYLES: Lazy<HashMap<Category, CategoryStyle>> = Lazy::new(|| {
    let mut styles = HashMap::new();
    let entries = [
        (Category::Work, "💼", "Work", Color::Blue),
        (Category::Personal, "👤", "Personal", Color::Magenta),
        (Category::Health, "🏥", "Health", Color::Green),
        (Category::Learning, "📚", "Learning", Color::Cyan),
        (Category::Project, "🚀", "Project", Color::Yellow),
        (Category::Other, "📋", "Other", Color::White),
    ];
    for (category, icon, label, color) in entries {
        styles.insert(category, CategoryStyle { icon, label, color });
    }
    styles
});

pub fn category_badge(category: Category) -> String {
    match CATEGORY_STYLES.get(&category) {
        Some(style) => format!("{} {}", style.icon, style.label),
        None => category.to_string(),
    }
}

pub fn colored_category(category: Category, text: &str) -> ColoredString {
    match CATEGORY_STYLES.get(&category) {
        Some(style) => text.color(style.color),
        None => text.normal(),
    }
}

pub fn status_marker(status: Status) -> ColoredString {
    match status {
        Status::Pending => "○".yellow(),
        Status::InProgress => "◐".cyan(),
        Status::Completed => "●".green(),
    }
}

pub fn status_label(status: Status) -> ColoredString {
    let text = status.as_str().replace('-', " ");
    match status {
        Status::Pending => text.yellow(),
        Status::InProgress => text.cyan(),
        Status::Completed => text.green(),
    }
}
