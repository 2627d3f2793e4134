//! Color token resolution for badge styling.
//!
//! Tokens are either palette names (`red`, `light-blue`), semantic names
//! (`warning`, `dark-success`) or raw CSS colors (`#FF0000`), which are
//! echoed back unchanged.
//!
//! Both forms are public for hosts that lay out their own markup.
//! Annotations themselves only use the style-value form: legacy colors are
//! folded into a badge's `style` during migration.

/// Palette color names (prefixable with `light-` / `dark-`).
pub const PALETTE_COLORS: &[&str] = &[
    "blue", "brown", "cyan", "green", "indigo", "orange", "pink", "purple", "red", "yellow",
    "white", "black",
];

/// Semantic color names (prefixable with `light-` / `dark-`).
pub const SEMANTIC_COLORS: &[&str] = &[
    "accent",
    "text",
    "error",
    "warning",
    "destructive",
    "build",
    "success",
    "danger",
    "info",
];

enum ColorFamily {
    Palette,
    Semantic,
}

/// Strip a `light-` or `dark-` prefix, if a non-empty token follows it.
fn primary_token(color: &str) -> &str {
    if color.len() > 6 && color.starts_with("light-") {
        &color[6..]
    } else if color.len() > 5 && color.starts_with("dark-") {
        &color[5..]
    } else {
        color
    }
}

fn family(color: &str) -> Option<ColorFamily> {
    let primary = primary_token(color);
    if PALETTE_COLORS.contains(&primary) {
        Some(ColorFamily::Palette)
    } else if SEMANTIC_COLORS.contains(&primary) {
        Some(ColorFamily::Semantic)
    } else {
        None
    }
}

/// Resolve a color token to a `jenkins-!-*` utility class.
///
/// Returns `None` for unrecognised tokens.
pub fn resolve_class(color: Option<&str>) -> Option<String> {
    let color = color?;
    match family(color)? {
        ColorFamily::Palette => Some(format!("jenkins-!-color-{color}")),
        ColorFamily::Semantic => Some(format!("jenkins-!-{color}-color")),
    }
}

/// Resolve a color token to a CSS value usable in a `color:` rule.
///
/// Unrecognised tokens are treated as raw CSS colors and returned as-is.
pub fn resolve_style_value(color: &str) -> String {
    match family(color) {
        Some(ColorFamily::Palette) => format!("var(--{color})"),
        Some(ColorFamily::Semantic) => format!("var(--{color}-color)"),
        None => color.to_string(),
    }
}
