//! Deterministic color/identity assignment.
//!
//! Campaigns and developers get their visual identity from their name, not
//! from assignment order, so colors survive reloads and record reordering
//! within a deployment. The hash recurrence is pinned:
//! `h = code_unit + ((h << 5) - h)` over UTF-16 code units with 32-bit
//! wrapping arithmetic, then `|h| mod palette.len()`. Regression tests pin a
//! fixed key set to fixed palette slots; do not change the recurrence or the
//! palette lengths without updating them.

/// Fallback for missing keys and empty palettes. Never palette slot 0.
pub const NEUTRAL_COLOR: &str = "#6b7280";

/// Campaign palette. Order and length are part of the deployment's visual
/// identity; duplicate entries are kept so existing slot assignments hold.
pub const CAMPAIGN_PALETTE: &[&str] = &[
    "#3b82f6", "#22c55e", "#ec4899", "#6366f1", "#ef4444", "#a855f7", "#eab308",
    "#14b8a6", "#f97316", "#06b6d4", "#84cc16", "#f59e0b", "#10b981", "#8b5cf6",
    "#0ea5e9", "#f43f5e", "#16a34a", "#0ea5e9", "#64748b", "#2563eb", "#db2777",
    "#7f1d1d", "#4f46e5", "#9333ea", "#991b1b", "#0d9488", "#facc15", "#0891b2",
    "#1e3a8a", "#d97706", "#059669", "#ef4444", "#c026d3", "#e11d48", "#b91c1c",
    "#1d4ed8", "#15803d", "#06b6d4", "#4338ca", "#7f1d1d", "#7e22ce", "#a16207",
    "#0f766e", "#c2410c", "#0e7490", "#4d7c0f", "#b45309", "#047857", "#6d28d9",
    "#a21caf", "#be123c", "#0369a1",
];

/// Developer palette, used for anomaly markers.
pub const DEVELOPER_PALETTE: &[&str] = &[
    "#22c55e", "#ec4899", "#ef4444", "#6366f1", "#a855f7", "#eab308", "#14b8a6",
    "#f97316", "#06b6d4", "#3b82f6",
];

/// Rolling identity hash over UTF-16 code units.
///
/// Matches the recurrence other front ends of this board use
/// (`charCodeAt`-based), so the same name lands on the same palette slot
/// everywhere.
fn identity_hash(key: &str) -> i32 {
    let mut h: i32 = 0;
    for unit in key.encode_utf16() {
        h = i32::from(unit).wrapping_add(h.wrapping_shl(5).wrapping_sub(h));
    }
    h
}

/// Deterministic map from a name to one palette entry.
///
/// Empty/missing keys map to [`NEUTRAL_COLOR`], deliberately not palette
/// slot 0. Distinct keys may collide; stability matters here, uniqueness
/// does not.
pub fn color_for<'p>(key: Option<&str>, palette: &[&'p str]) -> &'p str {
    let key = match key {
        Some(k) if !k.is_empty() => k,
        _ => return NEUTRAL_COLOR,
    };
    if palette.is_empty() {
        return NEUTRAL_COLOR;
    }
    palette[identity_hash(key).unsigned_abs() as usize % palette.len()]
}

/// Fixed estado → badge color mapping for the detail view.
pub fn status_color(estado: Option<&str>) -> &'static str {
    let Some(estado) = estado else {
        return NEUTRAL_COLOR;
    };
    match estado.to_lowercase().as_str() {
        "entregado" => "#22c55e",
        "finalizado" => "#3b82f6",
        "cancelado" => "#9a3412",
        "en proceso" => "#eab308",
        "proyectado" => "#6b7280",
        "sin material" => "#ef4444",
        _ => NEUTRAL_COLOR,
    }
}

// ============================================================================
// Tests
// ============================================================================
