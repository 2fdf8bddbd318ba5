/// Rendering of [`crate::state::AppState`]: sidebar/top bar widgets and the
/// chart area.
pub mod charts;
pub mod panels;
