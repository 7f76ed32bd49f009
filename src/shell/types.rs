use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct MenuEntry {
    pub title: &'static str,
    pub description: &'static str,
}
