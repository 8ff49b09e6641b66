//! Screen registry: id to screen mapping

use std::collections::HashMap;

use crate::host::Screen;

#[derive(Debug, Clone)]
pub struct Registry<S> {
    screens: HashMap<String, S>,
    /// Registration order, for deterministic listings
    order: Vec<String>,
}

impl<S> Default for Registry<S> {
    fn default() -> Self {
        Self {
            screens: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<S: Screen> Registry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole mapping. Screens without an id are skipped; on a
    /// duplicate id the later screen wins.
    pub fn register(&mut self, screens: impl IntoIterator<Item = S>) {
        self.screens.clear();
        self.order.clear();
        for screen in screens {
            let Some(id) = screen.id().map(str::to_string) else {
                continue;
            };
            if self.screens.insert(id.clone(), screen).is_none() {
                self.order.push(id);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&S> {
        self.screens.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.screens.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;

    #[derive(Debug, Clone, PartialEq)]
    struct Panel(Option<&'static str>, u32);

    impl Screen for Panel {
        fn id(&self) -> Option<&str> {
            self.0
        }

        fn outer_size(&self) -> Size {
            Size::new(self.1, self.1)
        }
    }

    #[test]
    fn test_screens_without_id_are_skipped() {
        let mut registry = Registry::new();
        registry.register([Panel(Some("home"), 1), Panel(None, 2), Panel(Some("about"), 3)]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.ids().collect::<Vec<_>>(), ["home", "about"]);
        assert_eq!(registry.get("about"), Some(&Panel(Some("about"), 3)));
    }

    #[test]
    fn test_register_replaces_mapping() {
        let mut registry = Registry::new();
        registry.register([Panel(Some("home"), 1), Panel(Some("about"), 1)]);
        registry.register([Panel(Some("contact"), 1)]);
        assert!(!registry.contains("home"));
        assert!(registry.contains("contact"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_id_keeps_later_screen() {
        let mut registry = Registry::new();
        registry.register([Panel(Some("home"), 1), Panel(Some("home"), 7)]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("home").map(|p| p.1), Some(7));
        assert_eq!(registry.ids().count(), 1);
    }
}
