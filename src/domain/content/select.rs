//! Selectable lists and carousels of option items.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::card::{non_blank, Image, ImageDisplayOptions};
use crate::domain::foundation::ValidationError;

/// Most items a list may show.
pub const LIST_ITEM_LIMIT: usize = 30;

/// Most items a carousel may show.
pub const CAROUSEL_ITEM_LIMIT: usize = 10;

/// Fewest items a list or carousel may be asked with.
pub const MIN_SELECT_ITEMS: usize = 2;

/// Identity of an option; `key` comes back as the `OPTION` argument.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OptionInfo {
    pub key: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionItem {
    pub option_info: OptionInfo,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
}

impl OptionItem {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            option_info: OptionInfo {
                key: key.into(),
                synonyms: Vec::new(),
            },
            ..Default::default()
        }
    }

    /// Blank keys are ignored.
    pub fn set_key(mut self, key: impl Into<String>) -> Self {
        if let Some(key) = non_blank(key.into()) {
            self.option_info.key = key;
        }
        self
    }

    pub fn add_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.option_info
            .synonyms
            .extend(synonyms.into_iter().map(Into::into));
        self
    }

    pub fn set_title(mut self, title: impl Into<String>) -> Self {
        if let Some(title) = non_blank(title.into()) {
            self.title = title;
        }
        self
    }

    pub fn set_description(mut self, description: impl Into<String>) -> Self {
        self.description = non_blank(description.into()).or(self.description);
        self
    }

    pub fn set_image(mut self, image: Image) -> Self {
        if !image.url.trim().is_empty() {
            self.image = Some(image);
        }
        self
    }
}

/// A vertical list of up to [`LIST_ITEM_LIMIT`] options.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct List {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub items: Vec<OptionItem>,
}

impl List {
    pub fn new(items: Vec<OptionItem>) -> Self {
        Self::default().add_items(items)
    }

    pub fn set_title(mut self, title: impl Into<String>) -> Self {
        self.title = non_blank(title.into()).or(self.title);
        self
    }

    /// Appends items, keeping only the first [`LIST_ITEM_LIMIT`].
    pub fn add_items(mut self, items: impl IntoIterator<Item = OptionItem>) -> Self {
        self.items.extend(items);
        truncate("List", &mut self.items, LIST_ITEM_LIMIT);
        self
    }

    /// # Errors
    ///
    /// `TooFewItems` when fewer than two items are present.
    pub fn ensure_selectable(&self) -> Result<(), ValidationError> {
        if self.items.len() < MIN_SELECT_ITEMS {
            return Err(ValidationError::too_few_items("List", MIN_SELECT_ITEMS));
        }
        Ok(())
    }
}

/// A horizontal carousel of up to [`CAROUSEL_ITEM_LIMIT`] options.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Carousel {
    #[serde(default)]
    pub items: Vec<OptionItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_display_options: Option<ImageDisplayOptions>,
}

impl Carousel {
    pub fn new(items: Vec<OptionItem>) -> Self {
        Self::default().add_items(items)
    }

    /// Appends items, keeping only the first [`CAROUSEL_ITEM_LIMIT`].
    pub fn add_items(mut self, items: impl IntoIterator<Item = OptionItem>) -> Self {
        self.items.extend(items);
        truncate("Carousel", &mut self.items, CAROUSEL_ITEM_LIMIT);
        self
    }

    pub fn with_image_display(mut self, option: ImageDisplayOptions) -> Self {
        self.image_display_options = Some(option);
        self
    }

    /// # Errors
    ///
    /// `TooFewItems` when fewer than two items are present.
    pub fn ensure_selectable(&self) -> Result<(), ValidationError> {
        if self.items.len() < MIN_SELECT_ITEMS {
            return Err(ValidationError::too_few_items("Carousel", MIN_SELECT_ITEMS));
        }
        Ok(())
    }
}

fn truncate(what: &str, items: &mut Vec<OptionItem>, limit: usize) {
    if items.len() > limit {
        warn!(
            what,
            dropped = items.len() - limit,
            limit,
            "too many option items, keeping the first ones"
        );
        items.truncate(limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn items(n: usize) -> Vec<OptionItem> {
        (0..n)
            .map(|i| OptionItem::new(format!("key_{}", i)).set_title(format!("Item {}", i)))
            .collect()
    }

    mod option_item {
        use super::*;

        #[test]
        fn bare_item_serializes_empty_title_and_synonyms() {
            let item = OptionItem::new("key_1").add_synonyms(["key one"]);
            assert_eq!(
                serde_json::to_value(&item).unwrap(),
                json!({"optionInfo": {"key": "key_1", "synonyms": ["key one"]}, "title": ""})
            );
        }

        #[test]
        fn blank_setters_keep_previous_values() {
            let item = OptionItem::new("key_1")
                .set_key(" ")
                .set_title("Title")
                .set_title("")
                .set_description("Desc")
                .set_description("  ");
            assert_eq!(item.option_info.key, "key_1");
            assert_eq!(item.title, "Title");
            assert_eq!(item.description.as_deref(), Some("Desc"));
        }
    }

    mod limits {
        use super::*;

        #[test]
        fn list_keeps_first_thirty() {
            let list = List::new(items(35));
            assert_eq!(list.items.len(), 30);
            assert_eq!(list.items[29].option_info.key, "key_29");
        }

        #[test]
        fn carousel_keeps_first_ten() {
            let carousel = Carousel::new(items(15));
            assert_eq!(carousel.items.len(), 10);
            assert_eq!(carousel.items[0].option_info.key, "key_0");
        }

        #[test]
        fn incremental_adds_respect_limit() {
            let list = List::new(items(20)).add_items(items(20));
            assert_eq!(list.items.len(), LIST_ITEM_LIMIT);
        }

        #[test]
        fn fewer_than_two_items_are_not_selectable() {
            assert_eq!(
                List::new(items(1)).ensure_selectable().unwrap_err().to_string(),
                "List requires at least 2 items"
            );
            assert_eq!(
                Carousel::new(items(1)).ensure_selectable().unwrap_err().to_string(),
                "Carousel requires at least 2 items"
            );
            assert!(List::new(items(2)).ensure_selectable().is_ok());
        }

        proptest! {
            #[test]
            fn list_never_exceeds_limit(n in 0usize..80) {
                let list = List::new(items(n));
                prop_assert_eq!(list.items.len(), n.min(LIST_ITEM_LIMIT));
            }

            #[test]
            fn carousel_never_exceeds_limit(n in 0usize..40) {
                let carousel = Carousel::new(items(n));
                prop_assert_eq!(carousel.items.len(), n.min(CAROUSEL_ITEM_LIMIT));
            }
        }
    }
}
