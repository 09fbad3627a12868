//! Browse carousel of web links.

use serde::{Deserialize, Serialize};

use super::card::{Image, ImageDisplayOptions, OpenUrlAction};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseItem {
    pub title: String,
    pub open_url_action: OpenUrlAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
}

impl BrowseItem {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            open_url_action: OpenUrlAction { url: url.into() },
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn with_image(mut self, image: Image) -> Self {
        self.image = Some(image);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseCarousel {
    pub items: Vec<BrowseItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_display_options: Option<ImageDisplayOptions>,
}

impl BrowseCarousel {
    pub fn new(items: Vec<BrowseItem>) -> Self {
        Self {
            items,
            image_display_options: None,
        }
    }

    pub fn with_image_display(mut self, option: ImageDisplayOptions) -> Self {
        self.image_display_options = Some(option);
        self
    }
}
