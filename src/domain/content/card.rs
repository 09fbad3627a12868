//! Basic card and the visual pieces shared with other items.

use serde::{Deserialize, Serialize};

/// An image shown on a card, list item or carousel item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub accessibility_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Image {
    pub fn new(url: impl Into<String>, accessibility_text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            accessibility_text: accessibility_text.into(),
            width: None,
            height: None,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OpenUrlAction {
    pub url: String,
}

/// A button that opens a URL.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    pub title: String,
    pub open_url_action: OpenUrlAction,
}

impl Button {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            open_url_action: OpenUrlAction { url: url.into() },
        }
    }
}

/// How an image is fitted when its aspect ratio differs from the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageDisplayOptions {
    /// Blurred copy of the image fills the gaps.
    #[default]
    Default,
    /// White bars fill the gaps.
    White,
    /// Image is scaled to the frame width and cropped.
    Cropped,
}

/// A card with title, text, image and buttons.
///
/// Blank strings passed to the builder methods are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Button>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_display_options: Option<ImageDisplayOptions>,
}

impl BasicCard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = non_blank(title.into()).or(self.title);
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = non_blank(subtitle.into()).or(self.subtitle);
        self
    }

    pub fn with_body_text(mut self, text: impl Into<String>) -> Self {
        self.formatted_text = non_blank(text.into()).or(self.formatted_text);
        self
    }

    pub fn with_image(mut self, image: Image) -> Self {
        if !image.url.trim().is_empty() {
            self.image = Some(image);
        }
        self
    }

    pub fn with_button(mut self, title: impl Into<String>, url: impl Into<String>) -> Self {
        let button = Button::new(title, url);
        if !button.title.trim().is_empty() && !button.open_url_action.url.trim().is_empty() {
            self.buttons.push(button);
        }
        self
    }

    pub fn with_image_display(mut self, option: ImageDisplayOptions) -> Self {
        self.image_display_options = Some(option);
        self
    }
}

pub(super) fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
