//! Audio media response.

use serde::{Deserialize, Serialize};

use super::card::Image;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    MediaTypeUnspecified,
    #[default]
    Audio,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaObject {
    pub name: String,
    pub content_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large_image: Option<Image>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Image>,
}

impl MediaObject {
    pub fn new(name: impl Into<String>, content_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content_url: content_url.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_large_image(mut self, image: Image) -> Self {
        self.large_image = Some(image);
        self
    }

    pub fn with_icon(mut self, icon: Image) -> Self {
        self.icon = Some(icon);
        self
    }
}

/// Audio played back by the device; needs the `MEDIA_RESPONSE_AUDIO`
/// surface capability.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaResponse {
    pub media_type: MediaType,
    pub media_objects: Vec<MediaObject>,
}

impl MediaResponse {
    pub fn audio(objects: Vec<MediaObject>) -> Self {
        Self {
            media_type: MediaType::Audio,
            media_objects: objects,
        }
    }
}
