//! Table card.

use serde::{Deserialize, Serialize};

use super::card::{Button, Image};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HorizontalAlignment {
    #[default]
    Leading,
    Center,
    Trailing,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnProperties {
    pub header: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal_alignment: Option<HorizontalAlignment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub cells: Vec<Cell>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub divider_after: bool,
}

/// A card laying out rows of text cells under column headers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub column_properties: Vec<ColumnProperties>,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Button>,
}

impl TableCard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_image(mut self, image: Image) -> Self {
        self.image = Some(image);
        self
    }

    /// Adds left-aligned columns with the given headers.
    pub fn with_columns<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.column_properties
            .extend(headers.into_iter().map(|h| ColumnProperties {
                header: h.into(),
                horizontal_alignment: None,
            }));
        self
    }

    pub fn with_column(mut self, header: impl Into<String>, alignment: HorizontalAlignment) -> Self {
        self.column_properties.push(ColumnProperties {
            header: header.into(),
            horizontal_alignment: Some(alignment),
        });
        self
    }

    pub fn with_row<I, S>(mut self, cells: I, divider_after: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(Row {
            cells: cells.into_iter().map(|c| Cell { text: c.into() }).collect(),
            divider_after,
        });
        self
    }

    pub fn with_button(mut self, title: impl Into<String>, url: impl Into<String>) -> Self {
        self.buttons.push(Button::new(title, url));
        self
    }
}
