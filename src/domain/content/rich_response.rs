//! Rich response: ordered items plus suggestion chips.
//!
//! Insertion rules:
//! - speech owns the first slot; a simple response added while item 0 is
//!   something else replaces that item
//! - at most two simple responses, further ones are dropped
//! - at most one card-like item (basic card or table)
//! - at most one order update, further ones are dropped
//! - the link-out suggestion is a single slot

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::browse::BrowseCarousel;
use super::card::BasicCard;
use super::media::MediaResponse;
use super::order_update::OrderUpdate;
use super::simple::SimpleResponse;
use super::suggestion::{LinkOutSuggestion, Suggestion};
use super::table::TableCard;
use crate::domain::foundation::ValidationError;

const MAX_SIMPLE_RESPONSES: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredResponse {
    pub order_update: OrderUpdate,
}

/// One entry of a rich response; serializes as a single-key object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RichResponseItem {
    SimpleResponse(SimpleResponse),
    BasicCard(BasicCard),
    TableCard(TableCard),
    CarouselBrowse(BrowseCarousel),
    MediaResponse(MediaResponse),
    StructuredResponse(StructuredResponse),
}

impl RichResponseItem {
    pub fn as_simple(&self) -> Option<&SimpleResponse> {
        match self {
            RichResponseItem::SimpleResponse(simple) => Some(simple),
            _ => None,
        }
    }

    fn is_card(&self) -> bool {
        matches!(
            self,
            RichResponseItem::BasicCard(_) | RichResponseItem::TableCard(_)
        )
    }

    fn is_order_update(&self) -> bool {
        matches!(self, RichResponseItem::StructuredResponse(_))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichResponse {
    #[serde(default)]
    items: Vec<RichResponseItem>,
    #[serde(default)]
    suggestions: Vec<Suggestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    link_out_suggestion: Option<LinkOutSuggestion>,
}

impl RichResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[RichResponseItem] {
        &self.items
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn link_out_suggestion(&self) -> Option<&LinkOutSuggestion> {
        self.link_out_suggestion.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.suggestions.is_empty() && self.link_out_suggestion.is_none()
    }

    /// First simple response, if any.
    pub fn first_simple(&self) -> Option<&SimpleResponse> {
        self.items.iter().find_map(RichResponseItem::as_simple)
    }

    pub fn add_simple_response(&mut self, simple: SimpleResponse) -> &mut Self {
        if !simple.has_speech() {
            warn!("ignoring simple response without speech");
            return self;
        }
        let simple_count = self.items.iter().filter(|i| i.as_simple().is_some()).count();
        if simple_count >= MAX_SIMPLE_RESPONSES {
            debug!("rich response already holds two simple responses, dropping another");
            return self;
        }

        let item = RichResponseItem::SimpleResponse(simple);
        match self.items.first_mut() {
            Some(first) if first.as_simple().is_none() => *first = item,
            _ => self.items.push(item),
        }
        self
    }

    /// Adds speech with optional display text.
    pub fn add_speech(&mut self, speech: &str, display_text: Option<&str>) -> &mut Self {
        let mut simple = SimpleResponse::new(speech);
        if let Some(text) = display_text {
            simple = simple.with_display_text(text);
        }
        self.add_simple_response(simple)
    }

    /// # Errors
    ///
    /// `DuplicateItem` when a basic card or table is already present.
    pub fn add_basic_card(&mut self, card: BasicCard) -> Result<&mut Self, ValidationError> {
        self.push_card(RichResponseItem::BasicCard(card))
    }

    /// # Errors
    ///
    /// `DuplicateItem` when a basic card or table is already present.
    pub fn add_table(&mut self, table: TableCard) -> Result<&mut Self, ValidationError> {
        self.push_card(RichResponseItem::TableCard(table))
    }

    pub fn add_browse_carousel(&mut self, carousel: BrowseCarousel) -> &mut Self {
        self.items.push(RichResponseItem::CarouselBrowse(carousel));
        self
    }

    pub fn add_media_response(&mut self, media: MediaResponse) -> &mut Self {
        self.items.push(RichResponseItem::MediaResponse(media));
        self
    }

    pub fn add_order_update(&mut self, order_update: OrderUpdate) -> &mut Self {
        if self.items.iter().any(RichResponseItem::is_order_update) {
            debug!("rich response already holds an order update, dropping another");
            return self;
        }
        self.items
            .push(RichResponseItem::StructuredResponse(StructuredResponse { order_update }));
        self
    }

    pub fn add_suggestions<I, S>(&mut self, titles: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggestions
            .extend(titles.into_iter().map(|t| Suggestion::new(t)));
        self
    }

    /// Sets the link-out chip, replacing any previous one. Blank values are
    /// ignored.
    pub fn add_suggestion_link(&mut self, destination_name: &str, url: &str) -> &mut Self {
        if destination_name.trim().is_empty() || url.trim().is_empty() {
            warn!("ignoring suggestion link with blank destination or url");
            return self;
        }
        self.link_out_suggestion = Some(LinkOutSuggestion::new(destination_name, url));
        self
    }

    /// Checks the response can end or accompany a system intent.
    ///
    /// # Errors
    ///
    /// `InvalidStructure` unless item 0 is a simple response with speech.
    pub fn ensure_leading_speech(&self) -> Result<(), ValidationError> {
        match self.items.first().and_then(RichResponseItem::as_simple) {
            Some(simple) if simple.has_speech() => Ok(()),
            _ => Err(ValidationError::invalid_structure(
                "RichResponse",
                "First item must be SimpleResponse",
            )),
        }
    }

    fn push_card(&mut self, item: RichResponseItem) -> Result<&mut Self, ValidationError> {
        if self.items.iter().any(RichResponseItem::is_card) {
            return Err(ValidationError::duplicate_item(
                "RichResponse",
                "BasicCard or Table",
            ));
        }
        self.items.push(item);
        Ok(self)
    }
}
