//! Response content: speech, visual items, selections and order updates.

mod browse;
mod card;
mod media;
mod order_update;
mod prompt;
mod rich_response;
mod select;
mod simple;
mod suggestion;
mod table;

pub use browse::{BrowseCarousel, BrowseItem};
pub use card::{BasicCard, Button, Image, ImageDisplayOptions, OpenUrlAction};
pub use media::{MediaObject, MediaResponse, MediaType};
pub use order_update::{
    LineItemUpdate, Money, OrderAction, OrderId, OrderInfoKind, OrderManagementAction,
    OrderState, OrderStateKind, OrderUpdate, Price, PriceType, UpdateTime, UserNotification,
};
pub use prompt::Prompt;
pub use rich_response::{RichResponse, RichResponseItem, StructuredResponse};
pub use select::{
    Carousel, List, OptionInfo, OptionItem, CAROUSEL_ITEM_LIMIT, LIST_ITEM_LIMIT,
    MIN_SELECT_ITEMS,
};
pub use simple::{is_ssml, SimpleResponse};
pub use suggestion::{LinkOutSuggestion, Suggestion};
pub use table::{Cell, ColumnProperties, HorizontalAlignment, Row, TableCard};
