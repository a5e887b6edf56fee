pub mod fuzzy;
pub mod header;
pub mod input;
pub mod item;
pub mod model;
pub mod outcome;
pub mod request;

pub use header::{Countdown, Header, StatusChange};
pub use input::SearchInput;
pub use item::{ItemSource, ItemStyle, PickerItem, RefreshSnapshot};
pub use model::PickerModel;
pub use outcome::PickerOutcome;
pub use request::{Notice, NoticeLevel, PickerRequest};
