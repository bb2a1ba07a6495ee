pub mod item;
pub mod mapping;
pub mod palette;
pub mod table;

pub use item::{RenderItem, ValueItem};
pub use mapping::{map_records, SourceRecord};
pub use palette::Palette;
pub use table::DatasetTable;
