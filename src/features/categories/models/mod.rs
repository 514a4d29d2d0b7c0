mod category;

pub use category::{Category, CategoryDraft, CategoryFilter, ParentLink};
