pub mod error;
pub mod form;
pub mod pagination;
pub mod slug;
pub mod validation;
