//! Domain logic for Foodgram that does not touch the database or HTTP.

pub mod image;
pub mod import;
pub mod pagination;
pub mod shopping_list;
pub mod text;
pub mod validation;
