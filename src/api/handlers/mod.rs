pub mod auth;
pub mod categories;
pub mod content;
pub mod gallery;
pub mod health;
pub mod images;
pub mod menu_images;
pub mod mirror;
pub mod promo;
