pub mod auth;
pub mod cookies;
pub mod icons;
pub mod image_url;
pub mod slug;
