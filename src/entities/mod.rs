pub mod prelude;

pub mod categories;
pub mod gallery_images;
pub mod menu_images;
pub mod promo_items;
