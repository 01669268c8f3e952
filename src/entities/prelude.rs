pub use super::categories::Entity as Categories;
pub use super::gallery_images::Entity as GalleryImages;
pub use super::menu_images::Entity as MenuImages;
pub use super::promo_items::Entity as PromoItems;
