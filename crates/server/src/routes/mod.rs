pub mod admin;
pub mod auth;
pub mod brands;
pub mod cart;
pub mod collections;
pub mod merchant;
pub mod orders;
pub mod products;
pub mod profile;
pub mod wishlist;
