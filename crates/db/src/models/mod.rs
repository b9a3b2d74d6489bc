pub mod address;
pub mod brand;
pub mod cart;
pub mod collection;
pub mod merchant;
pub mod merchant_application;
pub mod notification;
pub mod order;
pub mod payment_method;
pub mod product;
pub mod user;
pub mod wishlist;
