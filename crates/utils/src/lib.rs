pub mod jwt;
pub mod response;
pub mod text;
