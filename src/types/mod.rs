pub mod article;
pub mod category;
pub mod comment;
pub mod response;
pub mod user;
