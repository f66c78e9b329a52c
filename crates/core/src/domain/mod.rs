pub mod document;
pub mod notification;
pub mod org;
pub mod rank;
pub mod request;
pub mod review;
pub mod user;
