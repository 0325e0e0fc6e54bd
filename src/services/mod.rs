pub mod accounts;
pub mod contact;
pub mod media;
pub mod providers;
pub mod reviews;
