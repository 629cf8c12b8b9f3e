pub mod analysis;
pub mod question;
pub mod session;
