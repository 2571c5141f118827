pub mod accept;
pub mod domain;
pub mod error;
pub mod protocol;
