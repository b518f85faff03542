pub mod ack;
pub mod listing;
pub mod order;
pub mod user;
