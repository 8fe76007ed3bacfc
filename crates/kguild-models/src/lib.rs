pub mod id;
pub mod response;
pub mod vote;
