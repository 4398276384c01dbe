pub mod board;
pub mod cascade;
pub mod matchers;
pub mod rotation;
pub mod scoring;
pub mod specials;
