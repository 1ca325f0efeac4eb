pub mod arrangement;
pub mod catalog;
pub mod notice;
pub mod rules;
pub mod selector;
pub mod session;
pub mod verifier;
