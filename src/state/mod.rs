pub mod notice;
pub mod observable;
pub mod session;
