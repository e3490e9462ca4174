pub mod booking;
pub mod room;
pub mod ticket;
pub mod session;
