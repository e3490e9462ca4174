pub mod models;

pub use models::booking::{Booking, BookingReceipt, BookingWithRoom};
pub use models::room::{Room, RoomOccupancy};
pub use models::ticket::{Enrollment, Ticket, TicketStatus, TicketType, TicketWithType};
pub use models::session::Session;
