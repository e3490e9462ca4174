pub mod app_config;
pub mod database;
pub mod booking_repo;
pub mod room_repo;
pub mod ticket_repo;
pub mod session_repo;

pub use database::DbClient;
pub use booking_repo::PgBookingRepository;
pub use room_repo::PgRoomRepository;
pub use ticket_repo::PgTicketRepository;
pub use session_repo::PgSessionRepository;
