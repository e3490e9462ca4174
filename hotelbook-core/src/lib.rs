pub mod repository;
pub mod eligibility;
pub mod booking;
pub mod memory;

pub use booking::BookingService;
pub use memory::InMemoryStore;

/// Why a booking request was refused (HTTP 403)
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ForbiddenReason {
    #[error("room has no vacancy")]
    NoVacancy,
    #[error("user has no ticket")]
    NoTicket,
    #[error("ticket is not paid")]
    TicketNotPaid,
    #[error("ticket is for remote attendance")]
    RemoteTicket,
    #[error("ticket does not include hotel")]
    HotelNotIncluded,
    #[error("user already has a booking")]
    AlreadyBooked,
    #[error("user has no booking to change")]
    NoExistingBooking,
    #[error("booking belongs to another user")]
    NotBookingOwner,
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Booking not found")]
    BookingNotFound,
    #[error("Room not found")]
    RoomNotFound,
    #[error("Forbidden: {0}")]
    Forbidden(#[from] ForbiddenReason),
    #[error("Repository error: {0}")]
    Repository(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type BookingResult<T> = Result<T, BookingError>;
