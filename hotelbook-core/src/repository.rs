use async_trait::async_trait;
use hotelbook_shared::{Booking, BookingWithRoom, Enrollment, RoomOccupancy, Session, TicketWithType};

/// What a conditional insert did
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Created(Booking),
    /// The room was full (or gone) when the write ran
    NoVacancy,
    /// The user already held a booking when the write ran
    AlreadyBooked,
}

/// Booking lookup and writer
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// The user's most recent booking, with its room
    async fn find_by_user(
        &self,
        user_id: i32,
    ) -> Result<Option<BookingWithRoom>, Box<dyn std::error::Error + Send + Sync>>;

    /// Insert a booking for `(user_id, room_id)` if, at write time, the room
    /// still has a free slot and the user holds no booking yet.
    async fn create_booking(
        &self,
        user_id: i32,
        room_id: i32,
    ) -> Result<CreateOutcome, Box<dyn std::error::Error + Send + Sync>>;

    /// Repoint an existing booking to `room_id` under the same vacancy
    /// condition as `create_booking`.
    async fn update_booking_room(
        &self,
        booking_id: i32,
        room_id: i32,
    ) -> Result<Option<Booking>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Room lookup
#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn find_room_occupancy(
        &self,
        room_id: i32,
    ) -> Result<Option<RoomOccupancy>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Enrollment and ticket lookup
#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn find_enrollment_by_user(
        &self,
        user_id: i32,
    ) -> Result<Option<Enrollment>, Box<dyn std::error::Error + Send + Sync>>;

    async fn find_ticket_with_type(
        &self,
        enrollment_id: i32,
    ) -> Result<Option<TicketWithType>, Box<dyn std::error::Error + Send + Sync>>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn find_session(
        &self,
        token: &str,
    ) -> Result<Option<Session>, Box<dyn std::error::Error + Send + Sync>>;
}
