use std::sync::Arc;
use hotelbook_core::repository::{BookingRepository, RoomRepository, SessionRepository, TicketRepository};
use hotelbook_core::BookingService;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
}

#[derive(Clone)]
pub struct AppState {
    pub bookings: BookingService,
    pub sessions: Arc<dyn SessionRepository>,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        rooms: Arc<dyn RoomRepository>,
        tickets: Arc<dyn TicketRepository>,
        sessions: Arc<dyn SessionRepository>,
        auth: AuthConfig,
    ) -> Self {
        Self {
            bookings: BookingService::new(bookings, rooms, tickets),
            sessions,
            auth,
        }
    }
}
