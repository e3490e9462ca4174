use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use hotelbook_shared::{
    Booking, BookingWithRoom, Enrollment, Room, RoomOccupancy, Session, Ticket, TicketStatus,
    TicketType, TicketWithType,
};
use tokio::sync::Mutex;

use crate::repository::{
    BookingRepository, CreateOutcome, RoomRepository, SessionRepository, TicketRepository,
};

/// In-memory implementation of every repository, for tests and local runs.
///
/// All state sits behind a single mutex, so the vacancy and one-booking-per-user
/// checks and the write in `create_booking` / `update_booking_room` happen
/// atomically.
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    rooms: HashMap<i32, Room>,
    bookings: Vec<Booking>,
    enrollments: HashMap<i32, Enrollment>,
    tickets: HashMap<i32, TicketWithType>,
    sessions: HashMap<String, Session>,
    next_id: i32,
}

impl Inner {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn occupancy(&self, room_id: i32) -> i64 {
        self.bookings.iter().filter(|b| b.room_id == room_id).count() as i64
    }

    fn has_vacancy(&self, room_id: i32) -> bool {
        match self.rooms.get(&room_id) {
            Some(room) => self.occupancy(room_id) < i64::from(room.capacity),
            None => false,
        }
    }

    /// Most recent booking wins when a user somehow holds several
    fn latest_booking_for(&self, user_id: i32) -> Option<&Booking> {
        self.bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .max_by_key(|b| (b.created_at, b.id))
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    pub async fn add_room(&self, hotel_id: i32, name: &str, capacity: i32) -> Room {
        let mut inner = self.inner.lock().await;
        let room = Room::new(inner.next_id(), name, hotel_id, capacity);
        inner.rooms.insert(room.id, room.clone());
        room
    }

    /// Seed a booking without any vacancy check
    pub async fn add_booking(&self, user_id: i32, room_id: i32) -> Booking {
        let mut inner = self.inner.lock().await;
        let booking = Booking::new(inner.next_id(), user_id, room_id);
        inner.bookings.push(booking.clone());
        booking
    }

    /// Enroll the user and give them a ticket of a fresh ticket type
    pub async fn add_ticket(
        &self,
        user_id: i32,
        status: TicketStatus,
        is_remote: bool,
        includes_hotel: bool,
    ) -> TicketWithType {
        let mut inner = self.inner.lock().await;
        let now = Utc::now();

        let existing = inner.enrollments.get(&user_id).map(|e| e.id);
        let enrollment_id = match existing {
            Some(id) => id,
            None => {
                let enrollment = Enrollment { id: inner.next_id(), user_id };
                let id = enrollment.id;
                inner.enrollments.insert(user_id, enrollment);
                id
            }
        };

        let ticket_type = TicketType {
            id: inner.next_id(),
            name: format!("type-{}-{}", is_remote, includes_hotel),
            price: if includes_hotel { 600 } else { 250 },
            is_remote,
            includes_hotel,
            created_at: now,
            updated_at: now,
        };
        let ticket = TicketWithType {
            ticket: Ticket {
                id: inner.next_id(),
                enrollment_id,
                ticket_type_id: ticket_type.id,
                status,
                created_at: now,
                updated_at: now,
            },
            ticket_type,
        };
        inner.tickets.insert(enrollment_id, ticket.clone());
        ticket
    }

    pub async fn add_session(&self, user_id: i32, token: &str) -> Session {
        let mut inner = self.inner.lock().await;
        let session = Session {
            id: inner.next_id(),
            user_id,
            token: token.to_string(),
            created_at: Utc::now(),
        };
        inner.sessions.insert(session.token.clone(), session.clone());
        session
    }

    pub async fn occupancy(&self, room_id: i32) -> i64 {
        self.inner.lock().await.occupancy(room_id)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn find_by_user(
        &self,
        user_id: i32,
    ) -> Result<Option<BookingWithRoom>, Box<dyn std::error::Error + Send + Sync>> {
        let inner = self.inner.lock().await;
        let booking = match inner.latest_booking_for(user_id) {
            Some(booking) => booking,
            None => return Ok(None),
        };
        let room = inner
            .rooms
            .get(&booking.room_id)
            .cloned()
            .ok_or_else(|| format!("booking {} references missing room {}", booking.id, booking.room_id))?;

        Ok(Some(BookingWithRoom { id: booking.id, room }))
    }

    async fn create_booking(
        &self,
        user_id: i32,
        room_id: i32,
    ) -> Result<CreateOutcome, Box<dyn std::error::Error + Send + Sync>> {
        let mut inner = self.inner.lock().await;
        if !inner.has_vacancy(room_id) {
            return Ok(CreateOutcome::NoVacancy);
        }
        if inner.latest_booking_for(user_id).is_some() {
            return Ok(CreateOutcome::AlreadyBooked);
        }

        let booking = Booking::new(inner.next_id(), user_id, room_id);
        inner.bookings.push(booking.clone());
        Ok(CreateOutcome::Created(booking))
    }

    async fn update_booking_room(
        &self,
        booking_id: i32,
        room_id: i32,
    ) -> Result<Option<Booking>, Box<dyn std::error::Error + Send + Sync>> {
        let mut inner = self.inner.lock().await;
        if !inner.has_vacancy(room_id) {
            return Ok(None);
        }

        let booking = inner
            .bookings
            .iter_mut()
            .find(|b| b.id == booking_id)
            .ok_or_else(|| format!("booking {} does not exist", booking_id))?;
        booking.move_to(room_id);
        Ok(Some(booking.clone()))
    }
}

#[async_trait]
impl RoomRepository for InMemoryStore {
    async fn find_room_occupancy(
        &self,
        room_id: i32,
    ) -> Result<Option<RoomOccupancy>, Box<dyn std::error::Error + Send + Sync>> {
        let inner = self.inner.lock().await;
        Ok(inner.rooms.get(&room_id).map(|room| RoomOccupancy {
            room: room.clone(),
            occupancy: inner.occupancy(room_id),
        }))
    }
}

#[async_trait]
impl TicketRepository for InMemoryStore {
    async fn find_enrollment_by_user(
        &self,
        user_id: i32,
    ) -> Result<Option<Enrollment>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.inner.lock().await.enrollments.get(&user_id).cloned())
    }

    async fn find_ticket_with_type(
        &self,
        enrollment_id: i32,
    ) -> Result<Option<TicketWithType>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.inner.lock().await.tickets.get(&enrollment_id).cloned())
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn find_session(
        &self,
        token: &str,
    ) -> Result<Option<Session>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.inner.lock().await.sessions.get(token).cloned())
    }
}
