use std::sync::Arc;

use hotelbook_shared::{BookingReceipt, BookingWithRoom, RoomOccupancy};
use tracing::{debug, info, warn};

use crate::eligibility::check_hotel_eligibility;
use crate::repository::{BookingRepository, CreateOutcome, RoomRepository, TicketRepository};
use crate::{BookingError, BookingResult, ForbiddenReason};

/// Decides whether a user may hold or move a hotel room booking.
///
/// Every call re-reads tickets, rooms and bookings through the injected
/// repositories. Failures are checked in a fixed order: the room must exist,
/// then have a free slot, then the user's ticket or booking is inspected.
/// The final write is conditional on vacancy, so two requests racing for the
/// last slot cannot both succeed. A user holds at most one booking; creating
/// a second one is refused, in the write as well as up front.
#[derive(Clone)]
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    rooms: Arc<dyn RoomRepository>,
    tickets: Arc<dyn TicketRepository>,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        rooms: Arc<dyn RoomRepository>,
        tickets: Arc<dyn TicketRepository>,
    ) -> Self {
        Self { bookings, rooms, tickets }
    }

    /// The caller's booking and its room
    pub async fn get_booking(&self, user_id: i32) -> BookingResult<BookingWithRoom> {
        self.bookings
            .find_by_user(user_id)
            .await?
            .ok_or(BookingError::BookingNotFound)
    }

    /// Reserve `room_id` for the user.
    pub async fn create_booking(
        &self,
        user_id: i32,
        room_id: Option<i32>,
    ) -> BookingResult<BookingReceipt> {
        let room = self.vacant_room(room_id).await?;
        let room_id = room.room.id;

        self.check_ticket(user_id).await?;

        if let Some(existing) = self.bookings.find_by_user(user_id).await? {
            debug!(user_id, booking_id = existing.id, "user already has a booking");
            return Err(ForbiddenReason::AlreadyBooked.into());
        }

        let booking = match self.bookings.create_booking(user_id, room_id).await? {
            CreateOutcome::Created(booking) => booking,
            CreateOutcome::NoVacancy => {
                warn!(user_id, room_id, "room filled up before booking was written");
                return Err(ForbiddenReason::NoVacancy.into());
            }
            CreateOutcome::AlreadyBooked => {
                warn!(user_id, room_id, "user booked elsewhere before booking was written");
                return Err(ForbiddenReason::AlreadyBooked.into());
            }
        };

        info!(user_id, room_id, booking_id = booking.id, "booking created");
        Ok(BookingReceipt { booking_id: booking.id })
    }

    /// Move the user's existing booking to `room_id`.
    ///
    /// `booking_id` is the id the caller addressed; it must be the booking
    /// the user actually holds.
    pub async fn update_booking(
        &self,
        user_id: i32,
        booking_id: i32,
        room_id: Option<i32>,
    ) -> BookingResult<BookingReceipt> {
        let room = self.vacant_room(room_id).await?;
        let room_id = room.room.id;

        let current = match self.bookings.find_by_user(user_id).await? {
            Some(booking) => booking,
            None => {
                debug!(user_id, "no booking to change");
                return Err(ForbiddenReason::NoExistingBooking.into());
            }
        };
        if current.id != booking_id {
            debug!(user_id, booking_id, owned = current.id, "booking id mismatch");
            return Err(ForbiddenReason::NotBookingOwner.into());
        }

        let booking = self
            .bookings
            .update_booking_room(current.id, room_id)
            .await?
            .ok_or_else(|| {
                warn!(user_id, room_id, "room filled up before booking was moved");
                BookingError::Forbidden(ForbiddenReason::NoVacancy)
            })?;

        info!(user_id, booking_id = booking.id, from = current.room.id, to = room_id, "booking moved");
        Ok(BookingReceipt { booking_id: booking.id })
    }

    /// Existence first, then capacity.
    async fn vacant_room(&self, room_id: Option<i32>) -> BookingResult<RoomOccupancy> {
        let room_id = room_id
            .filter(|id| *id > 0)
            .ok_or(BookingError::RoomNotFound)?;

        let room = self
            .rooms
            .find_room_occupancy(room_id)
            .await?
            .ok_or(BookingError::RoomNotFound)?;

        if room.is_full() {
            debug!(room_id, capacity = room.room.capacity, occupancy = room.occupancy, "room is full");
            return Err(ForbiddenReason::NoVacancy.into());
        }
        Ok(room)
    }

    async fn check_ticket(&self, user_id: i32) -> BookingResult<()> {
        let enrollment = self
            .tickets
            .find_enrollment_by_user(user_id)
            .await?
            .ok_or(ForbiddenReason::NoTicket)?;

        let ticket = self
            .tickets
            .find_ticket_with_type(enrollment.id)
            .await?
            .ok_or(ForbiddenReason::NoTicket)?;

        check_hotel_eligibility(&ticket).map_err(|reason| {
            debug!(user_id, ticket_id = ticket.ticket.id, %reason, "ticket not eligible for hotel");
            BookingError::from(reason)
        })
    }
}
