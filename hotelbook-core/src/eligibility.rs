use hotelbook_shared::{TicketStatus, TicketWithType};

use crate::ForbiddenReason;

/// Only paid, in-person tickets that include the hotel may book a room.
pub fn check_hotel_eligibility(ticket: &TicketWithType) -> Result<(), ForbiddenReason> {
    if ticket.ticket.status != TicketStatus::Paid {
        return Err(ForbiddenReason::TicketNotPaid);
    }
    if ticket.ticket_type.is_remote {
        return Err(ForbiddenReason::RemoteTicket);
    }
    if !ticket.ticket_type.includes_hotel {
        return Err(ForbiddenReason::HotelNotIncluded);
    }
    Ok(())
}
