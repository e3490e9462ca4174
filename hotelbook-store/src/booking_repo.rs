use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres};
use hotelbook_core::repository::{BookingRepository, CreateOutcome};
use hotelbook_shared::{Booking, BookingWithRoom, Room};

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: i32,
    user_id: i32,
    room_id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: row.id,
            user_id: row.user_id,
            room_id: row.room_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRoomRow {
    booking_id: i32,
    room_id: i32,
    name: String,
    hotel_id: i32,
    capacity: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Locks the room row for the rest of the transaction and reports whether
/// a slot is still free. Concurrent writers for the same room queue on the
/// lock, so the count they see includes every committed booking.
async fn lock_room_with_vacancy(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    room_id: i32,
) -> Result<bool, sqlx::Error> {
    let capacity: Option<i32> = sqlx::query_scalar("SELECT capacity FROM rooms WHERE id = $1 FOR UPDATE")
        .bind(room_id)
        .fetch_optional(&mut **tx)
        .await?;

    let capacity = match capacity {
        Some(c) => c,
        None => return Ok(false),
    };

    let occupancy: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE room_id = $1")
        .bind(room_id)
        .fetch_one(&mut **tx)
        .await?;

    Ok(occupancy < i64::from(capacity))
}

async fn user_has_booking(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    user_id: i32,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM bookings WHERE user_id = $1)")
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await
}

/// Two creates for the same user in different rooms lock different rows, so
/// the loser only finds out through `bookings_user_id_key`.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn find_by_user(
        &self,
        user_id: i32,
    ) -> Result<Option<BookingWithRoom>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, BookingRoomRow>(
            r#"
            SELECT b.id AS booking_id, r.id AS room_id, r.name, r.hotel_id, r.capacity, r.created_at, r.updated_at
            FROM bookings b
            JOIN rooms r ON r.id = b.room_id
            WHERE b.user_id = $1
            ORDER BY b.created_at DESC, b.id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| BookingWithRoom {
            id: row.booking_id,
            room: Room {
                id: row.room_id,
                name: row.name,
                hotel_id: row.hotel_id,
                capacity: row.capacity,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }))
    }

    async fn create_booking(
        &self,
        user_id: i32,
        room_id: i32,
    ) -> Result<CreateOutcome, Box<dyn std::error::Error + Send + Sync>> {
        let mut tx = self.pool.begin().await?;

        if !lock_room_with_vacancy(&mut tx, room_id).await? {
            tx.rollback().await?;
            return Ok(CreateOutcome::NoVacancy);
        }
        if user_has_booking(&mut tx, user_id).await? {
            tx.rollback().await?;
            return Ok(CreateOutcome::AlreadyBooked);
        }

        let inserted = sqlx::query_as::<_, BookingRow>(
            r#"
            INSERT INTO bookings (user_id, room_id)
            VALUES ($1, $2)
            RETURNING id, user_id, room_id, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(room_id)
        .fetch_one(&mut *tx)
        .await;

        let row = match inserted {
            Ok(row) => row,
            Err(err) if is_unique_violation(&err) => {
                tx.rollback().await?;
                return Ok(CreateOutcome::AlreadyBooked);
            }
            Err(err) => return Err(err.into()),
        };

        tx.commit().await?;

        Ok(CreateOutcome::Created(row.into()))
    }

    async fn update_booking_room(
        &self,
        booking_id: i32,
        room_id: i32,
    ) -> Result<Option<Booking>, Box<dyn std::error::Error + Send + Sync>> {
        let mut tx = self.pool.begin().await?;

        if !lock_room_with_vacancy(&mut tx, room_id).await? {
            tx.rollback().await?;
            return Ok(None);
        }

        let row = sqlx::query_as::<_, BookingRow>(
            r#"
            UPDATE bookings SET room_id = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING id, user_id, room_id, created_at, updated_at
            "#,
        )
        .bind(room_id)
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| format!("booking {} does not exist", booking_id))?;

        tx.commit().await?;

        Ok(Some(row.into()))
    }
}
