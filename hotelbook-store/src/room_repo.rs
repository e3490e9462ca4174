use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use hotelbook_core::repository::RoomRepository;
use hotelbook_shared::{Room, RoomOccupancy};

pub struct PgRoomRepository {
    pool: PgPool,
}

impl PgRoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct RoomRow {
    id: i32,
    name: String,
    hotel_id: i32,
    capacity: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    occupancy: i64,
}

#[async_trait]
impl RoomRepository for PgRoomRepository {
    async fn find_room_occupancy(
        &self,
        room_id: i32,
    ) -> Result<Option<RoomOccupancy>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, RoomRow>(
            r#"
            SELECT r.id, r.name, r.hotel_id, r.capacity, r.created_at, r.updated_at,
                   (SELECT COUNT(*) FROM bookings b WHERE b.room_id = r.id) AS occupancy
            FROM rooms r
            WHERE r.id = $1
            "#,
        )
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| RoomOccupancy {
            room: Room {
                id: row.id,
                name: row.name,
                hotel_id: row.hotel_id,
                capacity: row.capacity,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            occupancy: row.occupancy,
        }))
    }
}
