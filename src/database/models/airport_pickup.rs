use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "airport_pickups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service_type: String,
    pub passengers: i16,
    pub arrival_flight_number: Option<String>,
    pub arrival_date: Option<Date>,
    pub arrival_time: Option<Time>,
    pub dropoff_location: Option<String>,
    pub departure_flight_number: Option<String>,
    pub departure_date: Option<Date>,
    pub departure_time: Option<Time>,
    pub pickup_location: Option<String>,
    pub price: i32,
    pub special_requests: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
