use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::{menus, opening_hours, restaurants};

#[derive(Queryable, Selectable, Identifiable, Insertable, Debug, PartialEq, Clone)]
#[diesel(table_name = restaurants)]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub cash_balance: BigDecimal,
    pub updated: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, PartialEq)]
#[diesel(belongs_to(Restaurant))]
#[diesel(table_name = opening_hours)]
pub struct OpeningHours {
    pub id: i32,
    pub restaurant_id: Uuid,
    pub day: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Insertable, Debug, PartialEq)]
#[diesel(table_name = opening_hours)]
pub struct NewOpeningHours {
    pub restaurant_id: Uuid,
    pub day: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, PartialEq)]
#[diesel(belongs_to(Restaurant))]
#[diesel(table_name = menus)]
pub struct Menu {
    pub id: i32,
    pub restaurant_id: Uuid,
    pub dish_name: String,
    pub price: BigDecimal,
}

#[derive(Insertable, Debug, PartialEq)]
#[diesel(table_name = menus)]
pub struct NewMenu {
    pub restaurant_id: Uuid,
    pub dish_name: String,
    pub price: BigDecimal,
}
