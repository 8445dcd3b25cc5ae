use bigdecimal::BigDecimal;
use chrono::{NaiveTime, Utc};
use diesel::{insert_into, prelude::*, update, PgConnection};
use diesel::sql_types::Text;
use uuid::Uuid;

use crate::error::StoreError;
use crate::{models, schema};

diesel::define_sql_function! {
    fn lower(x: Text) -> Text;
}

/// Day/time window a restaurant must be open at. The two always travel
/// together; there is no day-only or time-only filter path.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenWindow {
    pub day: String,
    pub time: NaiveTime,
}

#[derive(Debug, Clone, Default)]
pub struct SearchCriteria {
    pub open_at: Option<OpenWindow>,
    pub restaurant_name: Option<String>,
    pub dish_name: Option<String>,
}

/// Restaurant names matching a search, ordered by name descending.
///
/// The underlying query joins two one-to-many relations at once, so a
/// restaurant may appear once per matching joined row. Callers that want
/// distinct names must deduplicate themselves.
#[derive(Debug, PartialEq)]
pub struct SearchResult {
    pub restaurant_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRestaurant {
    pub name: String,
    pub cash_balance: BigDecimal,
}

#[derive(Debug, PartialEq)]
pub struct BalanceAdjustment {
    pub restaurant_id: Uuid,
    pub new_balance: BigDecimal,
}

/// Data access facade over the restaurant tables. Holds no state of its
/// own; the connection is injected by the caller, which owns its lifecycle.
pub struct RestaurantStore<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> RestaurantStore<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    pub fn search(&mut self, criteria: &SearchCriteria) -> Result<SearchResult, StoreError> {
        let mut query = schema::restaurants::table
            .left_join(schema::opening_hours::table)
            .left_join(schema::menus::table)
            .select(schema::restaurants::name)
            .order(schema::restaurants::name.desc())
            .into_boxed();

        if let Some(open_at) = &criteria.open_at {
            query = query
                .filter(lower(schema::opening_hours::day).eq(open_at.day.to_lowercase()))
                .filter(schema::opening_hours::start_time.lt(open_at.time))
                .filter(schema::opening_hours::end_time.gt(open_at.time));
        }
        if let Some(q) = &criteria.restaurant_name {
            query = query.filter(schema::restaurants::name.ilike(format!("%{}%", q)));
        }
        if let Some(q) = &criteria.dish_name {
            query = query.filter(schema::menus::dish_name.ilike(format!("%{}%", q)));
        }

        let restaurant_names = query.load::<String>(self.conn)?;
        Ok(SearchResult { restaurant_names })
    }

    pub fn create(&mut self, new_restaurant: NewRestaurant) -> Result<models::Restaurant, StoreError> {
        let restaurant = models::Restaurant {
            id: Uuid::new_v4(),
            name: new_restaurant.name,
            cash_balance: new_restaurant.cash_balance,
            updated: Utc::now(),
        };
        insert_into(schema::restaurants::table)
            .values(&restaurant)
            .execute(self.conn)?;
        Ok(restaurant)
    }

    /// Exact-name lookup. Duplicate names are not prevented at the schema
    /// level; the first match wins.
    pub fn resolve_id_by_name(&mut self, name: &str) -> Result<Uuid, StoreError> {
        let restaurant = schema::restaurants::table
            .filter(schema::restaurants::name.eq(name))
            .select(models::Restaurant::as_select())
            .first(self.conn)
            .optional()?;
        match restaurant {
            Some(restaurant) => Ok(restaurant.id),
            None => Err(StoreError::UnknownRestaurantName(name.to_string())),
        }
    }

    pub fn get_by_id(&mut self, id: &Uuid) -> Result<models::Restaurant, StoreError> {
        schema::restaurants::table
            .find(id)
            .select(models::Restaurant::as_select())
            .first(self.conn)
            .optional()?
            .ok_or(StoreError::RestaurantNotFound(*id))
    }

    pub fn get_cash_balance(&mut self, id: &Uuid) -> Result<BigDecimal, StoreError> {
        let restaurant = schema::restaurants::table
            .find(id)
            .select(models::Restaurant::as_select())
            .first(self.conn)
            .optional()?;
        match restaurant {
            Some(restaurant) => Ok(restaurant.cash_balance),
            None => Err(StoreError::RestaurantNotFound(*id)),
        }
    }

    /// Overwrites the stored balance with `current_balance +
    /// transaction_amount`. The base comes from the caller, not from the
    /// freshly fetched row, so concurrent adjustments can lose updates.
    pub fn adjust_cash_balance(
        &mut self,
        id: &Uuid,
        current_balance: BigDecimal,
        transaction_amount: BigDecimal,
    ) -> Result<BalanceAdjustment, StoreError> {
        let restaurant = self.get_by_id(id)?;
        let new_balance = current_balance + transaction_amount;
        update(schema::restaurants::table)
            .set(schema::restaurants::cash_balance.eq(new_balance.clone()))
            .filter(schema::restaurants::id.eq(&restaurant.id))
            .execute(self.conn)?;
        Ok(BalanceAdjustment {
            restaurant_id: restaurant.id,
            new_balance,
        })
    }
}
