use bigdecimal::BigDecimal;
use chrono::NaiveTime;
use diesel::prelude::*;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tonic::transport::Server;
use tonic::{Request, Response, Status};
use tracing::info;
use uuid::Uuid;

use eats_proto::common::Money;
use eats_proto::restaurant_service::restaurant_service_server::{
    RestaurantService, RestaurantServiceServer,
};
use eats_proto::restaurant_service::{
    AdjustCashBalancePayload, AdjustCashBalanceResponse, CreateRestaurantPayload,
    CreateRestaurantResponse, Dish, GetCashBalancePayload, GetCashBalanceResponse,
    GetRestaurantPayload, GetRestaurantResponse, OpeningHours, ResolveRestaurantIdPayload,
    ResolveRestaurantIdResponse, Restaurant, SearchRestaurantsPayload, SearchRestaurantsResponse,
};

use eats_restaurant_service::error::StoreError;
use eats_restaurant_service::store::{NewRestaurant, OpenWindow, RestaurantStore, SearchCriteria};
use eats_restaurant_service::{establish_connection, models};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

#[derive(Default)]
pub struct RestaurantServiceImpl {}

fn parse_money(money: Option<Money>) -> Result<BigDecimal, Status> {
    money
        .ok_or(Status::invalid_argument("Amount required"))?
        .amount
        .parse::<BigDecimal>()
        .map_err(|_| Status::invalid_argument("Invalid amount"))
}

fn money(amount: &BigDecimal) -> Money {
    Money {
        amount: amount.to_string(),
    }
}

fn status_from_store_error(err: StoreError) -> Status {
    if err.is_not_found() {
        Status::not_found(err.to_string())
    } else {
        Status::internal("Unexpected internal error")
    }
}

fn restaurant_to_proto(
    restaurant: models::Restaurant,
    opening_hours: Vec<models::OpeningHours>,
    menus: Vec<models::Menu>,
) -> Restaurant {
    Restaurant {
        id: restaurant.id.to_string(),
        name: restaurant.name,
        cash_balance: Some(money(&restaurant.cash_balance)),
        updated: Some(prost_types::Timestamp {
            seconds: restaurant.updated.timestamp(),
            nanos: restaurant.updated.timestamp_subsec_nanos() as i32,
        }),
        opening_hours: opening_hours
            .into_iter()
            .map(|h| OpeningHours {
                day: h.day,
                start_time: h.start_time.format("%H:%M:%S").to_string(),
                end_time: h.end_time.format("%H:%M:%S").to_string(),
            })
            .collect(),
        menus: menus
            .into_iter()
            .map(|m| Dish {
                name: m.dish_name,
                price: Some(money(&m.price)),
            })
            .collect(),
    }
}

#[tonic::async_trait]
impl RestaurantService for RestaurantServiceImpl {
    async fn search_restaurants(
        &self,
        request: Request<SearchRestaurantsPayload>,
    ) -> Result<Response<SearchRestaurantsResponse>, Status> {
        let payload = request.into_inner();
        let open_at = match (payload.day, payload.time) {
            (Some(day), Some(time)) => {
                let time = time
                    .parse::<NaiveTime>()
                    .map_err(|_| Status::invalid_argument("Invalid time"))?;
                Some(OpenWindow { day, time })
            }
            (None, None) => None,
            _ => {
                return Err(Status::invalid_argument(
                    "day and time must be supplied together",
                ))
            }
        };
        let criteria = SearchCriteria {
            open_at,
            restaurant_name: payload.restaurant_name,
            dish_name: payload.dish_name,
        };

        let conn = &mut establish_connection();
        let result = RestaurantStore::new(conn)
            .search(&criteria)
            .map_err(status_from_store_error)?;

        Ok(Response::new(SearchRestaurantsResponse {
            restaurant_names: result.restaurant_names,
        }))
    }

    async fn create_restaurant(
        &self,
        request: Request<CreateRestaurantPayload>,
    ) -> Result<Response<CreateRestaurantResponse>, Status> {
        let payload = request.into_inner();
        let cash_balance = parse_money(payload.cash_balance)?;

        let conn = &mut establish_connection();
        let restaurant = RestaurantStore::new(conn)
            .create(NewRestaurant {
                name: payload.name,
                cash_balance,
            })
            .map_err(status_from_store_error)?;

        Ok(Response::new(CreateRestaurantResponse {
            restaurant: Some(restaurant_to_proto(restaurant, vec![], vec![])),
        }))
    }

    async fn get_restaurant(
        &self,
        request: Request<GetRestaurantPayload>,
    ) -> Result<Response<GetRestaurantResponse>, Status> {
        let payload = request.into_inner();
        let restaurant_id = payload
            .restaurant_id
            .parse::<Uuid>()
            .map_err(|_| Status::invalid_argument("Invalid restaurant id"))?;

        let mut conn = establish_connection();
        let restaurant = RestaurantStore::new(&mut conn)
            .get_by_id(&restaurant_id)
            .map_err(status_from_store_error)?;

        let opening_hours = models::OpeningHours::belonging_to(&restaurant)
            .select(models::OpeningHours::as_select())
            .load(&mut conn)
            .map_err(|_| Status::internal("Failed to load opening hours"))?;
        let menus = models::Menu::belonging_to(&restaurant)
            .select(models::Menu::as_select())
            .load(&mut conn)
            .map_err(|_| Status::internal("Failed to load menus"))?;

        Ok(Response::new(GetRestaurantResponse {
            restaurant: Some(restaurant_to_proto(restaurant, opening_hours, menus)),
        }))
    }

    async fn resolve_restaurant_id(
        &self,
        request: Request<ResolveRestaurantIdPayload>,
    ) -> Result<Response<ResolveRestaurantIdResponse>, Status> {
        let payload = request.into_inner();

        let conn = &mut establish_connection();
        let restaurant_id = RestaurantStore::new(conn)
            .resolve_id_by_name(&payload.name)
            .map_err(status_from_store_error)?;

        Ok(Response::new(ResolveRestaurantIdResponse {
            restaurant_id: restaurant_id.to_string(),
        }))
    }

    async fn get_cash_balance(
        &self,
        request: Request<GetCashBalancePayload>,
    ) -> Result<Response<GetCashBalanceResponse>, Status> {
        let payload = request.into_inner();
        let restaurant_id = payload
            .restaurant_id
            .parse::<Uuid>()
            .map_err(|_| Status::invalid_argument("Invalid restaurant id"))?;

        let conn = &mut establish_connection();
        let cash_balance = RestaurantStore::new(conn)
            .get_cash_balance(&restaurant_id)
            .map_err(status_from_store_error)?;

        Ok(Response::new(GetCashBalanceResponse {
            cash_balance: Some(money(&cash_balance)),
        }))
    }

    async fn adjust_cash_balance(
        &self,
        request: Request<AdjustCashBalancePayload>,
    ) -> Result<Response<AdjustCashBalanceResponse>, Status> {
        let payload = request.into_inner();
        let restaurant_id = payload
            .restaurant_id
            .parse::<Uuid>()
            .map_err(|_| Status::invalid_argument("Invalid restaurant id"))?;
        // The base balance arrives as an untrusted string and is coerced
        // here; the transaction amount is already a Money.
        let current_balance = payload
            .current_balance
            .parse::<BigDecimal>()
            .map_err(|_| Status::invalid_argument("Invalid current balance"))?;
        let transaction_amount = parse_money(payload.transaction_amount)?;

        let conn = &mut establish_connection();
        let adjustment = RestaurantStore::new(conn)
            .adjust_cash_balance(&restaurant_id, current_balance, transaction_amount)
            .map_err(status_from_store_error)?;

        Ok(Response::new(AdjustCashBalanceResponse {
            restaurant_id: adjustment.restaurant_id.to_string(),
            new_balance: Some(money(&adjustment.new_balance)),
        }))
    }
}

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut conn = establish_connection();
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");

    let addr = "0.0.0.0:8101".parse().unwrap();
    let restaurant_service = RestaurantServiceImpl::default();

    let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<RestaurantServiceServer<RestaurantServiceImpl>>()
        .await;

    info!("listening on {}", addr);

    Server::builder()
        .add_service(health_service)
        .add_service(RestaurantServiceServer::new(restaurant_service))
        .serve(addr)
        .await?;

    Ok(())
}
