pub mod common {
    tonic::include_proto!("eats.common");
}

pub mod restaurant_service {
    tonic::include_proto!("eats.restaurant_service");
}
