pub mod ask_response;
pub mod ask_route;
