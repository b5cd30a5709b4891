pub mod course_map_response;
pub mod course_map_route;
