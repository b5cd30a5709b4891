pub mod store_course_info_request;
pub mod store_course_info_route;
