pub mod ask;
pub mod course_map;
pub mod parse_question;
pub mod question_request;
pub mod search;
pub mod store_course_info;
