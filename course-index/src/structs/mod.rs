pub mod course_filters;
pub mod course_hit;
pub mod course_record;
