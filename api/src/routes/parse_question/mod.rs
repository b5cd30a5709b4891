pub mod parse_question_route;
