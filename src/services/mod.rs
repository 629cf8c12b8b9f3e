pub mod ai_service;
pub mod prompt_service;
pub mod question_bank;
pub mod response_validator;
pub mod rubric;
pub mod scoring;
pub mod selection_service;
pub mod session_service;
pub mod summary_service;
