pub mod json_document_repo;
pub mod json_user_repo;
pub mod json_activity_repo;
