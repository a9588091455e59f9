pub mod case_repo;
pub mod fund_request_repo;
pub mod org_repo;
pub mod session_repo;
pub mod user_repo;
