pub mod activity_service;
pub mod authorization;
pub mod case_service;
pub mod fund_request_service;
pub mod session_service;
pub mod user_service;
