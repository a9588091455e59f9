pub mod activity;
pub mod casa_case;
pub mod fund_request;
pub mod orgs;
pub mod session;
pub mod user;
