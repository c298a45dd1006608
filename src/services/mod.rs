pub mod account_service;
pub mod appointment_service;
pub mod auth_service;
pub mod case_worker_service;
pub mod directory_service;
pub mod document_service;
pub mod health_service;
pub mod job_service;
pub mod message_service;
pub mod rate_limit_service;
pub mod relay;
