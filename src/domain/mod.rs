pub mod appointment;
pub mod auth;
pub mod case_worker;
pub mod conversation;
pub mod document;
pub mod event;
pub mod hours;
pub mod job;
pub mod message;
pub mod requirements;
pub mod service;
pub mod user;
pub mod validation;
