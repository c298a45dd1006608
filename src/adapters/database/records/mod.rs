pub mod appointment;
pub mod case_worker;
pub mod document;
pub mod job;
pub mod message;
pub mod service;
pub mod user;

pub use appointment::AppointmentRecord;
pub use case_worker::CaseWorkerRecord;
pub use document::DocumentRecord;
pub use job::JobRecord;
pub use message::{ContactRecord, ConversationSummaryRecord, MessageRecord};
pub use service::ServiceRecord;
pub use user::UserRecord;
