mod complaint_service;
mod deletion_service;
mod grouping_service;
mod proximity;

pub use complaint_service::ComplaintService;
pub use deletion_service::{DeletionOutcome, DeletionService};
pub use grouping_service::{GroupingOutcome, GroupingService, Submission, SubmissionResult};
pub use proximity::ProximitySearch;
