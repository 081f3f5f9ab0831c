mod author;
mod complaint;
mod support;

pub use author::Author;
pub use complaint::{
    Complaint, ComplaintFilter, ComplaintStatus, ComplaintSummary, Jurisdiction, NewComplaint,
};
pub use support::Support;
