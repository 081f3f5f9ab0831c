pub mod complaint_dto;

pub use complaint_dto::{
    ChangeStatusDto, ComplaintResponseDto, CreateComplaintDto, DeleteComplaintQuery,
    DeletionResponseDto, ListComplaintsQuery, SubmissionResponseDto,
};
