pub mod support_dto;

pub use support_dto::{AddSupportDto, SupportResponseDto, SupportResultResponseDto};
