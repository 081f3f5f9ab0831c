pub mod complaint_handler;

pub use complaint_handler::{
    __path_delete_complaint, __path_get_complaint, __path_list_complaints,
    __path_resolve_complaint, __path_submit_complaint, __path_update_complaint_status,
    delete_complaint, get_complaint, list_complaints, resolve_complaint, submit_complaint,
    update_complaint_status, ComplaintState,
};
