pub mod support_handler;

pub use support_handler::{
    __path_add_support, __path_list_my_supports, __path_retract_support, add_support,
    list_my_supports, retract_support,
};
