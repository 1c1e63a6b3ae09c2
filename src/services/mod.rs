pub mod picker_service;
pub mod post_edit_service;

pub use picker_service::PathPicker;
pub use post_edit_service::PostEditService;
