pub mod page_ctl;
pub mod cadastros_ctl;
pub mod camera_ctl;
pub mod mg3000_ctl;
