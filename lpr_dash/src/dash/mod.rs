pub mod plate_svg;
pub mod cadastros;
pub mod camera;
pub mod mg3000;
pub mod control;
pub mod notify;
pub mod session;
pub mod bridge;
pub mod render;
