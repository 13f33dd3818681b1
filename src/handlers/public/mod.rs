// Public handlers: no session required.
pub mod home;
pub mod properties;
