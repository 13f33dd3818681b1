// Elevated handlers: session plus an administrative role (admin, hr, pm).
pub mod settings;
pub mod users;
