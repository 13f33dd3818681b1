// Protected handlers: a resolved session user is required (401 otherwise).
// Role checks happen inside the handlers that need them.
pub mod allocations;
pub mod auth;
pub mod bookmarks;
pub mod notifications;
pub mod projects;
pub mod properties;
pub mod skills;
pub mod user_skills;
