pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{
    NotificationStore, Pagination, ProjectStore, PropertyStore, SettingsStore, SkillStore, Store,
    UserStore,
};
