use async_trait::async_trait;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{
    Allocation, AllocationFilter, NewAllocation, NewNotification, NewProject, NewSkill, NewUser,
    NewUserSkill, Notification, Project, Property, PropertyInput, PropertySearch, Role, Settings,
    Skill, User, UserSkill, UserSkillUpdate,
};

/// Offset window of a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: u64,
    pub limit: u64,
}

impl Pagination {
    /// `page` is 1-based.
    pub fn page(page: u64, limit: u64) -> Self {
        Self {
            skip: page.saturating_sub(1).saturating_mul(limit),
            limit,
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;
    /// The user with `id`, inserted from `user` on first sight.
    async fn find_or_create_user(&self, id: Uuid, user: NewUser) -> Result<User, DatabaseError>;
    async fn list_users(&self) -> Result<Vec<User>, DatabaseError>;
    async fn set_user_role(&self, id: Uuid, role: Role) -> Result<Option<User>, DatabaseError>;
    /// Flip `property` in the user's bookmarks and return whether it is now bookmarked.
    async fn toggle_bookmark(&self, user: Uuid, property: Uuid) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// Newest first, with the total number of listings.
    async fn list_properties(&self, page: Pagination) -> Result<(Vec<Property>, u64), DatabaseError>;
    async fn featured_properties(&self) -> Result<Vec<Property>, DatabaseError>;
    async fn search_properties(&self, search: &PropertySearch) -> Result<Vec<Property>, DatabaseError>;
    async fn properties_by_owner(&self, owner: Uuid) -> Result<Vec<Property>, DatabaseError>;
    async fn find_property(&self, id: Uuid) -> Result<Option<Property>, DatabaseError>;
    async fn find_properties(&self, ids: &[Uuid]) -> Result<Vec<Property>, DatabaseError>;
    async fn create_property(&self, owner: Uuid, input: PropertyInput) -> Result<Property, DatabaseError>;
    async fn update_property(&self, id: Uuid, input: PropertyInput) -> Result<Option<Property>, DatabaseError>;
    /// Also removes the property from every user's bookmarks.
    async fn delete_property(&self, id: Uuid) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait SkillStore: Send + Sync {
    /// Sorted by category, then name.
    async fn list_skills(&self) -> Result<Vec<Skill>, DatabaseError>;
    async fn find_skill(&self, id: Uuid) -> Result<Option<Skill>, DatabaseError>;
    async fn find_skill_by_name(&self, name: &str) -> Result<Option<Skill>, DatabaseError>;
    /// Fails with [`DatabaseError::Duplicate`] when the name exists ignoring case.
    async fn create_skill(&self, skill: NewSkill) -> Result<Skill, DatabaseError>;
    /// Also removes every user's rating of the skill.
    async fn delete_skill(&self, id: Uuid) -> Result<bool, DatabaseError>;

    async fn list_user_skills(&self, user: Uuid) -> Result<Vec<UserSkill>, DatabaseError>;
    async fn find_user_skill(&self, id: Uuid) -> Result<Option<UserSkill>, DatabaseError>;
    /// Fails with [`DatabaseError::Duplicate`] when the (user, skill) pair exists.
    async fn create_user_skill(&self, user_skill: NewUserSkill) -> Result<UserSkill, DatabaseError>;
    async fn update_user_skill(
        &self,
        id: Uuid,
        update: UserSkillUpdate,
    ) -> Result<Option<UserSkill>, DatabaseError>;
    async fn delete_user_skill(&self, id: Uuid) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<Project>, DatabaseError>;
    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, DatabaseError>;
    async fn create_project(&self, project: NewProject) -> Result<Project, DatabaseError>;

    async fn list_allocations(&self, filter: AllocationFilter) -> Result<Vec<Allocation>, DatabaseError>;
    async fn create_allocation(&self, allocation: NewAllocation) -> Result<Allocation, DatabaseError>;
    async fn delete_allocation(&self, id: Uuid) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// The user's notifications, newest first.
    async fn list_notifications(
        &self,
        user: Uuid,
        page: Pagination,
    ) -> Result<Vec<Notification>, DatabaseError>;
    async fn count_notifications(&self, user: Uuid) -> Result<u64, DatabaseError>;
    async fn count_unread(&self, user: Uuid) -> Result<u64, DatabaseError>;
    async fn find_notification(&self, id: Uuid) -> Result<Option<Notification>, DatabaseError>;
    async fn set_notification_read(
        &self,
        id: Uuid,
        is_read: bool,
    ) -> Result<Option<Notification>, DatabaseError>;
    /// Returns the number of notifications that changed.
    async fn mark_all_read(&self, user: Uuid) -> Result<u64, DatabaseError>;
    async fn create_notification(&self, notification: NewNotification) -> Result<Notification, DatabaseError>;
    async fn delete_notification(&self, id: Uuid) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Defaults when nothing was saved yet.
    async fn load_settings(&self) -> Result<Settings, DatabaseError>;
    async fn save_settings(&self, settings: Settings) -> Result<Settings, DatabaseError>;
}

/// Everything the handlers need from persistence.
#[async_trait]
pub trait Store:
    UserStore + PropertyStore + SkillStore + ProjectStore + NotificationStore + SettingsStore
{
    async fn ping(&self) -> Result<(), DatabaseError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_are_one_based() {
        assert_eq!(Pagination::page(1, 10), Pagination { skip: 0, limit: 10 });
        assert_eq!(Pagination::page(2, 10), Pagination { skip: 10, limit: 10 });
        assert_eq!(Pagination::page(0, 10), Pagination { skip: 0, limit: 10 });
    }
}
