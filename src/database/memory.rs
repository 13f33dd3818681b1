use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{
    Allocation, AllocationFilter, NewAllocation, NewNotification, NewProject, NewSkill, NewUser,
    NewUserSkill, Notification, Project, Property, PropertyInput, PropertySearch, Role, Settings,
    Skill, User, UserSkill, UserSkillUpdate,
};
use super::store::{
    NotificationStore, Pagination, ProjectStore, PropertyStore, SettingsStore, SkillStore, Store,
    UserStore,
};

#[derive(Default)]
struct Collections {
    users: HashMap<Uuid, User>,
    properties: Vec<Property>,
    skills: Vec<Skill>,
    user_skills: Vec<UserSkill>,
    projects: Vec<Project>,
    allocations: Vec<Allocation>,
    notifications: Vec<Notification>,
    settings: Option<Settings>,
}

/// Store kept in process memory. Collections hold documents in insertion
/// order, which doubles as creation order.
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<Collections>,
    operations: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store calls served so far.
    pub fn operations(&self) -> u64 {
        self.operations.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.operations.fetch_add(1, Ordering::SeqCst);
    }
}

/// Sort by creation time, newest first. Reversing first keeps documents
/// created within the same instant in reverse insertion order.
fn newest_first<T, I, F>(items: I, created: F) -> Vec<T>
where
    I: DoubleEndedIterator<Item = T>,
    F: Fn(&T) -> DateTime<Utc>,
{
    let mut items: Vec<T> = items.rev().collect();
    items.sort_by(|a, b| created(b).cmp(&created(a)));
    items
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        self.touch();
        user.validate()?;
        let mut data = self.data.write().await;
        let email = user.email.trim().to_lowercase();
        if data.users.values().any(|u| u.email == email) {
            return Err(DatabaseError::Duplicate(format!("User with email '{}' already exists", email)));
        }
        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            email,
            name: user.name.trim().to_string(),
            image: user.image,
            role: user.role,
            bookmarks: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        data.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        self.touch();
        Ok(self.data.read().await.users.get(&id).cloned())
    }

    async fn find_or_create_user(&self, id: Uuid, user: NewUser) -> Result<User, DatabaseError> {
        self.touch();
        let mut data = self.data.write().await;
        if let Some(found) = data.users.get(&id) {
            return Ok(found.clone());
        }

        user.validate()?;
        let email = user.email.trim().to_lowercase();
        if data.users.values().any(|u| u.email == email) {
            return Err(DatabaseError::Duplicate(format!("User with email '{}' already exists", email)));
        }
        let now = Utc::now();
        let created = User {
            id,
            email,
            name: user.name.trim().to_string(),
            image: user.image,
            role: user.role,
            bookmarks: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        data.users.insert(id, created.clone());
        Ok(created)
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        self.touch();
        let mut users: Vec<User> = self.data.read().await.users.values().cloned().collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn set_user_role(&self, id: Uuid, role: Role) -> Result<Option<User>, DatabaseError> {
        self.touch();
        let mut data = self.data.write().await;
        Ok(data.users.get_mut(&id).map(|user| {
            user.role = role;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn toggle_bookmark(&self, user: Uuid, property: Uuid) -> Result<bool, DatabaseError> {
        self.touch();
        let mut data = self.data.write().await;
        let user = data
            .users
            .get_mut(&user)
            .ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))?;

        let bookmarked = if let Some(pos) = user.bookmarks.iter().position(|b| *b == property) {
            user.bookmarks.remove(pos);
            false
        } else {
            user.bookmarks.push(property);
            true
        };
        user.updated_at = Utc::now();
        Ok(bookmarked)
    }
}

#[async_trait]
impl PropertyStore for MemoryStore {
    async fn list_properties(&self, page: Pagination) -> Result<(Vec<Property>, u64), DatabaseError> {
        self.touch();
        let data = self.data.read().await;
        let total = data.properties.len() as u64;
        let properties = newest_first(data.properties.iter().cloned(), |p| p.created_at)
            .into_iter()
            .skip(page.skip as usize)
            .take(page.limit as usize)
            .collect();
        Ok((properties, total))
    }

    async fn featured_properties(&self) -> Result<Vec<Property>, DatabaseError> {
        self.touch();
        let data = self.data.read().await;
        Ok(newest_first(
            data.properties.iter().filter(|p| p.is_featured).cloned(),
            |p| p.created_at,
        ))
    }

    async fn search_properties(&self, search: &PropertySearch) -> Result<Vec<Property>, DatabaseError> {
        self.touch();
        let data = self.data.read().await;
        Ok(newest_first(
            data.properties.iter().filter(|p| p.matches(search)).cloned(),
            |p| p.created_at,
        ))
    }

    async fn properties_by_owner(&self, owner: Uuid) -> Result<Vec<Property>, DatabaseError> {
        self.touch();
        let data = self.data.read().await;
        Ok(newest_first(
            data.properties.iter().filter(|p| p.owner == owner).cloned(),
            |p| p.created_at,
        ))
    }

    async fn find_property(&self, id: Uuid) -> Result<Option<Property>, DatabaseError> {
        self.touch();
        Ok(self.data.read().await.properties.iter().find(|p| p.id == id).cloned())
    }

    async fn find_properties(&self, ids: &[Uuid]) -> Result<Vec<Property>, DatabaseError> {
        self.touch();
        let data = self.data.read().await;
        Ok(data
            .properties
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn create_property(&self, owner: Uuid, input: PropertyInput) -> Result<Property, DatabaseError> {
        self.touch();
        let input = input.normalized();
        input.validate()?;
        let mut data = self.data.write().await;
        if !data.users.contains_key(&owner) {
            return Err(DatabaseError::NotFound("Owner not found".to_string()));
        }
        let now = Utc::now();
        let property = Property {
            id: Uuid::new_v4(),
            owner,
            name: input.name,
            property_type: input.property_type,
            description: input.description,
            location: input.location,
            beds: input.beds,
            baths: input.baths,
            square_feet: input.square_feet,
            amenities: input.amenities,
            rates: input.rates,
            seller_info: input.seller_info,
            images: input.images,
            is_featured: input.is_featured,
            created_at: now,
            updated_at: now,
        };
        data.properties.push(property.clone());
        Ok(property)
    }

    async fn update_property(&self, id: Uuid, input: PropertyInput) -> Result<Option<Property>, DatabaseError> {
        self.touch();
        let input = input.normalized();
        input.validate()?;
        let mut data = self.data.write().await;
        Ok(data.properties.iter_mut().find(|p| p.id == id).map(|property| {
            property.name = input.name;
            property.property_type = input.property_type;
            property.description = input.description;
            property.location = input.location;
            property.beds = input.beds;
            property.baths = input.baths;
            property.square_feet = input.square_feet;
            property.amenities = input.amenities;
            property.rates = input.rates;
            property.seller_info = input.seller_info;
            property.images = input.images;
            property.is_featured = input.is_featured;
            property.updated_at = Utc::now();
            property.clone()
        }))
    }

    async fn delete_property(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.touch();
        let mut data = self.data.write().await;
        let before = data.properties.len();
        data.properties.retain(|p| p.id != id);
        if data.properties.len() == before {
            return Ok(false);
        }
        for user in data.users.values_mut() {
            user.bookmarks.retain(|b| *b != id);
        }
        Ok(true)
    }
}

#[async_trait]
impl SkillStore for MemoryStore {
    async fn list_skills(&self) -> Result<Vec<Skill>, DatabaseError> {
        self.touch();
        let mut skills = self.data.read().await.skills.clone();
        skills.sort_by(Skill::catalog_order);
        Ok(skills)
    }

    async fn find_skill(&self, id: Uuid) -> Result<Option<Skill>, DatabaseError> {
        self.touch();
        Ok(self.data.read().await.skills.iter().find(|s| s.id == id).cloned())
    }

    async fn find_skill_by_name(&self, name: &str) -> Result<Option<Skill>, DatabaseError> {
        self.touch();
        Ok(self.data.read().await.skills.iter().find(|s| s.has_name(name)).cloned())
    }

    async fn create_skill(&self, skill: NewSkill) -> Result<Skill, DatabaseError> {
        self.touch();
        let skill = skill.normalized();
        skill.validate()?;
        let mut data = self.data.write().await;
        if data.skills.iter().any(|s| s.has_name(&skill.name)) {
            return Err(DatabaseError::Duplicate("Skill already exists".to_string()));
        }
        let now = Utc::now();
        let created = Skill {
            id: Uuid::new_v4(),
            name: skill.name,
            category: skill.category,
            description: skill.description,
            created_at: now,
            updated_at: now,
        };
        data.skills.push(created.clone());
        Ok(created)
    }

    async fn delete_skill(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.touch();
        let mut data = self.data.write().await;
        let before = data.skills.len();
        data.skills.retain(|s| s.id != id);
        if data.skills.len() == before {
            return Ok(false);
        }
        data.user_skills.retain(|us| us.skill != id);
        Ok(true)
    }

    async fn list_user_skills(&self, user: Uuid) -> Result<Vec<UserSkill>, DatabaseError> {
        self.touch();
        let data = self.data.read().await;
        Ok(data.user_skills.iter().filter(|us| us.user == user).cloned().collect())
    }

    async fn find_user_skill(&self, id: Uuid) -> Result<Option<UserSkill>, DatabaseError> {
        self.touch();
        Ok(self.data.read().await.user_skills.iter().find(|us| us.id == id).cloned())
    }

    async fn create_user_skill(&self, user_skill: NewUserSkill) -> Result<UserSkill, DatabaseError> {
        self.touch();
        user_skill.validate()?;
        let mut data = self.data.write().await;
        if !data.users.contains_key(&user_skill.user) {
            return Err(DatabaseError::NotFound("User not found".to_string()));
        }
        if !data.skills.iter().any(|s| s.id == user_skill.skill) {
            return Err(DatabaseError::NotFound("Skill not found".to_string()));
        }
        if data
            .user_skills
            .iter()
            .any(|us| us.user == user_skill.user && us.skill == user_skill.skill)
        {
            return Err(DatabaseError::Duplicate("User already has this skill".to_string()));
        }
        let now = Utc::now();
        let created = UserSkill {
            id: Uuid::new_v4(),
            user: user_skill.user,
            skill: user_skill.skill,
            proficiency_level: user_skill.proficiency_level,
            interest_level: user_skill.interest_level,
            is_current: user_skill.is_current,
            created_at: now,
            updated_at: now,
        };
        data.user_skills.push(created.clone());
        Ok(created)
    }

    async fn update_user_skill(
        &self,
        id: Uuid,
        update: UserSkillUpdate,
    ) -> Result<Option<UserSkill>, DatabaseError> {
        self.touch();
        update.validate()?;
        let mut data = self.data.write().await;
        Ok(data.user_skills.iter_mut().find(|us| us.id == id).map(|user_skill| {
            update.apply(user_skill);
            user_skill.updated_at = Utc::now();
            user_skill.clone()
        }))
    }

    async fn delete_user_skill(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.touch();
        let mut data = self.data.write().await;
        let before = data.user_skills.len();
        data.user_skills.retain(|us| us.id != id);
        Ok(data.user_skills.len() != before)
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn list_projects(&self) -> Result<Vec<Project>, DatabaseError> {
        self.touch();
        let data = self.data.read().await;
        Ok(newest_first(data.projects.iter().cloned(), |p| p.created_at))
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, DatabaseError> {
        self.touch();
        Ok(self.data.read().await.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn create_project(&self, project: NewProject) -> Result<Project, DatabaseError> {
        self.touch();
        let project = project.normalized();
        project.validate()?;
        let mut data = self.data.write().await;
        let manager = project
            .project_manager
            .filter(|id| data.users.contains_key(id))
            .ok_or_else(|| DatabaseError::NotFound("Project manager not found".to_string()))?;
        let now = Utc::now();
        let created = Project {
            id: Uuid::new_v4(),
            name: project.name,
            description: project.description,
            status: project.status,
            project_manager: manager,
            start_date: project.start_date,
            end_date: project.end_date,
            created_at: now,
            updated_at: now,
        };
        data.projects.push(created.clone());
        Ok(created)
    }

    async fn list_allocations(&self, filter: AllocationFilter) -> Result<Vec<Allocation>, DatabaseError> {
        self.touch();
        let data = self.data.read().await;
        Ok(newest_first(
            data.allocations.iter().filter(|a| filter.matches(a)).cloned(),
            |a| a.created_at,
        ))
    }

    async fn create_allocation(&self, allocation: NewAllocation) -> Result<Allocation, DatabaseError> {
        self.touch();
        allocation.validate()?;
        let mut data = self.data.write().await;
        if !data.users.contains_key(&allocation.user)
            || !data.projects.iter().any(|p| p.id == allocation.project)
        {
            return Err(DatabaseError::NotFound("User or project not found".to_string()));
        }
        let now = Utc::now();
        let created = Allocation {
            id: Uuid::new_v4(),
            user: allocation.user,
            project: allocation.project,
            percentage: allocation.percentage,
            role: allocation.role,
            start_date: allocation.start_date,
            end_date: allocation.end_date,
            created_at: now,
            updated_at: now,
        };
        data.allocations.push(created.clone());
        Ok(created)
    }

    async fn delete_allocation(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.touch();
        let mut data = self.data.write().await;
        let before = data.allocations.len();
        data.allocations.retain(|a| a.id != id);
        Ok(data.allocations.len() != before)
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn list_notifications(
        &self,
        user: Uuid,
        page: Pagination,
    ) -> Result<Vec<Notification>, DatabaseError> {
        self.touch();
        let data = self.data.read().await;
        Ok(newest_first(
            data.notifications.iter().filter(|n| n.user == user).cloned(),
            |n| n.created_at,
        )
        .into_iter()
        .skip(page.skip as usize)
        .take(page.limit as usize)
        .collect())
    }

    async fn count_notifications(&self, user: Uuid) -> Result<u64, DatabaseError> {
        self.touch();
        let data = self.data.read().await;
        Ok(data.notifications.iter().filter(|n| n.user == user).count() as u64)
    }

    async fn count_unread(&self, user: Uuid) -> Result<u64, DatabaseError> {
        self.touch();
        let data = self.data.read().await;
        Ok(data
            .notifications
            .iter()
            .filter(|n| n.user == user && !n.is_read)
            .count() as u64)
    }

    async fn find_notification(&self, id: Uuid) -> Result<Option<Notification>, DatabaseError> {
        self.touch();
        Ok(self.data.read().await.notifications.iter().find(|n| n.id == id).cloned())
    }

    async fn set_notification_read(
        &self,
        id: Uuid,
        is_read: bool,
    ) -> Result<Option<Notification>, DatabaseError> {
        self.touch();
        let mut data = self.data.write().await;
        Ok(data.notifications.iter_mut().find(|n| n.id == id).map(|notification| {
            if notification.is_read != is_read {
                notification.is_read = is_read;
                notification.updated_at = Utc::now();
            }
            notification.clone()
        }))
    }

    async fn mark_all_read(&self, user: Uuid) -> Result<u64, DatabaseError> {
        self.touch();
        let mut data = self.data.write().await;
        let now = Utc::now();
        let mut modified = 0;
        for notification in data
            .notifications
            .iter_mut()
            .filter(|n| n.user == user && !n.is_read)
        {
            notification.is_read = true;
            notification.updated_at = now;
            modified += 1;
        }
        Ok(modified)
    }

    async fn create_notification(&self, notification: NewNotification) -> Result<Notification, DatabaseError> {
        self.touch();
        notification.validate()?;
        let mut data = self.data.write().await;
        if !data.users.contains_key(&notification.user) {
            return Err(DatabaseError::NotFound("User not found".to_string()));
        }
        let now = Utc::now();
        let created = Notification {
            id: Uuid::new_v4(),
            user: notification.user,
            message: notification.message,
            is_read: false,
            link: notification.link,
            created_at: now,
            updated_at: now,
        };
        data.notifications.push(created.clone());
        Ok(created)
    }

    async fn delete_notification(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.touch();
        let mut data = self.data.write().await;
        let before = data.notifications.len();
        data.notifications.retain(|n| n.id != id);
        Ok(data.notifications.len() != before)
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn load_settings(&self) -> Result<Settings, DatabaseError> {
        self.touch();
        Ok(self.data.read().await.settings.clone().unwrap_or_default())
    }

    async fn save_settings(&self, mut settings: Settings) -> Result<Settings, DatabaseError> {
        self.touch();
        settings.updated_at = Some(Utc::now());
        self.data.write().await.settings = Some(settings.clone());
        Ok(settings)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
