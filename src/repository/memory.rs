use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{DUPLICATE_HIGHLIGHT, DUPLICATE_USERNAME, Repository};
use crate::{
    error::{AppError, AppResult},
    models::{
        ACADEMIC_RESOURCE_KIND, Account, AccountProfile, Achievement, Blog, EditEventPostRequest,
        EventHighlight, EventPost, NewAccount, NewAchievement, NewBlog, NewEventPost, NewNotice,
        NewResearchPost, NewResource, Notice, ResearchPost, Resource, StoredCredentials,
        TeacherProfileUpdate,
    },
    moderation::{ModerationStatus, Role, Visibility},
};

#[derive(Default)]
struct Tables {
    accounts: Vec<StoredCredentials>,
    resources: Vec<Resource>,
    blogs: Vec<Blog>,
    notices: Vec<Notice>,
    research_posts: Vec<ResearchPost>,
    highlights: Vec<EventHighlight>,
    event_posts: Vec<EventPost>,
    achievements: Vec<Achievement>,
}

/// MemoryRepository
///
/// A `Repository` held entirely in process memory. Enforces the same
/// uniqueness and ordering rules as the Postgres schema; used by the test
/// suite and for running the API without a database.
#[derive(Default)]
pub struct MemoryRepository {
    tables: Mutex<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> AppResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("memory repository lock poisoned")))
    }
}

/// Newest first. Among equal timestamps the later insert wins.
fn newest_first<T: Clone>(rows: &[T], created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut rows: Vec<T> = rows.iter().rev().cloned().collect();
    rows.sort_by_key(|row| std::cmp::Reverse(created_at(row)));
    rows
}

fn remove_by<T>(rows: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> bool {
    let before = rows.len();
    rows.retain(|row| !matches(row));
    rows.len() != before
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn create_account(&self, account: NewAccount) -> AppResult<Account> {
        let mut tables = self.tables()?;
        if tables
            .accounts
            .iter()
            .any(|c| c.account.username == account.username)
        {
            return Err(AppError::Conflict(DUPLICATE_USERNAME.to_string()));
        }

        let created = Account {
            id: Uuid::new_v4(),
            username: account.username,
            name: account.name,
            status: account.status,
            profile: account.profile,
            attendance: account.attendance,
            created_at: Utc::now(),
        };
        tables.accounts.push(StoredCredentials {
            account: created.clone(),
            password_hash: account.password_hash,
        });
        Ok(created)
    }

    async fn find_credentials(&self, username: &str) -> AppResult<Option<StoredCredentials>> {
        Ok(self
            .tables()?
            .accounts
            .iter()
            .find(|c| c.account.username == username)
            .cloned())
    }

    async fn get_account(&self, id: Uuid) -> AppResult<Option<Account>> {
        Ok(self
            .tables()?
            .accounts
            .iter()
            .find(|c| c.account.id == id)
            .map(|c| c.account.clone()))
    }

    async fn approve_student(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables()?;
        let student = tables
            .accounts
            .iter_mut()
            .find(|c| c.account.id == id && c.account.role() == Role::Student);

        Ok(match student {
            Some(creds) => {
                creds.account.status = creds.account.status.approve();
                true
            }
            None => false,
        })
    }

    async fn list_accounts(
        &self,
        role: Role,
        status: ModerationStatus,
    ) -> AppResult<Vec<Account>> {
        let mut accounts: Vec<Account> = self
            .tables()?
            .accounts
            .iter()
            .map(|c| &c.account)
            .filter(|a| a.role() == role && a.status == status)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(accounts)
    }

    async fn update_teacher_profile(
        &self,
        username: &str,
        update: TeacherProfileUpdate,
    ) -> AppResult<Option<Account>> {
        let mut tables = self.tables()?;
        let Some(creds) = tables
            .accounts
            .iter_mut()
            .find(|c| c.account.username == username)
        else {
            return Ok(None);
        };

        let AccountProfile::Teacher {
            qualifications,
            bio,
            profile_picture,
            ..
        } = &mut creds.account.profile
        else {
            return Ok(None);
        };

        if let Some(value) = update.qualifications {
            *qualifications = value;
        }
        if let Some(value) = update.bio {
            *bio = value;
        }
        if let Some(value) = update.profile_picture {
            *profile_picture = Some(value);
        }
        Ok(Some(creds.account.clone()))
    }

    // --- Resources ---

    async fn create_resource(&self, resource: NewResource) -> AppResult<Resource> {
        let created = Resource {
            id: Uuid::new_v4(),
            title: resource.title,
            kind: resource.kind,
            semester: resource.semester,
            subject: resource.subject,
            topic: resource.topic,
            uploader: resource.uploader,
            role: resource.role,
            file_path: resource.file_path,
            created_at: Utc::now(),
        };
        self.tables()?.resources.push(created.clone());
        Ok(created)
    }

    async fn list_resources(&self, include_academic: bool) -> AppResult<Vec<Resource>> {
        let tables = self.tables()?;
        Ok(newest_first(&tables.resources, |r| r.created_at)
            .into_iter()
            .filter(|r| include_academic || r.kind != ACADEMIC_RESOURCE_KIND)
            .collect())
    }

    async fn get_resource(&self, id: Uuid) -> AppResult<Option<Resource>> {
        Ok(self.tables()?.resources.iter().find(|r| r.id == id).cloned())
    }

    async fn delete_resource(&self, id: Uuid) -> AppResult<bool> {
        Ok(remove_by(&mut self.tables()?.resources, |r| r.id == id))
    }

    // --- Blogs ---

    async fn create_blog(&self, blog: NewBlog) -> AppResult<Blog> {
        let created = Blog {
            id: Uuid::new_v4(),
            title: blog.title,
            content: blog.content,
            author: blog.author,
            image_path: blog.image_path,
            document_path: blog.document_path,
            status: blog.status,
            created_at: Utc::now(),
        };
        self.tables()?.blogs.push(created.clone());
        Ok(created)
    }

    async fn list_blogs(&self, visibility: Visibility) -> AppResult<Vec<Blog>> {
        let tables = self.tables()?;
        Ok(newest_first(&tables.blogs, |b| b.created_at)
            .into_iter()
            .filter(|b| visibility.admits(b.status))
            .collect())
    }

    async fn get_blog(&self, id: Uuid) -> AppResult<Option<Blog>> {
        Ok(self.tables()?.blogs.iter().find(|b| b.id == id).cloned())
    }

    async fn approve_blog(&self, id: Uuid) -> AppResult<Option<Blog>> {
        let mut tables = self.tables()?;
        Ok(tables.blogs.iter_mut().find(|b| b.id == id).map(|blog| {
            blog.status = blog.status.approve();
            blog.clone()
        }))
    }

    async fn delete_blog(&self, id: Uuid) -> AppResult<bool> {
        Ok(remove_by(&mut self.tables()?.blogs, |b| b.id == id))
    }

    // --- Notices ---

    async fn create_notice(&self, notice: NewNotice) -> AppResult<Notice> {
        let created = Notice {
            id: Uuid::new_v4(),
            title: notice.title,
            content: notice.content,
            file_path: notice.file_path,
            author: notice.author,
            created_at: Utc::now(),
        };
        self.tables()?.notices.push(created.clone());
        Ok(created)
    }

    async fn list_notices(&self) -> AppResult<Vec<Notice>> {
        Ok(newest_first(&self.tables()?.notices, |n| n.created_at))
    }

    async fn get_notice(&self, id: Uuid) -> AppResult<Option<Notice>> {
        Ok(self.tables()?.notices.iter().find(|n| n.id == id).cloned())
    }

    async fn delete_notice(&self, id: Uuid) -> AppResult<bool> {
        Ok(remove_by(&mut self.tables()?.notices, |n| n.id == id))
    }

    // --- Research feed ---

    async fn create_research_post(&self, post: NewResearchPost) -> AppResult<ResearchPost> {
        let created = ResearchPost {
            id: Uuid::new_v4(),
            title: post.title,
            caption: post.caption,
            author: post.author,
            role: post.role,
            image_path: post.image_path,
            document_path: post.document_path,
            likes: 0,
            created_at: Utc::now(),
        };
        self.tables()?.research_posts.push(created.clone());
        Ok(created)
    }

    async fn list_research_posts(&self) -> AppResult<Vec<ResearchPost>> {
        Ok(newest_first(&self.tables()?.research_posts, |p| p.created_at))
    }

    async fn get_research_post(&self, id: Uuid) -> AppResult<Option<ResearchPost>> {
        Ok(self
            .tables()?
            .research_posts
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn delete_research_post(&self, id: Uuid) -> AppResult<bool> {
        Ok(remove_by(&mut self.tables()?.research_posts, |p| p.id == id))
    }

    // --- Event gallery ---

    async fn create_highlight(
        &self,
        title: String,
        created_by: Option<String>,
    ) -> AppResult<EventHighlight> {
        let mut tables = self.tables()?;
        if tables.highlights.iter().any(|h| h.title == title) {
            return Err(AppError::Conflict(DUPLICATE_HIGHLIGHT.to_string()));
        }

        let created = EventHighlight {
            id: Uuid::new_v4(),
            title,
            created_by,
        };
        tables.highlights.push(created.clone());
        Ok(created)
    }

    async fn list_highlights(&self) -> AppResult<Vec<EventHighlight>> {
        let mut highlights = self.tables()?.highlights.clone();
        highlights.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(highlights)
    }

    async fn get_highlight(&self, id: Uuid) -> AppResult<Option<EventHighlight>> {
        Ok(self.tables()?.highlights.iter().find(|h| h.id == id).cloned())
    }

    async fn rename_highlight(
        &self,
        id: Uuid,
        title: String,
    ) -> AppResult<Option<EventHighlight>> {
        let mut tables = self.tables()?;
        if tables.highlights.iter().any(|h| h.title == title && h.id != id) {
            return Err(AppError::Conflict(DUPLICATE_HIGHLIGHT.to_string()));
        }

        Ok(tables.highlights.iter_mut().find(|h| h.id == id).map(|h| {
            h.title = title;
            h.clone()
        }))
    }

    async fn create_event_post(&self, post: NewEventPost) -> AppResult<EventPost> {
        let created = EventPost {
            id: Uuid::new_v4(),
            highlight_id: post.highlight_id,
            title: post.title,
            caption: post.caption,
            image_paths: post.image_paths,
            author: post.author,
            role: post.role,
            created_at: Utc::now(),
        };
        self.tables()?.event_posts.push(created.clone());
        Ok(created)
    }

    async fn list_event_posts(&self, highlight_id: Uuid) -> AppResult<Vec<EventPost>> {
        let tables = self.tables()?;
        Ok(newest_first(&tables.event_posts, |p| p.created_at)
            .into_iter()
            .filter(|p| p.highlight_id == highlight_id)
            .collect())
    }

    async fn get_event_post(&self, id: Uuid) -> AppResult<Option<EventPost>> {
        Ok(self.tables()?.event_posts.iter().find(|p| p.id == id).cloned())
    }

    async fn update_event_post(
        &self,
        id: Uuid,
        edit: EditEventPostRequest,
    ) -> AppResult<Option<EventPost>> {
        let mut tables = self.tables()?;
        Ok(tables.event_posts.iter_mut().find(|p| p.id == id).map(|post| {
            if let Some(title) = edit.title {
                post.title = title;
            }
            if let Some(caption) = edit.caption {
                post.caption = Some(caption);
            }
            post.clone()
        }))
    }

    async fn delete_event_post(&self, id: Uuid) -> AppResult<bool> {
        Ok(remove_by(&mut self.tables()?.event_posts, |p| p.id == id))
    }

    // --- Achievements ---

    async fn create_achievement(&self, achievement: NewAchievement) -> AppResult<Achievement> {
        let created = Achievement {
            id: Uuid::new_v4(),
            category: achievement.category,
            students_involved: achievement.students_involved,
            description: achievement.description,
            image_paths: achievement.image_paths,
            author: achievement.author,
            author_role: achievement.author_role,
            created_at: Utc::now(),
        };
        self.tables()?.achievements.push(created.clone());
        Ok(created)
    }

    async fn list_achievements(&self, category: &str) -> AppResult<Vec<Achievement>> {
        let tables = self.tables()?;
        Ok(newest_first(&tables.achievements, |a| a.created_at)
            .into_iter()
            .filter(|a| a.category == category)
            .collect())
    }

    async fn get_achievement(&self, id: Uuid) -> AppResult<Option<Achievement>> {
        Ok(self.tables()?.achievements.iter().find(|a| a.id == id).cloned())
    }

    async fn delete_achievement(&self, id: Uuid) -> AppResult<bool> {
        Ok(remove_by(&mut self.tables()?.achievements, |a| a.id == id))
    }
}
