//! Reader profiles service

use crate::{
    error::AppResult,
    models::user_profile::{CreateUserProfile, UpdateUserProfile, UserProfileDetails, UserProfileQuery},
    repository::Repository,
};

use super::media::{MediaKind, MediaService};

#[derive(Clone)]
pub struct ReadersService {
    repository: Repository,
    media: MediaService,
    media_url: String,
}

impl ReadersService {
    pub fn new(repository: Repository, media: MediaService, media_url: String) -> Self {
        Self { repository, media, media_url }
    }

    pub async fn list_profiles(&self, query: &UserProfileQuery) -> AppResult<(Vec<UserProfileDetails>, i64)> {
        let (profiles, total) = self.repository.user_profiles.list(query).await?;
        let profiles = profiles
            .into_iter()
            .map(|profile| profile.with_media_url(&self.media_url))
            .collect();
        Ok((profiles, total))
    }

    pub async fn get_profile(&self, id: i32) -> AppResult<UserProfileDetails> {
        let profile = self.repository.user_profiles.get_by_id(id).await?;
        Ok(profile.with_media_url(&self.media_url))
    }

    pub async fn create_profile(&self, data: &CreateUserProfile, actor: i32) -> AppResult<UserProfileDetails> {
        if let Some(account_id) = data.account_id {
            self.repository.accounts.get_by_id(account_id).await?;
        }
        let profile = self.repository.user_profiles.create(data, actor).await?;
        Ok(profile.with_media_url(&self.media_url))
    }

    pub async fn update_profile(
        &self,
        id: i32,
        data: &UpdateUserProfile,
        actor: i32,
    ) -> AppResult<UserProfileDetails> {
        let profile = self.repository.user_profiles.update(id, data, actor).await?;
        Ok(profile.with_media_url(&self.media_url))
    }

    /// Store a new avatar (center square, 200x200) and attach it to the profile
    pub async fn upload_avatar(&self, id: i32, bytes: Vec<u8>, actor: i32) -> AppResult<UserProfileDetails> {
        let previous = self.repository.user_profiles.get_by_id(id).await?.profile.avatar;

        let repository = &self.repository;
        let (path, profile) = self
            .media
            .replace(MediaKind::Avatar, bytes, previous, |path| async move {
                repository.user_profiles.set_avatar(id, &path, actor).await
            })
            .await?;

        tracing::info!(user_profile_id = id, avatar = %path, "avatar uploaded");
        Ok(profile.with_media_url(&self.media_url))
    }
}
