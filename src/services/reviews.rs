//! Reader contributions: comments, reading notes and feedback

use crate::{
    error::AppResult,
    models::{
        comment::{CommentDetails, CommentQuery, CreateComment, UpdateComment},
        feedback::{CreateFeedback, FeedbackDetails, FeedbackQuery, UpdateFeedback},
        note::{CreateNote, NoteDetails, NoteQuery, UpdateNote},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ReviewsService {
    repository: Repository,
}

impl ReviewsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_comments(&self, query: &CommentQuery) -> AppResult<(Vec<CommentDetails>, i64)> {
        self.repository.comments.list(query).await
    }

    pub async fn get_comment(&self, id: i32) -> AppResult<CommentDetails> {
        self.repository.comments.get_by_id(id).await
    }

    pub async fn create_comment(&self, data: &CreateComment, actor: i32) -> AppResult<CommentDetails> {
        self.repository.comments.create(data, actor).await
    }

    pub async fn update_comment(&self, id: i32, data: &UpdateComment, actor: i32) -> AppResult<CommentDetails> {
        self.repository.comments.update(id, data, actor).await
    }

    pub async fn list_notes(&self, query: &NoteQuery) -> AppResult<(Vec<NoteDetails>, i64)> {
        self.repository.notes.list(query).await
    }

    pub async fn get_note(&self, id: i32) -> AppResult<NoteDetails> {
        self.repository.notes.get_by_id(id).await
    }

    pub async fn create_note(&self, data: &CreateNote, actor: i32) -> AppResult<NoteDetails> {
        self.repository.notes.create(data, actor).await
    }

    pub async fn update_note(&self, id: i32, data: &UpdateNote, actor: i32) -> AppResult<NoteDetails> {
        self.repository.notes.update(id, data, actor).await
    }

    pub async fn list_feedbacks(&self, query: &FeedbackQuery) -> AppResult<(Vec<FeedbackDetails>, i64)> {
        self.repository.feedbacks.list(query).await
    }

    pub async fn get_feedback(&self, id: i32) -> AppResult<FeedbackDetails> {
        self.repository.feedbacks.get_by_id(id).await
    }

    pub async fn create_feedback(&self, data: &CreateFeedback, actor: i32) -> AppResult<FeedbackDetails> {
        self.repository.feedbacks.create(data, actor).await
    }

    pub async fn update_feedback(
        &self,
        id: i32,
        data: &UpdateFeedback,
        actor: i32,
    ) -> AppResult<FeedbackDetails> {
        self.repository.feedbacks.update(id, data, actor).await
    }

    pub async fn reply_feedback(&self, id: i32, reply: &str, actor: i32) -> AppResult<FeedbackDetails> {
        let feedback = self.repository.feedbacks.reply(id, reply.trim(), actor).await?;
        tracing::info!(feedback_id = id, "feedback answered");
        Ok(feedback)
    }
}
