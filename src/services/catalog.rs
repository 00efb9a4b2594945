//! Catalog management service: categories, shelves and books

use crate::{
    error::AppResult,
    models::{
        book::{BookDetails, BookQuery, CreateBook, UpdateBook},
        category::{Category, CategoryQuery, CreateCategory, UpdateCategory},
        shelf::{CreateShelf, ShelfDetails, ShelfQuery, UpdateShelf},
    },
    repository::Repository,
};

use super::media::{MediaKind, MediaService};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    media: MediaService,
    media_url: String,
}

impl CatalogService {
    pub fn new(repository: Repository, media: MediaService, media_url: String) -> Self {
        Self { repository, media, media_url }
    }

    pub async fn list_categories(&self, query: &CategoryQuery) -> AppResult<(Vec<Category>, i64)> {
        self.repository.categories.list(query).await
    }

    pub async fn get_category(&self, id: i32) -> AppResult<Category> {
        self.repository.categories.get_by_id(id).await
    }

    pub async fn create_category(&self, data: &CreateCategory, actor: i32) -> AppResult<Category> {
        self.repository.categories.create(data, actor).await
    }

    pub async fn update_category(&self, id: i32, data: &UpdateCategory, actor: i32) -> AppResult<Category> {
        self.repository.categories.update(id, data, actor).await
    }

    pub async fn list_shelves(&self, query: &ShelfQuery) -> AppResult<(Vec<ShelfDetails>, i64)> {
        self.repository.shelves.list(query).await
    }

    pub async fn get_shelf(&self, id: i32) -> AppResult<ShelfDetails> {
        self.repository.shelves.get_by_id(id).await
    }

    pub async fn create_shelf(&self, data: &CreateShelf, actor: i32) -> AppResult<ShelfDetails> {
        if let Some(category_id) = data.category_id {
            self.repository.categories.get_by_id(category_id).await?;
        }
        self.repository.shelves.create(data, actor).await
    }

    pub async fn update_shelf(&self, id: i32, data: &UpdateShelf, actor: i32) -> AppResult<ShelfDetails> {
        self.repository.shelves.update(id, data, actor).await
    }

    /// Search books; every row carries its cover URL
    pub async fn list_books(&self, query: &BookQuery) -> AppResult<(Vec<BookDetails>, i64)> {
        let (books, total) = self.repository.books.list(query).await?;
        let books = books
            .into_iter()
            .map(|book| book.with_media_url(&self.media_url))
            .collect();
        Ok((books, total))
    }

    pub async fn get_book(&self, id: i32) -> AppResult<BookDetails> {
        let book = self.repository.books.get_by_id(id).await?;
        Ok(book.with_media_url(&self.media_url))
    }

    pub async fn create_book(&self, data: &CreateBook, actor: i32) -> AppResult<BookDetails> {
        let book = self.repository.books.create(data, actor).await?;
        Ok(book.with_media_url(&self.media_url))
    }

    pub async fn update_book(&self, id: i32, data: &UpdateBook, actor: i32) -> AppResult<BookDetails> {
        let book = self.repository.books.update(id, data, actor).await?;
        Ok(book.with_media_url(&self.media_url))
    }

    /// Store a new cover (shrunk to 240x240 at most) and attach it to the book
    pub async fn upload_cover(&self, id: i32, bytes: Vec<u8>, actor: i32) -> AppResult<BookDetails> {
        let previous = self.repository.books.get_by_id(id).await?.book.cover;

        let repository = &self.repository;
        let (path, book) = self
            .media
            .replace(MediaKind::Cover, bytes, previous, |path| async move {
                repository.books.set_cover(id, &path, actor).await
            })
            .await?;

        tracing::info!(book_id = id, cover = %path, "cover uploaded");
        Ok(book.with_media_url(&self.media_url))
    }
}
