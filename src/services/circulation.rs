//! Circulation service: checkouts, rents and shifts

use chrono::Utc;

use crate::{
    error::AppResult,
    models::{
        checkout::{CheckOutDetails, CheckOutQuery, CreateCheckOut, UpdateCheckOut},
        rent::{CreateRent, RentDetails, RentQuery, UpdateRent},
        shift::{CreateShift, ShiftDetails, ShiftQuery, UpdateShift},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CirculationService {
    repository: Repository,
}

impl CirculationService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_checkouts(&self, query: &CheckOutQuery) -> AppResult<(Vec<CheckOutDetails>, i64)> {
        self.repository.checkouts.list(query).await
    }

    pub async fn get_checkout(&self, id: i32) -> AppResult<CheckOutDetails> {
        self.repository.checkouts.get_by_id(id).await
    }

    pub async fn create_checkout(&self, data: &CreateCheckOut, actor: i32) -> AppResult<CheckOutDetails> {
        let checkout = self.repository.checkouts.create(data, actor).await?;
        tracing::info!(
            checkout_id = checkout.checkout.id,
            return_date = %checkout.checkout.return_date,
            "checkout created"
        );
        Ok(checkout)
    }

    pub async fn update_checkout(
        &self,
        id: i32,
        data: &UpdateCheckOut,
        actor: i32,
    ) -> AppResult<CheckOutDetails> {
        self.repository.checkouts.update(id, data, actor).await
    }

    /// Close a checkout: the book is back as of now
    pub async fn return_checkout(&self, id: i32, actor: i32) -> AppResult<CheckOutDetails> {
        let now = Utc::now();
        let checkout = self.repository.checkouts.mark_returned(id, now, actor).await?;
        tracing::info!(
            checkout_id = id,
            late = now.date_naive() > checkout.checkout.return_date,
            "checkout returned"
        );
        Ok(checkout)
    }

    pub async fn list_rents(&self, query: &RentQuery) -> AppResult<(Vec<RentDetails>, i64)> {
        self.repository.rents.list(query).await
    }

    pub async fn get_rent(&self, id: i32) -> AppResult<RentDetails> {
        self.repository.rents.get_by_id(id).await
    }

    pub async fn create_rent(&self, data: &CreateRent, actor: i32) -> AppResult<RentDetails> {
        self.repository.rents.create(data, actor).await
    }

    pub async fn update_rent(&self, id: i32, data: &UpdateRent, actor: i32) -> AppResult<RentDetails> {
        self.repository.rents.update(id, data, actor).await
    }

    pub async fn list_shifts(&self, query: &ShiftQuery) -> AppResult<(Vec<ShiftDetails>, i64)> {
        self.repository.shifts.list(query).await
    }

    pub async fn get_shift(&self, id: i32) -> AppResult<ShiftDetails> {
        self.repository.shifts.get_by_id(id).await
    }

    pub async fn create_shift(&self, data: &CreateShift, actor: i32) -> AppResult<ShiftDetails> {
        self.repository.shifts.create(data, actor).await
    }

    pub async fn update_shift(&self, id: i32, data: &UpdateShift, actor: i32) -> AppResult<ShiftDetails> {
        self.repository.shifts.update(id, data, actor).await
    }
}
