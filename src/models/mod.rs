//! Data models for the lending library

pub mod account;
pub mod book;
pub mod category;
pub mod checkout;
pub mod comment;
pub mod common;
pub mod enums;
pub mod feedback;
pub mod note;
pub mod rent;
pub mod shelf;
pub mod shift;
pub mod user_profile;

// Re-export commonly used types
pub use account::{Account, AccountClaims};
pub use book::{Book, BookDetails};
pub use category::Category;
pub use checkout::{CheckOut, CheckOutDetails};
pub use common::{calc_end_date, calc_return_date, Audit, BatchRequest, BatchResponse, Page, Paginated};
pub use enums::{BatchAction, BookStatus, CheckOutType, PayStatus, RecordStatus, Sex, ShiftStatus};
pub use shelf::{Shelf, ShelfDetails};
pub use user_profile::{UserProfile, UserProfileDetails};
