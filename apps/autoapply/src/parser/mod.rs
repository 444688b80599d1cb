//! Numbered-Response Parser — rebuilds an [`AnswerSet`](crate::models::AnswerSet)
//! from the model's numbered free text.

pub mod numbered;
pub mod reconcile;

pub use numbered::{NumberingError, NumberingMode};
pub use reconcile::reconcile;
