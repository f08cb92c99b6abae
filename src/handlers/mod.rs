//! Business route groups mounted under `/api/v1`.
//!
//! Each group is an independently-owned set of endpoints behind a
//! `router()` constructor, so it can be tested and replaced without touching
//! the pipeline. Handlers receive decoded bodies and cookies and either
//! return a success envelope or raise a [`Failure`](crate::error::Failure);
//! they never write a raw, non-enveloped response.
//!
//! The domain logic here is intentionally shallow. The pipeline contract is
//! what matters: decoded inputs in, envelopes or failures out.

pub mod analytics;
pub mod courses;
pub mod layouts;
pub mod notifications;
pub mod orders;
pub mod users;
