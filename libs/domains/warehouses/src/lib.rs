//! Warehouses Domain
//!
//! Storage locations that own products, plus the per-warehouse product
//! count report.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Existence checks, validation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + Postgres / in-memory)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Warehouse, inputs, report
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_warehouses::{
//!     handlers,
//!     repository::InMemoryWarehouseRepository,
//!     service::WarehouseService,
//! };
//!
//! let repository = InMemoryWarehouseRepository::new();
//! let service = WarehouseService::new(repository);
//!
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{WarehouseError, WarehouseResult};
pub use handlers::ApiDoc;
pub use models::{ReportQuery, UpdateWarehouse, Warehouse, WarehouseInput, WarehouseReport};
pub use postgres::PgWarehouseRepository;
pub use repository::{InMemoryWarehouseRepository, WarehouseRepository};
pub use service::WarehouseService;
